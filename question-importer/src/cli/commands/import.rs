//! Import command handler

use std::time::Instant;

use anyhow::Result;
use colored::*;

use super::ImportCommands;
use question_importer::config::{ConfigFile, ImporterConfig};
use question_importer::import::{CommitMode, ImportSummary, Importer, NormalizationReport};

/// How many unrecognized values / incomplete rows to list before summarizing
const REPORT_SAMPLE: usize = 10;

/// Handle the import command
pub async fn handle_import_command(args: ImportCommands) -> Result<()> {
    if args.no_color {
        colored::control::set_override(false);
    }

    let settings = ConfigFile::discover(args.config.as_deref())?.merge(args.settings());
    let config = ImporterConfig::from_settings(settings, args.dry_run, args.quiet)?;

    println!(
        "Importing {} into {}",
        config.source_path.display().to_string().cyan(),
        config.store_path.display().to_string().cyan()
    );
    println!(
        "Difficulty policy: {}, commit: {}, batch size: {}",
        config.difficulty_policy.to_string().bold(),
        config.commit_mode.to_string().bold(),
        config.batch_size
    );
    if config.commit_mode == CommitMode::PerBatch && !config.dry_run {
        println!(
            "{}",
            "Warning: per-batch commit only guarantees atomicity per batch; a failure keeps earlier batches."
                .yellow()
        );
    }

    let start = Instant::now();
    let importer = Importer::new(config);

    let summary = match importer.run().await {
        Ok(summary) => summary,
        Err(err) => {
            let kind = err.kind();
            return Err(anyhow::Error::new(err).context(kind));
        }
    };

    print_report(&summary.report);
    print_outcome(&importer, &summary, start.elapsed().as_secs_f64());

    Ok(())
}

fn print_report(report: &NormalizationReport) {
    println!();
    println!("{}", "Normalization".bold());

    let levels = [Some("easy"), Some("medium"), Some("hard"), None];
    let counts: Vec<String> = levels
        .iter()
        .map(|level| {
            let count = report.difficulty_counts.get(level).copied().unwrap_or(0);
            format!("{}={}", level.unwrap_or("null"), count)
        })
        .collect();
    println!("  Difficulty:    {}", counts.join(", "));
    println!(
        "  Question type: Objective={}, Subjective={} ({} defaulted to Objective)",
        report.objective, report.subjective, report.defaulted_question_type
    );

    if !report.unrecognized_difficulty.is_empty() {
        println!(
            "  {} unrecognized difficulty value(s):",
            report.unrecognized_difficulty.len().to_string().yellow()
        );
        for (row, value) in report.unrecognized_difficulty.iter().take(REPORT_SAMPLE) {
            println!("    row {}: {:?}", row, value);
        }
        print_remaining(report.unrecognized_difficulty.len());
    }

    if !report.missing_required.is_empty() {
        println!(
            "  {} row(s) missing required fields:",
            report.missing_required.len().to_string().yellow()
        );
        for (row, columns) in report.missing_required.iter().take(REPORT_SAMPLE) {
            let names: Vec<&str> = columns.iter().map(|c| c.header()).collect();
            println!("    row {}: {}", row, names.join(", "));
        }
        print_remaining(report.missing_required.len());
    }
    println!();
}

fn print_remaining(total: usize) {
    if total > REPORT_SAMPLE {
        println!("    ... and {} more", total - REPORT_SAMPLE);
    }
}

fn print_outcome(importer: &Importer, summary: &ImportSummary, elapsed: f64) {
    if importer.config().dry_run {
        println!(
            "Dry run: {} questions read and normalized, store not opened.",
            summary.rows_read.to_string().bright_green().bold()
        );
        return;
    }

    println!(
        "Successfully imported {} questions! ({:.2}s)",
        summary.inserted.to_string().bright_green().bold(),
        elapsed
    );
}
