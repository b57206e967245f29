//! Template command handler

use anyhow::Result;
use colored::*;

use super::TemplateCommands;
use question_importer::import::source::write_template;

pub fn handle_template_command(args: TemplateCommands) -> Result<()> {
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "Output file already exists: {} (use --force to overwrite)",
            args.output.display()
        );
    }

    write_template(&args.output, args.with_example)?;

    println!(
        "Wrote import template to {}",
        args.output.display().to_string().cyan()
    );
    Ok(())
}
