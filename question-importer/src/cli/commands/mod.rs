//! Subcommand arguments and handlers

pub mod import;
pub mod template;

use std::path::PathBuf;

use clap::Args;

use question_importer::config::ConfigFile;
use question_importer::import::{CommitMode, DifficultyPolicy};

#[derive(Debug, Args)]
pub struct ImportCommands {
    /// Config file (defaults to ~/.config/question-importer/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Spreadsheet to import (.xlsx, .xls, .ods or .csv)
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Existing SQLite database containing the questions table
    #[arg(short = 'd', long)]
    pub store: Option<PathBuf>,

    /// Worksheet name (first sheet when omitted)
    #[arg(long)]
    pub sheet: Option<String>,

    /// How to store difficulty values that match no known level
    #[arg(long, value_enum)]
    pub difficulty_policy: Option<DifficultyPolicy>,

    /// Commit once for the whole run, or after every batch
    #[arg(long = "commit", value_enum)]
    pub commit_mode: Option<CommitMode>,

    /// Rows per insert batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Store column receiving the question type
    #[arg(long)]
    pub question_type_column: Option<String>,

    /// Read and normalize without touching the store
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress per-batch progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl ImportCommands {
    /// Settings given on the command line
    pub fn settings(&self) -> ConfigFile {
        ConfigFile {
            source_path: self.source.clone(),
            store_path: self.store.clone(),
            sheet: self.sheet.clone(),
            difficulty_policy: self.difficulty_policy,
            commit_mode: self.commit_mode,
            batch_size: self.batch_size,
            question_type_column: self.question_type_column.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct TemplateCommands {
    /// Output .xlsx path
    pub output: PathBuf,

    /// Include one filled-in example row
    #[arg(long)]
    pub with_example: bool,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}
