//! Command line interface

pub mod commands;

use clap::{Parser, Subcommand};

pub use commands::{ImportCommands, TemplateCommands};

#[derive(Debug, Parser)]
#[command(name = "question-importer", version, about = "Import question spreadsheets into the questions store")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import every row of a spreadsheet into the questions table
    Import(ImportCommands),
    /// Write a blank spreadsheet with the expected column headers
    Template(TemplateCommands),
}

impl Cli {
    /// Log filter implied by the verbosity flag
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
