//! Spreadsheet-to-SQLite importer for the question bank
//!
//! See [`import::Importer`] for the pipeline and [`config::ImporterConfig`]
//! for its settings.

pub mod config;
pub mod import;
