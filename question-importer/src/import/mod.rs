//! Spreadsheet-to-store question import
//!
//! Rows are read into memory, normalized by pure functions, and appended to
//! the `questions` table inside a transaction.

pub mod error;
pub mod importer;
pub mod normalize;
pub mod source;
pub mod store;
pub mod types;

pub use error::ImportError;
pub use importer::{ImportSummary, Importer};
pub use normalize::{NormalizationReport, normalize_difficulty, normalize_question_type, normalize_row};
pub use types::{
    CellValue, Column, CommitMode, DifficultyLevel, DifficultyPolicy, NormalizedQuestion,
    QuestionType, RawQuestion,
};
