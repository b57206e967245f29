//! Question record types shared by the reader, normalizer and store

use serde::{Deserialize, Serialize};

/// A raw spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Empty cell, empty string or error cell
    #[default]
    Null,
    /// Text cell
    String(String),
    /// Whole number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean cell
    Bool(bool),
    /// Date/time, kept in the reader's textual form
    DateTime(String),
}

impl CellValue {
    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Render the cell as text, `None` for null.
    ///
    /// Whole floats drop their fractional part so `3.0` reads as `"3"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            CellValue::String(s) => Some(s.clone()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => {
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some((*f as i64).to_string())
                } else {
                    Some(f.to_string())
                }
            }
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(s) => Some(s.clone()),
        }
    }

    /// Interpret the cell as a yes/no flag
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            CellValue::Int(0) => Some(false),
            CellValue::Int(1) => Some(true),
            CellValue::Float(f) if *f == 0.0 => Some(false),
            CellValue::Float(f) if *f == 1.0 => Some(true),
            CellValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "y" | "1" | "approved" => Some(true),
                "false" | "no" | "n" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Source columns, in insert order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Question,
    Answer,
    Explanation,
    Subject,
    ModuleNumber,
    ModuleName,
    Topic,
    SubTopic,
    MicroTopic,
    FacultyApproved,
    DifficultyLevel,
    NatureOfQuestion,
    QuestionType,
}

impl Column {
    pub const ALL: [Column; 13] = [
        Column::Question,
        Column::Answer,
        Column::Explanation,
        Column::Subject,
        Column::ModuleNumber,
        Column::ModuleName,
        Column::Topic,
        Column::SubTopic,
        Column::MicroTopic,
        Column::FacultyApproved,
        Column::DifficultyLevel,
        Column::NatureOfQuestion,
        Column::QuestionType,
    ];

    /// Canonical header text
    pub fn header(&self) -> &'static str {
        match self {
            Column::Question => "Question",
            Column::Answer => "Answer",
            Column::Explanation => "Explanation",
            Column::Subject => "Subject",
            Column::ModuleNumber => "Module Number",
            Column::ModuleName => "Module Name",
            Column::Topic => "Topic",
            Column::SubTopic => "Sub Topic",
            Column::MicroTopic => "Micro Topic",
            Column::FacultyApproved => "Faculty Approved",
            Column::DifficultyLevel => "Difficulty Level",
            Column::NatureOfQuestion => "Nature of Question",
            Column::QuestionType => "Question Type",
        }
    }

    /// Whether the record field is required (NOT NULL in the store)
    pub fn is_required(&self) -> bool {
        matches!(self, Column::Question | Column::Answer | Column::Subject)
    }

    /// Resolve a spreadsheet header to a column.
    ///
    /// Case-insensitive, trimmed, `_` treated as a space.
    pub fn from_header(header: &str) -> Option<Column> {
        let key = header_key(header);
        Column::ALL
            .into_iter()
            .find(|c| header_key(c.header()) == key)
    }
}

impl std::fmt::Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header())
    }
}

fn header_key(header: &str) -> String {
    header
        .trim()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// One spreadsheet row before normalization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawQuestion {
    /// 1-based row number in the source (header is row 1)
    pub row_number: usize,
    pub question: CellValue,
    pub answer: CellValue,
    pub explanation: CellValue,
    pub subject: CellValue,
    pub module_number: CellValue,
    pub module_name: CellValue,
    pub topic: CellValue,
    pub sub_topic: CellValue,
    pub micro_topic: CellValue,
    pub faculty_approved: CellValue,
    pub difficulty_level: CellValue,
    pub nature_of_question: CellValue,
    pub question_type: CellValue,
}

impl RawQuestion {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            ..Default::default()
        }
    }

    /// Mutable access to the cell backing a column
    pub fn cell_mut(&mut self, column: Column) -> &mut CellValue {
        match column {
            Column::Question => &mut self.question,
            Column::Answer => &mut self.answer,
            Column::Explanation => &mut self.explanation,
            Column::Subject => &mut self.subject,
            Column::ModuleNumber => &mut self.module_number,
            Column::ModuleName => &mut self.module_name,
            Column::Topic => &mut self.topic,
            Column::SubTopic => &mut self.sub_topic,
            Column::MicroTopic => &mut self.micro_topic,
            Column::FacultyApproved => &mut self.faculty_approved,
            Column::DifficultyLevel => &mut self.difficulty_level,
            Column::NatureOfQuestion => &mut self.nature_of_question,
            Column::QuestionType => &mut self.question_type,
        }
    }
}

/// Canonical difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Canonical question type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    Objective,
    Subjective,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Objective => "Objective",
            QuestionType::Subjective => "Subjective",
        }
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What to do with difficulty values that match no canonical level
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum DifficultyPolicy {
    /// Store NULL
    #[default]
    StrictNull,
    /// Store `medium`
    DefaultMedium,
}

impl std::fmt::Display for DifficultyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DifficultyPolicy::StrictNull => write!(f, "strict-null"),
            DifficultyPolicy::DefaultMedium => write!(f, "default-medium"),
        }
    }
}

/// Transaction boundaries for the insert phase
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum CommitMode {
    /// One transaction for the whole run
    #[default]
    Atomic,
    /// Commit after every batch; a failure keeps earlier batches
    PerBatch,
}

impl std::fmt::Display for CommitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitMode::Atomic => write!(f, "atomic"),
            CommitMode::PerBatch => write!(f, "per-batch"),
        }
    }
}

/// A question ready for insertion
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedQuestion {
    pub row_number: usize,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub explanation: Option<String>,
    pub subject: Option<String>,
    pub module_number: Option<String>,
    pub module_name: Option<String>,
    pub topic: Option<String>,
    pub sub_topic: Option<String>,
    pub micro_topic: Option<String>,
    pub faculty_approved: Option<bool>,
    pub difficulty_level: Option<DifficultyLevel>,
    pub nature_of_question: Option<String>,
    pub question_type: QuestionType,
}

impl NormalizedQuestion {
    /// Required fields that are null in this record
    pub fn missing_required(&self) -> Vec<Column> {
        let mut missing = Vec::new();
        if self.question.is_none() {
            missing.push(Column::Question);
        }
        if self.answer.is_none() {
            missing.push(Column::Answer);
        }
        if self.subject.is_none() {
            missing.push(Column::Subject);
        }
        missing
    }
}
