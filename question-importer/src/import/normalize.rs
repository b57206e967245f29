//! Normalization of raw spreadsheet rows into insertable questions
//!
//! Everything here is pure: no I/O, no store access.

use std::collections::BTreeMap;

use super::types::{
    Column, DifficultyLevel, DifficultyPolicy, NormalizedQuestion, QuestionType, RawQuestion,
};

const OBJECTIVE_KEYWORDS: [&str; 4] = ["mcq", "multiple choice", "true/false", "objective"];
const SUBJECTIVE_KEYWORDS: [&str; 4] = ["short answer", "long answer", "essay", "subjective"];

/// Map free-text difficulty to a canonical level.
///
/// Unrecognized or missing input resolves according to `policy`.
pub fn normalize_difficulty(
    raw: Option<&str>,
    policy: DifficultyPolicy,
) -> Option<DifficultyLevel> {
    match raw.and_then(recognize_difficulty) {
        Some(level) => Some(level),
        None => match policy {
            DifficultyPolicy::StrictNull => None,
            DifficultyPolicy::DefaultMedium => Some(DifficultyLevel::Medium),
        },
    }
}

fn recognize_difficulty(raw: &str) -> Option<DifficultyLevel> {
    match raw.trim().to_lowercase().as_str() {
        "easy" | "e" => Some(DifficultyLevel::Easy),
        "medium" | "m" | "avg" => Some(DifficultyLevel::Medium),
        "hard" | "h" | "difficult" => Some(DifficultyLevel::Hard),
        _ => None,
    }
}

/// Map free-text question type to Objective or Subjective.
///
/// Objective keywords are checked first; anything unmatched is Objective.
pub fn normalize_question_type(raw: Option<&str>) -> QuestionType {
    recognize_question_type(raw).unwrap_or_default()
}

fn recognize_question_type(raw: Option<&str>) -> Option<QuestionType> {
    let value = raw?.trim().to_lowercase();

    if OBJECTIVE_KEYWORDS.iter().any(|k| value.contains(k)) {
        Some(QuestionType::Objective)
    } else if SUBJECTIVE_KEYWORDS.iter().any(|k| value.contains(k)) {
        Some(QuestionType::Subjective)
    } else {
        None
    }
}

/// Transform one raw row into a question ready for insertion
pub fn normalize_row(raw: &RawQuestion, policy: DifficultyPolicy) -> NormalizedQuestion {
    let difficulty = raw.difficulty_level.as_text();
    let question_type = raw.question_type.as_text();

    NormalizedQuestion {
        row_number: raw.row_number,
        question: raw.question.as_text(),
        answer: raw.answer.as_text(),
        explanation: raw.explanation.as_text(),
        subject: raw.subject.as_text(),
        module_number: raw.module_number.as_text(),
        module_name: raw.module_name.as_text(),
        topic: raw.topic.as_text(),
        sub_topic: raw.sub_topic.as_text(),
        micro_topic: raw.micro_topic.as_text(),
        faculty_approved: raw.faculty_approved.as_flag(),
        difficulty_level: normalize_difficulty(difficulty.as_deref(), policy),
        nature_of_question: raw.nature_of_question.as_text(),
        question_type: normalize_question_type(question_type.as_deref()),
    }
}

/// Statistics gathered while normalizing a whole source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizationReport {
    pub total: usize,
    /// Count per stored difficulty; `None` is NULL
    pub difficulty_counts: BTreeMap<Option<&'static str>, usize>,
    /// Non-empty difficulty values no mapping recognized: (row, raw value)
    pub unrecognized_difficulty: Vec<(usize, String)>,
    pub objective: usize,
    pub subjective: usize,
    /// Rows whose question type fell back to Objective
    pub defaulted_question_type: usize,
    /// Rows with null required fields: (row, columns)
    pub missing_required: Vec<(usize, Vec<Column>)>,
}

/// Normalize every row, collecting a report alongside
pub fn normalize_all(
    rows: &[RawQuestion],
    policy: DifficultyPolicy,
) -> (Vec<NormalizedQuestion>, NormalizationReport) {
    let mut report = NormalizationReport::default();
    let mut normalized = Vec::with_capacity(rows.len());

    for raw in rows {
        let question = normalize_row(raw, policy);
        report.record(raw, &question);
        normalized.push(question);
    }

    (normalized, report)
}

impl NormalizationReport {
    fn record(&mut self, raw: &RawQuestion, question: &NormalizedQuestion) {
        self.total += 1;

        *self
            .difficulty_counts
            .entry(question.difficulty_level.map(|d| d.as_str()))
            .or_insert(0) += 1;

        if let Some(text) = raw.difficulty_level.as_text() {
            if !text.trim().is_empty() && recognize_difficulty(&text).is_none() {
                self.unrecognized_difficulty.push((raw.row_number, text));
            }
        }

        match question.question_type {
            QuestionType::Objective => self.objective += 1,
            QuestionType::Subjective => self.subjective += 1,
        }
        let question_type = raw.question_type.as_text();
        if recognize_question_type(question_type.as_deref()).is_none() {
            self.defaulted_question_type += 1;
        }

        let missing = question.missing_required();
        if !missing.is_empty() {
            self.missing_required.push((raw.row_number, missing));
        }
    }

    /// Count of rows stored with the given difficulty (`None` = NULL)
    pub fn difficulty_count(&self, level: Option<DifficultyLevel>) -> usize {
        self.difficulty_counts
            .get(&level.map(|d| d.as_str()))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::types::CellValue;

    fn raw_row(row_number: usize, difficulty: CellValue, question_type: CellValue) -> RawQuestion {
        RawQuestion {
            row_number,
            question: CellValue::String("Define osmosis".into()),
            answer: CellValue::String("Diffusion of water".into()),
            subject: CellValue::String("Biology".into()),
            module_number: CellValue::Float(3.0),
            difficulty_level: difficulty,
            question_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_recognized_difficulty() {
        let cases = [
            ("easy", DifficultyLevel::Easy),
            ("  E ", DifficultyLevel::Easy),
            ("Medium", DifficultyLevel::Medium),
            ("m", DifficultyLevel::Medium),
            ("AVG", DifficultyLevel::Medium),
            ("hard\t", DifficultyLevel::Hard),
            ("H", DifficultyLevel::Hard),
            (" Difficult ", DifficultyLevel::Hard),
        ];
        for policy in [DifficultyPolicy::StrictNull, DifficultyPolicy::DefaultMedium] {
            for (raw, expected) in cases {
                assert_eq!(
                    normalize_difficulty(Some(raw), policy),
                    Some(expected),
                    "{raw:?} under {policy}"
                );
            }
        }
    }

    #[test]
    fn test_unrecognized_difficulty_strict_null() {
        for raw in ["n/a", "", "3", "very hard", "easyish"] {
            assert_eq!(normalize_difficulty(Some(raw), DifficultyPolicy::StrictNull), None);
        }
        assert_eq!(normalize_difficulty(None, DifficultyPolicy::StrictNull), None);
    }

    #[test]
    fn test_unrecognized_difficulty_default_medium() {
        for raw in ["n/a", "", "3", "very hard"] {
            assert_eq!(
                normalize_difficulty(Some(raw), DifficultyPolicy::DefaultMedium),
                Some(DifficultyLevel::Medium)
            );
        }
        assert_eq!(
            normalize_difficulty(None, DifficultyPolicy::DefaultMedium),
            Some(DifficultyLevel::Medium)
        );
    }

    #[test]
    fn test_question_type_keywords() {
        assert_eq!(normalize_question_type(Some("MCQ")), QuestionType::Objective);
        assert_eq!(normalize_question_type(Some("True/False")), QuestionType::Objective);
        assert_eq!(
            normalize_question_type(Some(" Multiple Choice (single) ")),
            QuestionType::Objective
        );
        assert_eq!(normalize_question_type(Some("Essay")), QuestionType::Subjective);
        assert_eq!(normalize_question_type(Some("short answer")), QuestionType::Subjective);
        assert_eq!(normalize_question_type(Some("Long Answer")), QuestionType::Subjective);
        assert_eq!(normalize_question_type(Some("subjective")), QuestionType::Subjective);
    }

    #[test]
    fn test_question_type_defaults_to_objective() {
        assert_eq!(normalize_question_type(None), QuestionType::Objective);
        assert_eq!(normalize_question_type(Some("")), QuestionType::Objective);
        assert_eq!(normalize_question_type(Some("diagram")), QuestionType::Objective);
    }

    #[test]
    fn test_question_type_objective_wins_tie() {
        assert_eq!(
            normalize_question_type(Some("essay or mcq")),
            QuestionType::Objective
        );
    }

    #[test]
    fn test_normalize_row() {
        let raw = raw_row(
            2,
            CellValue::String("Avg".into()),
            CellValue::String("Short Answer".into()),
        );
        let q = normalize_row(&raw, DifficultyPolicy::StrictNull);

        assert_eq!(q.row_number, 2);
        assert_eq!(q.question.as_deref(), Some("Define osmosis"));
        assert_eq!(q.module_number.as_deref(), Some("3"));
        assert_eq!(q.explanation, None);
        assert_eq!(q.faculty_approved, None);
        assert_eq!(q.difficulty_level, Some(DifficultyLevel::Medium));
        assert_eq!(q.question_type, QuestionType::Subjective);
    }

    #[test]
    fn test_normalize_row_numeric_difficulty() {
        let raw = raw_row(5, CellValue::Int(3), CellValue::Null);
        let q = normalize_row(&raw, DifficultyPolicy::StrictNull);
        assert_eq!(q.difficulty_level, None);
        assert_eq!(q.question_type, QuestionType::Objective);
    }

    #[test]
    fn test_normalize_all_report() {
        let rows = vec![
            raw_row(2, CellValue::String("e".into()), CellValue::String("MCQ".into())),
            raw_row(3, CellValue::String("n/a".into()), CellValue::String("essay".into())),
            raw_row(4, CellValue::Null, CellValue::Null),
            RawQuestion {
                question: CellValue::String("Orphan".into()),
                ..RawQuestion::new(5)
            },
        ];

        let (questions, report) = normalize_all(&rows, DifficultyPolicy::StrictNull);

        assert_eq!(questions.len(), 4);
        assert_eq!(report.total, 4);
        assert_eq!(report.difficulty_count(Some(DifficultyLevel::Easy)), 1);
        assert_eq!(report.difficulty_count(None), 3);
        assert_eq!(report.unrecognized_difficulty, vec![(3, "n/a".to_string())]);
        assert_eq!(report.objective, 3);
        assert_eq!(report.subjective, 1);
        assert_eq!(report.defaulted_question_type, 2);
        assert_eq!(
            report.missing_required,
            vec![(5, vec![Column::Answer, Column::Subject])]
        );
    }
}
