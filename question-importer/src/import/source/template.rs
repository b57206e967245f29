//! Blank import workbook with the canonical header row

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};

use crate::import::types::Column;

const SHEET_NAME: &str = "Questions";

const EXAMPLE_ROW: [&str; 13] = [
    "Which gas do plants absorb during photosynthesis?",
    "Carbon dioxide",
    "Plants take in CO2 through stomata.",
    "Biology",
    "2",
    "Plant Physiology",
    "Photosynthesis",
    "Gas Exchange",
    "Stomata",
    "yes",
    "easy",
    "Conceptual",
    "MCQ",
];

/// Write an import template to `path`
pub fn write_template(path: &Path, with_example: bool) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();

    for (col, column) in Column::ALL.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, column.header(), &header_format)?;
        worksheet.set_column_width(col, if column.is_required() { 40 } else { 18 })?;
    }

    if with_example {
        for (col, value) in EXAMPLE_ROW.iter().enumerate() {
            worksheet.write_string(1, col as u16, *value)?;
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write template: {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::normalize::normalize_row;
    use crate::import::source::read_source;
    use crate::import::types::{DifficultyLevel, DifficultyPolicy, QuestionType};

    #[test]
    fn test_template_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.xlsx");

        write_template(&path, false).unwrap();
        assert!(read_source(&path, Some(SHEET_NAME)).unwrap().is_empty());

        write_template(&path, true).unwrap();
        let rows = read_source(&path, None).unwrap();
        assert_eq!(rows.len(), 1);

        let q = normalize_row(&rows[0], DifficultyPolicy::StrictNull);
        assert_eq!(q.subject.as_deref(), Some("Biology"));
        assert_eq!(q.faculty_approved, Some(true));
        assert_eq!(q.difficulty_level, Some(DifficultyLevel::Easy));
        assert_eq!(q.question_type, QuestionType::Objective);
    }
}
