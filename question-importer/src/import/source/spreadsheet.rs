//! Read question rows from workbook files

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::{HeaderMap, text_cell};
use crate::import::error::ImportError;
use crate::import::types::{CellValue, RawQuestion};

/// Convert a workbook cell to a CellValue
fn cell_to_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::String(s) => text_cell(s),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(format!("{}", dt)),
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(_) => CellValue::Null,
    }
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Read question rows from the given (or first) worksheet
pub fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<RawQuestion>, ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ImportError::source_read(path, e))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(ImportError::source_read(
                    path,
                    format!(
                        "worksheet '{}' not found (available: {})",
                        name,
                        sheet_names.join(", ")
                    ),
                ));
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::source_read(path, "workbook has no sheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::source_read(path, format!("sheet '{}': {}", sheet_name, e)))?;

    // Row numbers reported to the operator are 1-based spreadsheet rows
    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => {
            return Err(ImportError::source_read(
                path,
                format!("sheet '{}' is empty", sheet_name),
            ));
        }
    };
    let header_map = HeaderMap::resolve(&headers, path)?;

    let questions = rows
        .enumerate()
        .filter_map(|(idx, row)| {
            header_map.build_row(first_row + idx + 2, row.iter().map(cell_to_value))
        })
        .collect();

    Ok(questions)
}
