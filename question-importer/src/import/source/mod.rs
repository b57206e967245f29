//! Spreadsheet sources for question rows
//!
//! `.csv` files go through the csv reader; every other extension is handed
//! to calamine (xlsx, xlsm, xlsb, xls, ods). The whole source is loaded into
//! memory before anything touches the store.

mod delimited;
mod spreadsheet;
mod template;

use std::path::Path;

use super::error::ImportError;
use super::types::{CellValue, Column, RawQuestion};

pub use template::write_template;

/// Read every question row from `path`.
///
/// `sheet` selects a worksheet by name; the first worksheet is used when
/// `None`. It is ignored for CSV sources.
pub fn read_source(path: &Path, sheet: Option<&str>) -> Result<Vec<RawQuestion>, ImportError> {
    if !path.exists() {
        return Err(ImportError::source_read(path, "file does not exist"));
    }

    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        if sheet.is_some() {
            log::warn!("Ignoring sheet selection for CSV source {}", path.display());
        }
        delimited::read_csv(path)?
    } else {
        spreadsheet::read_workbook(path, sheet)?
    };

    log::debug!("Read {} question rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Maps source column positions to question columns
#[derive(Debug, Clone)]
struct HeaderMap {
    columns: Vec<Option<Column>>,
}

impl HeaderMap {
    /// Resolve a header row, failing if a required column is absent
    fn resolve(headers: &[String], path: &Path) -> Result<Self, ImportError> {
        let mut columns = Vec::with_capacity(headers.len());
        let mut seen: Vec<Column> = Vec::new();

        for header in headers {
            match Column::from_header(header) {
                Some(column) if seen.contains(&column) => {
                    log::warn!("Duplicate column '{}' ignored, first occurrence wins", header);
                    columns.push(None);
                }
                Some(column) => {
                    seen.push(column);
                    columns.push(Some(column));
                }
                None => {
                    if !header.trim().is_empty() {
                        log::debug!("Ignoring unknown column '{}'", header);
                    }
                    columns.push(None);
                }
            }
        }

        let missing_required: Vec<&str> = Column::ALL
            .iter()
            .filter(|c| c.is_required() && !seen.contains(c))
            .map(|c| c.header())
            .collect();
        if !missing_required.is_empty() {
            return Err(ImportError::source_read(
                path,
                format!("missing required column(s): {}", missing_required.join(", ")),
            ));
        }

        for column in Column::ALL.iter().filter(|c| !seen.contains(c)) {
            log::warn!("Column '{}' not found in source, values will be empty", column);
        }

        Ok(Self { columns })
    }

    /// Build a row from cells in source order; `None` for an all-blank row
    fn build_row(
        &self,
        row_number: usize,
        cells: impl IntoIterator<Item = CellValue>,
    ) -> Option<RawQuestion> {
        let mut row = RawQuestion::new(row_number);
        let mut any_value = false;

        for (cell, column) in cells.into_iter().zip(self.columns.iter()) {
            let Some(column) = column else { continue };
            if cell.is_null() {
                continue;
            }
            any_value = true;
            *row.cell_mut(*column) = cell;
        }

        any_value.then_some(row)
    }
}

/// Convert a text cell, treating blank strings as null
fn text_cell(s: &str) -> CellValue {
    if s.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::String(s.to_string())
    }
}
