//! Read question rows from CSV files

use std::path::Path;

use super::{HeaderMap, text_cell};
use crate::import::error::ImportError;
use crate::import::types::RawQuestion;

pub fn read_csv(path: &Path) -> Result<Vec<RawQuestion>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| ImportError::source_read(path, e))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ImportError::source_read(path, e))?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let header_map = HeaderMap::resolve(&headers, path)?;

    let mut questions = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ImportError::source_read(path, e))?;
        let row_number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        if let Some(row) = header_map.build_row(row_number, record.iter().map(text_cell)) {
            questions.push(row);
        }
    }

    Ok(questions)
}
