//! Import failure taxonomy

use std::path::PathBuf;

/// Terminal import failure
#[derive(Debug)]
pub enum ImportError {
    /// Source spreadsheet is missing, unreadable or lacks required columns
    SourceRead { path: PathBuf, reason: String },
    /// Store could not be opened or does not carry the expected schema
    StoreConnection { path: PathBuf, reason: String },
    /// A row (or the enclosing transaction) was rejected by the store
    Insert {
        /// Source row number, `None` when begin/commit failed
        row: Option<usize>,
        /// Rows committed before the failure (non-zero only in per-batch mode)
        committed: usize,
        source: sqlx::Error,
    },
}

impl ImportError {
    pub(crate) fn source_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ImportError::SourceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn store_connection(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        ImportError::StoreConnection {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Short name of the error class, used in operator output
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::SourceRead { .. } => "SourceReadError",
            ImportError::StoreConnection { .. } => "StoreConnectionError",
            ImportError::Insert { .. } => "InsertError",
        }
    }
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::SourceRead { path, reason } => {
                write!(f, "Failed to read source '{}': {}", path.display(), reason)
            }
            ImportError::StoreConnection { path, reason } => {
                write!(f, "Failed to open store '{}': {}", path.display(), reason)
            }
            ImportError::Insert {
                row,
                committed,
                source,
            } => {
                match row {
                    Some(row) => write!(f, "Failed to insert row {}: {}", row, source)?,
                    None => write!(f, "Import transaction failed: {}", source)?,
                }
                if *committed > 0 {
                    write!(f, " ({} rows from earlier batches remain committed)", committed)
                } else {
                    write!(f, " (all changes rolled back)")
                }
            }
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Insert { source, .. } => Some(source),
            _ => None,
        }
    }
}
