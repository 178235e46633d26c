//! Error types for column storage.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for column storage operations.
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Errors that can occur in column storage operations.
#[derive(Debug, Error)]
pub enum ColumnError {
    /// An I/O operation on the column file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path of the column file.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The column file exists but does not match the expected layout.
    #[error("invalid column file {}: {reason}", path.display())]
    InvalidFormat {
        /// Path of the column file.
        path: PathBuf,
        /// What was wrong with it.
        reason: String,
    },

    /// A read addressed a slot at or beyond the committed count.
    #[error("slot index {index} out of range for committed count {count}")]
    OutOfRange {
        /// The requested slot index.
        index: u64,
        /// The committed count at the time of the read.
        count: u64,
    },
}

impl ColumnError {
    /// Creates an I/O error annotated with the file path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
