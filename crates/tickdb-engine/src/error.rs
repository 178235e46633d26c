//! Error types for the database facade.

use thiserror::Error;

use tickdb_storage::ColumnError;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur in database operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A column storage operation failed.
    #[error("column storage error: {0}")]
    Column(#[from] ColumnError),

    /// An I/O operation outside column storage failed.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The configuration was rejected.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with it.
        message: String,
    },

    /// The background writer hit a fatal storage error.
    ///
    /// The failure is sticky: every later `append` or `sync` on the same
    /// instance returns it again.
    #[error("background writer failed: {reason}")]
    WriterFailed {
        /// Stringified cause of the failure.
        reason: String,
    },

    /// The database has been closed.
    #[error("database is closed")]
    Closed,
}
