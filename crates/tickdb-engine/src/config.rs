//! Engine configuration.

use std::path::PathBuf;

use tickdb_common::constants::{GROWTH_CHUNK, WRITER_DRAIN_BATCH};

/// Configuration for a [`TickDb`](crate::TickDb) instance.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Directory holding one subdirectory of column files per symbol.
    pub data_dir: PathBuf,

    /// Maximum number of queued ticks the writer drains per batch.
    pub drain_batch_size: usize,

    /// Growth increment for column files, in bytes.
    pub growth_chunk: usize,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            drain_batch_size: WRITER_DRAIN_BATCH,
            growth_chunk: GROWTH_CHUNK,
        }
    }
}

impl DbConfig {
    /// Creates a configuration rooted at the given data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Sets the writer drain batch size.
    #[must_use]
    pub fn with_drain_batch_size(mut self, size: usize) -> Self {
        self.drain_batch_size = size;
        self
    }

    /// Sets the column growth chunk in bytes.
    #[must_use]
    pub fn with_growth_chunk(mut self, bytes: usize) -> Self {
        self.growth_chunk = bytes;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.drain_batch_size == 0 {
            return Err("drain batch size must be positive".to_string());
        }
        if self.growth_chunk == 0 {
            return Err("growth chunk must be positive".to_string());
        }
        Ok(())
    }

    /// Returns the directory holding a symbol's column files.
    pub fn symbol_dir(&self, symbol: &str) -> PathBuf {
        self.data_dir.join(symbol)
    }

    /// Creates a test configuration with tiny batches and chunks, so
    /// growth and multi-batch paths run constantly.
    pub fn for_testing(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            drain_batch_size: 4,
            growth_chunk: 64,
        }
    }
}
