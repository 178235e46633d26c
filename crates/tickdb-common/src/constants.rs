//! System-wide constants for TickDB.
//!
//! This module defines the on-disk layout and tuning constants used across
//! the storage engine.

// =============================================================================
// Column File Layout
// =============================================================================

/// Size of the column file header in bytes.
///
/// The header is a single `u64` at offset 0 holding the committed element
/// count. Slot data begins immediately after it.
pub const COLUMN_HEADER_SIZE: usize = 8;

/// Slot width of every tick column in bytes.
///
/// All three columns store 8-byte elements: `u64` timestamps, IEEE-754
/// `f64` prices, and `u64` volumes, in native byte order.
pub const COLUMN_SLOT_SIZE: usize = 8;

/// Growth increment for column files in bytes (4 KB).
///
/// Files are pre-extended in multiples of `GROWTH_CHUNK / slot_size` slots,
/// so the common append path never touches file metadata.
pub const GROWTH_CHUNK: usize = 4096;

/// File name of the timestamp column within a symbol directory.
pub const TIMESTAMPS_COLUMN: &str = "timestamps";

/// File name of the price column within a symbol directory.
pub const PRICES_COLUMN: &str = "prices";

/// File name of the volume column within a symbol directory.
pub const VOLUMES_COLUMN: &str = "volumes";

// =============================================================================
// Writer Tuning
// =============================================================================

/// Maximum number of queued ticks the background writer drains per batch.
pub const WRITER_DRAIN_BATCH: usize = 1000;

// =============================================================================
// Time Index
// =============================================================================

/// Default fanout of the in-memory time index.
///
/// High enough that range scans stay cache friendly, low enough that leaf
/// inserts remain cheap shifts.
pub const INDEX_FANOUT: usize = 64;
