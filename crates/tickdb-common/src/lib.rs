//! # tickdb-common
//!
//! Common types and constants for TickDB.
//!
//! This crate provides the foundational pieces shared by every TickDB
//! component:
//!
//! - **Types**: the [`Tick`] value type and the [`RowId`] row identifier
//! - **Constants**: on-disk layout and writer tuning constants
//!
//! ## Example
//!
//! ```rust
//! use tickdb_common::types::{RowId, Tick};
//!
//! let tick = Tick::new(1_700_000_000, 101.25, 500);
//! let row = RowId::new(0);
//! assert_eq!(tick.volume, 500);
//! assert_eq!(row.as_u64(), 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constants;
pub mod types;

// Re-export commonly used items at the crate root
pub use constants::*;
pub use types::{RowId, Tick};
