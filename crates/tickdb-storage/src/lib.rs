//! # tickdb-storage
//!
//! Storage primitives for TickDB:
//!
//! - **Column files**: one fixed-width, memory-mapped file per field with a
//!   persisted committed count ([`column::ColumnFile`])
//! - **Time index**: an in-memory ordered multimap from timestamps to row
//!   ids ([`index::TimeIndex`])
//!
//! Both are single-symbol primitives; the database facade in
//! `tickdb-engine` composes three columns and one index per symbol and
//! provides the locking that makes them change together atomically.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod column;
pub mod index;

pub use column::{ColumnError, ColumnFile, ColumnResult};
pub use index::{IndexStats, TimeIndex};
