//! The in-memory time index.
//!
//! An ordered multimap from timestamps to row ids, implemented as a B+
//! tree whose nodes live in a `Vec` arena and address each other by index.
//! Leaves are chained through forward ids for range scans, so the whole
//! structure is free of parent pointers and sibling references.
//!
//! The index is volatile: the engine rebuilds it from the timestamp column
//! at open and mirrors every committed row into it under the write lock.

mod node;
mod tree;

pub use tree::{IndexStats, TimeIndex};
