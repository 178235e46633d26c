//! Core types for TickDB.
//!
//! This module provides the [`Tick`] value type and the [`RowId`]
//! identifier used by the time index.

mod ids;
mod tick;

pub use ids::RowId;
pub use tick::Tick;
