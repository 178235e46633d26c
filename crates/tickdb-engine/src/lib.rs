//! # tickdb-engine
//!
//! The TickDB database facade. One [`TickDb`] instance owns a symbol's
//! three column files, the in-memory time index, and a dedicated writer
//! thread that drains queued ticks into all of them row-consistently.
//!
//! ```text
//!  append()/append_batch()          query_range()/query_last()
//!          │                                  │
//!          ▼                                  ▼ (read lock)
//!  ┌──────────────┐   writer    ┌─────────────────────────────┐
//!  │  tick queue  │ ──────────▶ │ timestamps │ prices │ vols  │
//!  │ (FIFO+cond)  │ (write lock)│        + time index         │
//!  └──────────────┘             └─────────────────────────────┘
//! ```
//!
//! Because the writer appends all three columns, flushes their headers,
//! and updates the index under one exclusive lock, a query never sees an
//! index entry pointing at a row some column does not yet hold.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tickdb_engine::{DbConfig, TickDb};
//!
//! fn example() -> tickdb_engine::EngineResult<()> {
//!     let db = TickDb::open(DbConfig::new("./data"), "AAPL")?;
//!     db.append(1000, 150.00, 500)?;
//!     db.append(1001, 150.50, 600)?;
//!     db.sync()?;
//!     let ticks = db.query_range(1000, 1001)?;
//!     assert_eq!(ticks.len(), 2);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;

mod db;
mod writer;

pub use config::DbConfig;
pub use db::{DbStats, TickDb};
pub use error::{EngineError, EngineResult};

// Re-export the tick type so callers need only this crate.
pub use tickdb_common::Tick;
