//! # tickdb-bench
//!
//! Benchmark support utilities for TickDB. The benchmarks themselves live
//! in `benches/`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod utils;
