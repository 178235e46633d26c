//! The tick value type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single market-data observation: `(timestamp, price, volume)`.
///
/// Timestamps are opaque integers from the caller's domain (seconds,
/// milliseconds, or anything else monotonic enough for the caller's
/// purposes). The engine imposes neither monotonicity nor uniqueness;
/// ordering happens in the time index, not at insert time.
///
/// # Example
///
/// ```rust
/// use tickdb_common::types::Tick;
///
/// let tick = Tick::new(1000, 150.25, 500);
/// assert_eq!(tick.timestamp, 1000);
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Caller-domain timestamp.
    pub timestamp: u64,
    /// Trade price.
    pub price: f64,
    /// Trade volume.
    pub volume: u64,
}

impl Tick {
    /// Creates a new tick.
    #[inline]
    #[must_use]
    pub const fn new(timestamp: u64, price: f64, volume: u64) -> Self {
        Self {
            timestamp,
            price,
            volume,
        }
    }
}

impl fmt::Debug for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tick({}, {}, {})",
            self.timestamp, self.price, self.volume
        )
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {:.2} x {}",
            self.timestamp, self.price, self.volume
        )
    }
}
