//! Shared generators for benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tickdb_common::Tick;

/// Generates `count` ticks with monotonically increasing timestamps and a
/// seeded random-walk price.
pub fn sequential_ticks(count: usize, seed: u64) -> Vec<Tick> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 100.0f64;
    (0..count)
        .map(|i| {
            price = (price + rng.gen_range(-0.5..0.5)).max(0.01);
            Tick::new(i as u64, price, rng.gen_range(1..=10_000))
        })
        .collect()
}

/// Generates `count` ticks with uniformly random timestamps, exercising
/// out-of-order index inserts.
pub fn random_ticks(count: usize, seed: u64) -> Vec<Tick> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            Tick::new(
                rng.gen_range(0..1_000_000),
                rng.gen_range(1.0..1000.0),
                rng.gen_range(1..=10_000),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_deterministic() {
        assert_eq!(sequential_ticks(10, 1), sequential_ticks(10, 1));
        assert_eq!(random_ticks(10, 1), random_ticks(10, 1));
    }

    #[test]
    fn test_sequential_timestamps_increase() {
        let ticks = sequential_ticks(100, 42);
        assert!(ticks.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }
}
