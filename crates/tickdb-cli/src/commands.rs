//! Subcommand implementations.

use std::path::Path;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use tickdb_engine::{DbConfig, Tick, TickDb};

use crate::formatter::{format_ticks, OutputFormat};

fn open(data_dir: &Path, symbol: &str) -> Result<TickDb> {
    TickDb::open(DbConfig::new(data_dir), symbol)
        .with_context(|| format!("failed to open symbol '{symbol}'"))
}

pub fn insert(
    data_dir: &Path,
    symbol: &str,
    timestamp: u64,
    price: f64,
    volume: u64,
) -> Result<()> {
    let db = open(data_dir, symbol)?;
    db.append(timestamp, price, volume)?;
    db.sync()?;
    println!("Inserted tick for {symbol}");
    Ok(())
}

pub fn query(
    data_dir: &Path,
    symbol: &str,
    start: u64,
    end: u64,
    format: OutputFormat,
) -> Result<()> {
    let db = open(data_dir, symbol)?;
    let ticks = db.query_range(start, end)?;
    println!("Found {} results:", ticks.len());
    println!("{}", format_ticks(&ticks, format));
    Ok(())
}

pub fn last(data_dir: &Path, symbol: &str, count: usize, format: OutputFormat) -> Result<()> {
    let db = open(data_dir, symbol)?;
    let ticks = db.query_last(count)?;
    println!("{}", format_ticks(&ticks, format));
    Ok(())
}

pub fn benchmark(
    data_dir: &Path,
    symbol: &str,
    count: usize,
    batch_size: usize,
    seed: u64,
) -> Result<()> {
    if batch_size == 0 {
        bail!("batch size must be positive");
    }
    info!("benchmarking {count} ticks against '{symbol}'");
    let db = open(data_dir, symbol)?;
    let ticks = generate_ticks(count, seed);

    let started = Instant::now();
    for batch in ticks.chunks(batch_size) {
        db.append_batch(batch)?;
    }
    db.sync()?;
    let elapsed = started.elapsed();

    let per_sec = count as f64 / elapsed.as_secs_f64();
    println!(
        "Appended {count} ticks in {:.3}s ({:.0} ticks/s, batch size {batch_size})",
        elapsed.as_secs_f64(),
        per_sec
    );

    let started = Instant::now();
    let hits = db.query_range(0, u64::MAX)?;
    println!(
        "Full range scan returned {} rows in {:.3}s",
        hits.len(),
        started.elapsed().as_secs_f64()
    );
    Ok(())
}

pub fn import(data_dir: &Path, symbol: &str, file: &Path) -> Result<()> {
    info!("importing {} into '{symbol}'", file.display());
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let mut ticks = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Tolerate a header line at the top of the file.
        if number == 0 && line.split(',').next().is_some_and(|f| f.parse::<u64>().is_err()) {
            continue;
        }
        let tick = parse_tick_line(line)
            .with_context(|| format!("{}:{}: malformed line", file.display(), number + 1))?;
        ticks.push(tick);
    }

    let db = open(data_dir, symbol)?;
    db.append_batch(&ticks)?;
    db.sync()?;
    println!("Imported {} ticks into {symbol}", ticks.len());
    Ok(())
}

/// Parses one `timestamp,price,volume` CSV line.
fn parse_tick_line(line: &str) -> Result<Tick> {
    let mut fields = line.split(',').map(str::trim);
    let (Some(ts), Some(price), Some(volume), None) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        bail!("expected exactly 3 comma-separated fields");
    };

    Ok(Tick::new(
        ts.parse::<u64>()
            .with_context(|| format!("bad timestamp '{ts}'"))?,
        price
            .parse::<f64>()
            .with_context(|| format!("bad price '{price}'"))?,
        volume
            .parse::<u64>()
            .with_context(|| format!("bad volume '{volume}'"))?,
    ))
}

/// Generates a seeded random-walk tick stream.
fn generate_ticks(count: usize, seed: u64) -> Vec<Tick> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut price = 100.0f64;
    (0..count)
        .map(|i| {
            price = (price + rng.gen_range(-0.5..0.5)).max(0.01);
            Tick::new(
                1_700_000_000 + i as u64,
                (price * 100.0).round() / 100.0,
                rng.gen_range(1..=10_000),
            )
        })
        .collect()
}
