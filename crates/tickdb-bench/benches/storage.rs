//! Storage-layer benchmarks:
//!
//! - Column append and read throughput
//! - Time index inserts (sequential and random keys)
//! - Time index range scans

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tempfile::TempDir;

use tickdb_bench::utils::{random_ticks, sequential_ticks};
use tickdb_common::RowId;
use tickdb_storage::{ColumnFile, TimeIndex};

fn bench_column_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/column_append");

    for size in [1000, 10_000, 100_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let tmp = TempDir::new().unwrap();
                let column = ColumnFile::open(tmp.path(), "BENCH", "values", 8).unwrap();
                for i in 0..size as u64 {
                    column.append(&i.to_ne_bytes()).unwrap();
                }
                black_box(column.count())
            });
        });
    }

    group.finish();
}

fn bench_column_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/column_read");

    let tmp = TempDir::new().unwrap();
    let column = ColumnFile::open(tmp.path(), "BENCH", "values", 8).unwrap();
    for i in 0..100_000u64 {
        column.append(&i.to_ne_bytes()).unwrap();
    }

    group.throughput(Throughput::Elements(100_000));
    group.bench_function("sequential_100k", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for i in 0..100_000u64 {
                sum = sum.wrapping_add(column.read_u64(i).unwrap());
            }
            black_box(sum)
        });
    });

    group.finish();
}

fn bench_index_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/index_insert");

    for size in [1000, 10_000, 100_000].iter() {
        let sequential = sequential_ticks(*size, 42);
        let random = random_ticks(*size, 42);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(
            BenchmarkId::new("sequential", size),
            &sequential,
            |b, ticks| {
                b.iter(|| {
                    let mut index = TimeIndex::new();
                    for (row, tick) in ticks.iter().enumerate() {
                        index.insert(tick.timestamp, RowId::new(row as u64));
                    }
                    black_box(index.len())
                });
            },
        );
        group.bench_with_input(BenchmarkId::new("random", size), &random, |b, ticks| {
            b.iter(|| {
                let mut index = TimeIndex::new();
                for (row, tick) in ticks.iter().enumerate() {
                    index.insert(tick.timestamp, RowId::new(row as u64));
                }
                black_box(index.len())
            });
        });
    }

    group.finish();
}

fn bench_index_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage/index_range");

    let mut index = TimeIndex::new();
    for i in 0..100_000u64 {
        index.insert(i, RowId::new(i));
    }

    for span in [100u64, 1000, 10_000].iter() {
        group.throughput(Throughput::Elements(*span));
        group.bench_with_input(BenchmarkId::from_parameter(span), span, |b, &span| {
            b.iter(|| {
                let hits = index.range_query(50_000, 50_000 + span - 1);
                black_box(hits.len())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_column_append,
    bench_column_read,
    bench_index_insert,
    bench_index_range,
);
criterion_main!(benches);
