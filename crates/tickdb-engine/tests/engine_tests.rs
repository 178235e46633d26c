//! End-to-end tests for the database facade.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tempfile::TempDir;

use tickdb_engine::{DbConfig, Tick, TickDb};

fn open(tmp: &TempDir, symbol: &str) -> TickDb {
    TickDb::open(DbConfig::new(tmp.path()), symbol).unwrap()
}

#[test]
fn basic_insert_query() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "AAPL");

    db.append(1000, 150.00, 500).unwrap();
    db.append(1001, 150.50, 600).unwrap();
    db.append(1002, 149.75, 400).unwrap();
    db.sync().unwrap();

    let hits = db.query_range(1000, 1001).unwrap();
    assert_eq!(
        hits,
        vec![Tick::new(1000, 150.00, 500), Tick::new(1001, 150.50, 600)]
    );

    let last = db.query_last(2).unwrap();
    assert_eq!(
        last,
        vec![Tick::new(1001, 150.50, 600), Tick::new(1002, 149.75, 400)]
    );
}

#[test]
fn out_of_order_timestamps() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "AAPL");

    db.append(2000, 10.0, 1).unwrap();
    db.append(1000, 20.0, 2).unwrap();
    db.append(3000, 30.0, 3).unwrap();
    db.sync().unwrap();

    // Range queries sort by timestamp...
    let hits = db.query_range(0, 9999).unwrap();
    assert_eq!(
        hits,
        vec![
            Tick::new(1000, 20.0, 2),
            Tick::new(2000, 10.0, 1),
            Tick::new(3000, 30.0, 3),
        ]
    );

    // ...while recency queries keep insertion order.
    let last = db.query_last(3).unwrap();
    assert_eq!(
        last,
        vec![
            Tick::new(2000, 10.0, 1),
            Tick::new(1000, 20.0, 2),
            Tick::new(3000, 30.0, 3),
        ]
    );
}

#[test]
fn duplicate_timestamps_keep_insertion_order() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "AAPL");

    db.append(500, 1.0, 1).unwrap();
    db.append(500, 2.0, 2).unwrap();
    db.append(500, 3.0, 3).unwrap();
    db.sync().unwrap();

    let hits = db.query_range(500, 500).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].price, 1.0);
    assert_eq!(hits[1].price, 2.0);
    assert_eq!(hits[2].price, 3.0);
}

#[test]
fn empty_database_boundaries() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "EMPTY");

    assert_eq!(db.count(), 0);
    assert!(db.query_range(0, u64::MAX).unwrap().is_empty());
    assert!(db.query_last(5).unwrap().is_empty());
    // Sync with nothing pending returns immediately.
    db.sync().unwrap();
}

#[test]
fn single_row_boundaries() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "ONE");

    db.append(1000, 5.0, 10).unwrap();
    db.sync().unwrap();

    assert_eq!(db.query_range(1000, 1000).unwrap().len(), 1);
    assert!(db.query_range(999, 999).unwrap().is_empty());
    assert!(db.query_range(1001, 1001).unwrap().is_empty());
    assert_eq!(db.query_last(100).unwrap().len(), 1);
}

#[test]
fn sync_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "AAPL");

    db.append(1, 1.0, 1).unwrap();
    db.sync().unwrap();
    db.sync().unwrap();
    assert_eq!(db.count(), 1);
    assert_eq!(db.stats().syncs.load(Ordering::Relaxed), 2);
}

#[test]
fn reopen_preserves_rows_and_index() {
    let tmp = TempDir::new().unwrap();
    {
        let db = open(&tmp, "AAPL");
        for i in 0..1000u64 {
            db.append(i, i as f64, i).unwrap();
        }
        db.sync().unwrap();
        assert_eq!(db.count(), 1000);
    }

    let db = open(&tmp, "AAPL");
    assert_eq!(db.count(), 1000);

    let hits = db.query_range(100, 200).unwrap();
    assert_eq!(hits.len(), 101);
    for (offset, tick) in hits.iter().enumerate() {
        let i = 100 + offset as u64;
        assert_eq!(*tick, Tick::new(i, i as f64, i));
    }

    let last = db.query_last(3).unwrap();
    assert_eq!(last.len(), 3);
    assert_eq!(last[2], Tick::new(999, 999.0, 999));
}

#[test]
fn reopen_twice_produces_identical_results() {
    let tmp = TempDir::new().unwrap();
    {
        let db = open(&tmp, "AAPL");
        db.append_batch(&[
            Tick::new(30, 3.0, 3),
            Tick::new(10, 1.0, 1),
            Tick::new(20, 2.0, 2),
            Tick::new(10, 1.5, 4),
        ])
        .unwrap();
        db.sync().unwrap();
    }

    let first = {
        let db = open(&tmp, "AAPL");
        db.query_range(0, 100).unwrap()
    };
    let second = {
        let db = open(&tmp, "AAPL");
        db.query_range(0, 100).unwrap()
    };
    assert_eq!(first, second);
    // Duplicates keep their insertion order across rebuilds.
    assert_eq!(first[0], Tick::new(10, 1.0, 1));
    assert_eq!(first[1], Tick::new(10, 1.5, 4));
}

#[test]
fn growth_across_chunk_multiples() {
    let tmp = TempDir::new().unwrap();
    // Tiny chunks and batches so capacity growth happens constantly.
    let db = TickDb::open(DbConfig::for_testing(tmp.path()), "GROW").unwrap();

    for i in 0..2500u64 {
        db.append(i, i as f64 * 0.5, i * 2).unwrap();
    }
    db.sync().unwrap();
    assert_eq!(db.count(), 2500);

    let hits = db.query_range(0, u64::MAX).unwrap();
    assert_eq!(hits.len(), 2500);
    for (i, tick) in hits.iter().enumerate() {
        let i = i as u64;
        assert_eq!(*tick, Tick::new(i, i as f64 * 0.5, i * 2));
    }
}

#[test]
fn append_batch_commits_in_fifo_order() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "BATCH");

    let ticks: Vec<Tick> = (0..10_000u64)
        .map(|i| Tick::new(i, i as f64, i))
        .collect();
    db.append_batch(&ticks).unwrap();
    db.sync().unwrap();

    assert_eq!(db.count(), 10_000);
    let last = db.query_last(10_000).unwrap();
    assert_eq!(last, ticks);
}

#[test]
fn concurrent_queries_see_prefix_consistent_snapshots() {
    let tmp = TempDir::new().unwrap();
    let db = Arc::new(open(&tmp, "RACE"));

    let ticks: Vec<Tick> = (0..10_000u64)
        .map(|i| Tick::new(i, i as f64, i))
        .collect();

    let mut readers = Vec::new();
    for _ in 0..8 {
        let db = Arc::clone(&db);
        readers.push(std::thread::spawn(move || {
            for _ in 0..50 {
                let snapshot = db.query_range(0, u64::MAX).unwrap();
                // Every result must be a strict prefix of the batch: no
                // holes, no tuple mixing columns from different rows.
                for (i, tick) in snapshot.iter().enumerate() {
                    let i = i as u64;
                    assert_eq!(*tick, Tick::new(i, i as f64, i));
                }
            }
        }));
    }

    db.append_batch(&ticks).unwrap();
    db.sync().unwrap();

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(db.query_range(0, u64::MAX).unwrap().len(), 10_000);
}

#[test]
fn concurrent_producers_preserve_per_thread_fifo() {
    let tmp = TempDir::new().unwrap();
    let db = Arc::new(open(&tmp, "MULTI"));

    let mut producers = Vec::new();
    for t in 0..4u64 {
        let db = Arc::clone(&db);
        producers.push(std::thread::spawn(move || {
            for i in 0..500u64 {
                // Timestamp encodes (thread, sequence) so FIFO per thread
                // is checkable afterwards.
                db.append(t * 1_000_000 + i, i as f64, t).unwrap();
            }
        }));
    }
    for p in producers {
        p.join().unwrap();
    }
    db.sync().unwrap();
    assert_eq!(db.count(), 2000);

    // Insertion order within each thread must be ascending.
    let all = db.query_last(2000).unwrap();
    for t in 0..4u64 {
        let seq: Vec<u64> = all
            .iter()
            .filter(|tick| tick.volume == t)
            .map(|tick| tick.timestamp)
            .collect();
        assert_eq!(seq.len(), 500);
        assert!(seq.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn close_flushes_and_reopen_restores() {
    let tmp = TempDir::new().unwrap();
    let db = open(&tmp, "AAPL");
    db.append(1, 1.0, 1).unwrap();
    db.close().unwrap();

    let db = open(&tmp, "AAPL");
    assert_eq!(db.count(), 1);
    drop(db);
}

#[test]
fn drop_drains_queue_before_exit() {
    let tmp = TempDir::new().unwrap();
    {
        let db = open(&tmp, "DRAIN");
        for i in 0..100u64 {
            db.append(i, i as f64, i).unwrap();
        }
        // No sync: dropping must still commit every enqueued tick.
    }

    let db = open(&tmp, "DRAIN");
    assert_eq!(db.count(), 100);
    let hits = db.query_range(0, 99).unwrap();
    assert_eq!(hits.len(), 100);
}

#[test]
fn counts_stay_equal_across_columns() {
    let tmp = TempDir::new().unwrap();
    let db = TickDb::open(DbConfig::for_testing(tmp.path()), "EQ").unwrap();

    for i in 0..123u64 {
        db.append(i, 1.0, 1).unwrap();
    }
    db.sync().unwrap();
    drop(db);

    // All three headers must agree after a clean shutdown.
    let read_count = |name: &str| {
        let bytes = std::fs::read(tmp.path().join(format!("EQ/{name}.bin"))).unwrap();
        u64::from_ne_bytes(bytes[..8].try_into().unwrap())
    };
    assert_eq!(read_count("timestamps"), 123);
    assert_eq!(read_count("prices"), 123);
    assert_eq!(read_count("volumes"), 123);
}
