//! The per-symbol database facade.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::{Condvar, Mutex, RwLock};

use tickdb_common::constants::{
    COLUMN_SLOT_SIZE, PRICES_COLUMN, TIMESTAMPS_COLUMN, VOLUMES_COLUMN,
};
use tickdb_common::{RowId, Tick};
use tickdb_storage::{ColumnFile, TimeIndex};

use crate::config::DbConfig;
use crate::error::{EngineError, EngineResult};
use crate::writer;

/// Counters exposed by [`TickDb::stats`].
#[derive(Debug, Default)]
pub struct DbStats {
    /// Total ticks committed to the columns.
    pub ticks_written: AtomicU64,
    /// Number of writer batches committed.
    pub batches_committed: AtomicU64,
    /// Number of completed sync calls.
    pub syncs: AtomicU64,
}

/// Everything a query must observe atomically: the three columns and the
/// index that mirrors them. Writers hold the outer lock exclusively, so a
/// reader never sees an index entry without its column rows.
pub(crate) struct TableState {
    pub(crate) timestamps: ColumnFile,
    pub(crate) prices: ColumnFile,
    pub(crate) volumes: ColumnFile,
    pub(crate) index: TimeIndex,
}

/// State shared between the facade and its writer thread.
pub(crate) struct DbShared {
    pub(crate) config: DbConfig,
    pub(crate) symbol: String,
    /// The query lock: queries shared, the writer exclusive.
    pub(crate) state: RwLock<TableState>,
    /// Inbound FIFO of ticks awaiting commit.
    pub(crate) queue: Mutex<VecDeque<Tick>>,
    pub(crate) queue_cv: Condvar,
    /// Ticks enqueued but not yet committed.
    pub(crate) pending_writes: AtomicU64,
    /// Lock + condvar pair for waking `sync` when the queue drains.
    pub(crate) drained_lock: Mutex<()>,
    pub(crate) drained_cv: Condvar,
    pub(crate) sync_requested: AtomicBool,
    pub(crate) stop: AtomicBool,
    /// Sticky writer failure; set once, never cleared.
    pub(crate) failure: Mutex<Option<String>>,
    pub(crate) stats: DbStats,
}

impl DbShared {
    pub(crate) fn failure_reason(&self) -> Option<String> {
        self.failure.lock().clone()
    }
}

/// An append-only tick store for one symbol.
///
/// Opening an instance opens or creates the three column files under
/// `<data_dir>/<symbol>/`, rebuilds the time index from committed rows,
/// and starts the writer thread. Dropping it drains the queue, joins the
/// writer, and flushes the column headers.
pub struct TickDb {
    shared: Arc<DbShared>,
    writer: Option<JoinHandle<()>>,
}

impl TickDb {
    /// Opens or creates the database for `symbol` under the configured
    /// data directory.
    pub fn open(config: DbConfig, symbol: impl Into<String>) -> EngineResult<Self> {
        config
            .validate()
            .map_err(|message| EngineError::InvalidConfig { message })?;
        let symbol = symbol.into();

        let timestamps = ColumnFile::open_with_chunk(
            &config.data_dir,
            &symbol,
            TIMESTAMPS_COLUMN,
            COLUMN_SLOT_SIZE,
            config.growth_chunk,
        )?;
        let prices = ColumnFile::open_with_chunk(
            &config.data_dir,
            &symbol,
            PRICES_COLUMN,
            COLUMN_SLOT_SIZE,
            config.growth_chunk,
        )?;
        let volumes = ColumnFile::open_with_chunk(
            &config.data_dir,
            &symbol,
            VOLUMES_COLUMN,
            COLUMN_SLOT_SIZE,
            config.growth_chunk,
        )?;

        // Rebuild the volatile index from the committed timestamps. The
        // writer has not started yet, so this runs exclusively.
        let mut index = TimeIndex::new();
        let count = timestamps.count();
        for i in 0..count {
            index.insert(timestamps.read_u64(i)?, RowId::new(i));
        }
        tracing::debug!(symbol = %symbol, rows = count, "index rebuilt");

        let shared = Arc::new(DbShared {
            config,
            symbol: symbol.clone(),
            state: RwLock::new(TableState {
                timestamps,
                prices,
                volumes,
                index,
            }),
            queue: Mutex::new(VecDeque::new()),
            queue_cv: Condvar::new(),
            pending_writes: AtomicU64::new(0),
            drained_lock: Mutex::new(()),
            drained_cv: Condvar::new(),
            sync_requested: AtomicBool::new(false),
            stop: AtomicBool::new(false),
            failure: Mutex::new(None),
            stats: DbStats::default(),
        });

        let writer = std::thread::Builder::new()
            .name(format!("tickdb-writer-{symbol}"))
            .spawn({
                let shared = Arc::clone(&shared);
                move || writer::run(shared)
            })?;

        Ok(Self {
            shared,
            writer: Some(writer),
        })
    }

    /// Returns the symbol this instance serves.
    pub fn symbol(&self) -> &str {
        &self.shared.symbol
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DbConfig {
        &self.shared.config
    }

    /// Returns the writer and sync counters.
    pub fn stats(&self) -> &DbStats {
        &self.shared.stats
    }

    /// Enqueues one tick. Returns immediately; durability is not
    /// guaranteed until [`sync`](Self::sync) returns.
    pub fn append(&self, timestamp: u64, price: f64, volume: u64) -> EngineResult<()> {
        self.append_batch(&[Tick::new(timestamp, price, volume)])
    }

    /// Enqueues many ticks in FIFO order under one queue lock acquisition.
    pub fn append_batch(&self, ticks: &[Tick]) -> EngineResult<()> {
        self.check_alive()?;
        if ticks.is_empty() {
            return Ok(());
        }
        self.shared
            .pending_writes
            .fetch_add(ticks.len() as u64, Ordering::Release);
        {
            let mut queue = self.shared.queue.lock();
            queue.extend(ticks.iter().copied());
        }
        self.shared.queue_cv.notify_one();
        Ok(())
    }

    /// Returns all ticks with `start <= timestamp <= end`, ascending by
    /// timestamp, ties in insertion order.
    pub fn query_range(&self, start: u64, end: u64) -> EngineResult<Vec<Tick>> {
        let state = self.shared.state.read();
        let hits = state.index.range_query(start, end);
        let mut out = Vec::with_capacity(hits.len());
        for (timestamp, row) in hits {
            out.push(Tick {
                timestamp,
                price: state.prices.read_f64(row.as_u64())?,
                volume: state.volumes.read_u64(row.as_u64())?,
            });
        }
        Ok(out)
    }

    /// Returns the most recent `n` ticks in insertion order.
    pub fn query_last(&self, n: usize) -> EngineResult<Vec<Tick>> {
        let state = self.shared.state.read();
        let count = state.timestamps.count();
        let start = count.saturating_sub(n as u64);
        let mut out = Vec::with_capacity((count - start) as usize);
        for i in start..count {
            out.push(Tick {
                timestamp: state.timestamps.read_u64(i)?,
                price: state.prices.read_f64(i)?,
                volume: state.volumes.read_u64(i)?,
            });
        }
        Ok(out)
    }

    /// Returns the committed row count, consistent across columns.
    pub fn count(&self) -> u64 {
        self.shared.state.read().timestamps.count()
    }

    /// Blocks until every previously enqueued tick has been committed and
    /// its headers flushed. Idempotent: with nothing pending it returns
    /// without blocking.
    pub fn sync(&self) -> EngineResult<()> {
        if let Some(reason) = self.shared.failure_reason() {
            return Err(EngineError::WriterFailed { reason });
        }
        if self.shared.pending_writes.load(Ordering::Acquire) == 0 {
            self.shared.stats.syncs.fetch_add(1, Ordering::Relaxed);
            return Ok(());
        }

        self.shared.sync_requested.store(true, Ordering::Release);
        let mut guard = self.shared.drained_lock.lock();
        while self.shared.pending_writes.load(Ordering::Acquire) != 0 {
            if let Some(reason) = self.shared.failure_reason() {
                self.shared.sync_requested.store(false, Ordering::Release);
                return Err(EngineError::WriterFailed { reason });
            }
            self.shared.drained_cv.wait(&mut guard);
        }
        drop(guard);
        self.shared.sync_requested.store(false, Ordering::Release);
        self.shared.stats.syncs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Shuts the instance down: drains the queue, joins the writer, and
    /// flushes column headers. Equivalent to dropping, but reports a
    /// writer that died abnormally.
    pub fn close(mut self) -> EngineResult<()> {
        self.shutdown();
        if let Some(reason) = self.shared.failure_reason() {
            return Err(EngineError::WriterFailed { reason });
        }
        Ok(())
    }

    fn check_alive(&self) -> EngineResult<()> {
        if self.shared.stop.load(Ordering::Acquire) {
            return Err(EngineError::Closed);
        }
        if let Some(reason) = self.shared.failure_reason() {
            return Err(EngineError::WriterFailed { reason });
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        self.shared.stop.store(true, Ordering::Release);
        self.shared.queue_cv.notify_all();
        if let Some(handle) = self.writer.take() {
            if handle.join().is_err() {
                tracing::error!(symbol = %self.shared.symbol, "writer thread panicked");
            }
        }
    }
}

impl Drop for TickDb {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for TickDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickDb")
            .field("symbol", &self.shared.symbol)
            .field("count", &self.count())
            .field(
                "pending_writes",
                &self.shared.pending_writes.load(Ordering::Acquire),
            )
            .finish()
    }
}
