//! The background writer thread.
//!
//! The writer is the only mutator of a database's columns and index. It
//! drains the inbound queue in FIFO batches and commits each batch under
//! the exclusive side of the query lock, so rows become visible to
//! queries atomically across all columns.

use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use bytes::{BufMut, BytesMut};

use tickdb_common::constants::COLUMN_SLOT_SIZE;
use tickdb_common::{RowId, Tick};
use tickdb_storage::ColumnResult;

use crate::db::DbShared;

pub(crate) fn run(shared: Arc<DbShared>) {
    tracing::debug!(symbol = %shared.symbol, "writer started");
    loop {
        let batch = {
            let mut queue = shared.queue.lock();
            while queue.is_empty() && !shared.stop.load(Ordering::Acquire) {
                shared.queue_cv.wait(&mut queue);
            }
            if queue.is_empty() {
                // Shutdown requested and nothing left to drain.
                break;
            }
            drain(&mut queue, shared.config.drain_batch_size)
        };

        let n = batch.len() as u64;
        match commit_batch(&shared, &batch) {
            Ok(()) => {
                shared.stats.ticks_written.fetch_add(n, Ordering::Relaxed);
                shared.stats.batches_committed.fetch_add(1, Ordering::Relaxed);
                finish_pending(&shared, n);
            }
            Err(e) => {
                // Fatal for the instance: no count was advanced (capacity
                // grows before the commit point), so the columns stay
                // row-consistent. Record the failure and stop.
                tracing::error!(
                    symbol = %shared.symbol,
                    error = %e,
                    "writer aborting after storage failure"
                );
                *shared.failure.lock() = Some(e.to_string());
                finish_pending(&shared, n);
                break;
            }
        }
    }
    tracing::debug!(symbol = %shared.symbol, "writer exiting");
}

/// Removes up to `max` ticks from the front of the queue.
fn drain(queue: &mut VecDeque<Tick>, max: usize) -> Vec<Tick> {
    let take = queue.len().min(max);
    queue.drain(..take).collect()
}

/// Commits one batch: appends all three columns in a fixed order, flushes
/// their headers, and mirrors the new rows into the index — all under the
/// write lock, which is what makes the rows appear atomically.
fn commit_batch(shared: &DbShared, batch: &[Tick]) -> ColumnResult<()> {
    let mut state = shared.state.write();
    let start = state.timestamps.count();

    if let [tick] = batch {
        state.timestamps.append(&tick.timestamp.to_ne_bytes())?;
        state.prices.append(&tick.price.to_ne_bytes())?;
        state.volumes.append(&tick.volume.to_ne_bytes())?;
    } else {
        // Project the batch into three parallel buffers so each column
        // takes one contiguous append.
        let mut timestamps = BytesMut::with_capacity(batch.len() * COLUMN_SLOT_SIZE);
        let mut prices = BytesMut::with_capacity(batch.len() * COLUMN_SLOT_SIZE);
        let mut volumes = BytesMut::with_capacity(batch.len() * COLUMN_SLOT_SIZE);
        for tick in batch {
            timestamps.put_u64_ne(tick.timestamp);
            prices.put_f64_ne(tick.price);
            volumes.put_u64_ne(tick.volume);
        }
        let n = batch.len() as u64;
        state.timestamps.append_batch(&timestamps, n)?;
        state.prices.append_batch(&prices, n)?;
        state.volumes.append_batch(&volumes, n)?;
    }

    state.timestamps.flush_header()?;
    state.prices.flush_header()?;
    state.volumes.flush_header()?;

    for (k, tick) in batch.iter().enumerate() {
        state.index.insert(tick.timestamp, RowId::new(start + k as u64));
    }
    Ok(())
}

/// Retires `n` pending writes and wakes sync waiters once the queue is
/// fully drained. The notify happens under the drained lock, so a waiter
/// that already checked the counter cannot miss it.
fn finish_pending(shared: &DbShared, n: u64) {
    let remaining = shared.pending_writes.fetch_sub(n, Ordering::AcqRel) - n;
    if remaining == 0 || shared.failure_reason().is_some() {
        let _guard = shared.drained_lock.lock();
        shared.drained_cv.notify_all();
    }
}
