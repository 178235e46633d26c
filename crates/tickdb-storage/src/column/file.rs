//! A single fixed-width column backed by a growable memory-mapped file.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use memmap2::{MmapOptions, MmapRaw};
use parking_lot::RwLock;

use tickdb_common::constants::{COLUMN_HEADER_SIZE, GROWTH_CHUNK};

use super::error::{ColumnError, ColumnResult};

/// The mapped span and the slot capacity it covers.
///
/// Replaced wholesale on growth; the lock around it doubles as the growth
/// lock, so a reader holding the shared side can never observe a stale map.
struct Region {
    map: MmapRaw,
    capacity: u64,
}

/// One fixed-width column of a symbol, stored as header + slots in a
/// memory-mapped file.
///
/// The committed count lives in two places: an atomic mirrored into the
/// 8-byte header by [`flush_header`](Self::flush_header) and the
/// destructor. The atomic fetch-add in [`append`](Self::append) is the
/// linearization point for readers; appends themselves are serialized by
/// the engine's writer thread.
pub struct ColumnFile {
    path: PathBuf,
    file: File,
    slot_size: usize,
    growth_chunk: usize,
    committed: AtomicU64,
    region: RwLock<Region>,
}

impl ColumnFile {
    /// Opens or creates the column `name` for `symbol` under `data_dir`.
    ///
    /// A fresh file is pre-extended to one growth chunk with a zero count.
    /// An existing file must carry at least the 8-byte header; its count
    /// is loaded from the header and validated against the capacity
    /// implied by the file size.
    pub fn open(
        data_dir: &Path,
        symbol: &str,
        name: &str,
        slot_size: usize,
    ) -> ColumnResult<Self> {
        Self::open_with_chunk(data_dir, symbol, name, slot_size, GROWTH_CHUNK)
    }

    /// Opens a column with a custom growth chunk (in bytes).
    pub fn open_with_chunk(
        data_dir: &Path,
        symbol: &str,
        name: &str,
        slot_size: usize,
        growth_chunk: usize,
    ) -> ColumnResult<Self> {
        assert!(slot_size > 0, "slot size must be positive");
        assert!(growth_chunk > 0, "growth chunk must be positive");

        let symbol_dir = data_dir.join(symbol);
        std::fs::create_dir_all(&symbol_dir).map_err(|e| ColumnError::io(&symbol_dir, e))?;
        let path = symbol_dir.join(format!("{name}.bin"));

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(&path)
            .map_err(|e| ColumnError::io(&path, e))?;
        let len = file.metadata().map_err(|e| ColumnError::io(&path, e))?.len();

        let fresh = len == 0;
        let capacity = if fresh {
            let capacity = initial_capacity(slot_size, growth_chunk);
            let file_len = COLUMN_HEADER_SIZE as u64 + capacity * slot_size as u64;
            file.set_len(file_len).map_err(|e| ColumnError::io(&path, e))?;
            capacity
        } else if len < COLUMN_HEADER_SIZE as u64 {
            return Err(ColumnError::invalid_format(
                &path,
                format!("{len} bytes is shorter than the {COLUMN_HEADER_SIZE}-byte header"),
            ));
        } else {
            (len - COLUMN_HEADER_SIZE as u64) / slot_size as u64
        };

        let map = MmapOptions::new()
            .map_raw(&file)
            .map_err(|e| ColumnError::io(&path, e))?;

        let committed = if fresh {
            write_header(&map, 0);
            0
        } else {
            let committed = read_header(&map);
            if committed > capacity {
                return Err(ColumnError::invalid_format(
                    &path,
                    format!("header count {committed} exceeds capacity {capacity}"),
                ));
            }
            committed
        };

        tracing::debug!(
            path = %path.display(),
            count = committed,
            capacity,
            "column opened"
        );

        Ok(Self {
            path,
            file,
            slot_size,
            growth_chunk,
            committed: AtomicU64::new(committed),
            region: RwLock::new(Region { map, capacity }),
        })
    }

    /// Returns the path of the column file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the slot width in bytes.
    pub fn slot_size(&self) -> usize {
        self.slot_size
    }

    /// Returns the committed element count.
    #[inline]
    pub fn count(&self) -> u64 {
        self.committed.load(Ordering::Acquire)
    }

    /// Returns the current slot capacity of the file.
    pub fn capacity(&self) -> u64 {
        self.region.read().capacity
    }

    /// Appends one element, returning its slot index.
    pub fn append(&self, slot: &[u8]) -> ColumnResult<u64> {
        debug_assert_eq!(slot.len(), self.slot_size);
        self.append_batch(slot, 1)
    }

    /// Appends `n` contiguous elements from `data`, returning the index of
    /// the first one.
    ///
    /// The count fetch-add reserves the whole range at once, so the new
    /// elements become visible to readers together.
    pub fn append_batch(&self, data: &[u8], n: u64) -> ColumnResult<u64> {
        debug_assert_eq!(data.len() as u64, n * self.slot_size as u64);
        if n == 0 {
            return Ok(self.count());
        }

        // Capacity is grown before the count advances; a growth failure
        // therefore leaves the committed range untouched.
        let region = loop {
            let region = self.region.read();
            let needed = self.committed.load(Ordering::Acquire) + n;
            if needed <= region.capacity {
                break region;
            }
            drop(region);
            self.grow(needed)?;
        };

        let start = self.committed.fetch_add(n, Ordering::AcqRel);
        let offset = COLUMN_HEADER_SIZE + start as usize * self.slot_size;
        // Safety: `start..start + n` was reserved above and lies inside the
        // mapped span; the shared guard pins the mapping for the copy.
        unsafe {
            std::ptr::copy_nonoverlapping(
                data.as_ptr(),
                region.map.as_mut_ptr().add(offset),
                data.len(),
            );
        }
        region
            .map
            .flush_async_range(offset, data.len())
            .map_err(|e| ColumnError::io(&self.path, e))?;
        Ok(start)
    }

    /// Copies the element at `index` into `out`.
    ///
    /// Fails with [`ColumnError::OutOfRange`] when `index` is at or beyond
    /// the committed count. Reads never block appends.
    pub fn read(&self, index: u64, out: &mut [u8]) -> ColumnResult<()> {
        debug_assert_eq!(out.len(), self.slot_size);
        let count = self.committed.load(Ordering::Acquire);
        if index >= count {
            return Err(ColumnError::OutOfRange { index, count });
        }
        let region = self.region.read();
        let offset = COLUMN_HEADER_SIZE + index as usize * self.slot_size;
        // Safety: the bounds check above keeps the copy within committed,
        // mapped slots.
        unsafe {
            std::ptr::copy_nonoverlapping(
                region.map.as_ptr().add(offset),
                out.as_mut_ptr(),
                self.slot_size,
            );
        }
        Ok(())
    }

    /// Reads the element at `index` as a native-endian `u64`.
    pub fn read_u64(&self, index: u64) -> ColumnResult<u64> {
        debug_assert_eq!(self.slot_size, 8);
        let mut buf = [0u8; 8];
        self.read(index, &mut buf)?;
        Ok(u64::from_ne_bytes(buf))
    }

    /// Reads the element at `index` as a native-endian `f64`.
    pub fn read_f64(&self, index: u64) -> ColumnResult<f64> {
        debug_assert_eq!(self.slot_size, 8);
        let mut buf = [0u8; 8];
        self.read(index, &mut buf)?;
        Ok(f64::from_ne_bytes(buf))
    }

    /// Mirrors the committed count into the on-disk header and queues it
    /// for write-back.
    pub fn flush_header(&self) -> ColumnResult<()> {
        let region = self.region.read();
        write_header(&region.map, self.committed.load(Ordering::Acquire));
        region
            .map
            .flush_async_range(0, COLUMN_HEADER_SIZE)
            .map_err(|e| ColumnError::io(&self.path, e))
    }

    /// Extends the file and remaps it so that at least `needed` slots fit.
    ///
    /// Callers recheck capacity after taking the lock: another thread may
    /// already have grown the file.
    fn grow(&self, needed: u64) -> ColumnResult<()> {
        let mut region = self.region.write();
        if needed <= region.capacity {
            return Ok(());
        }

        let chunk_slots = (self.growth_chunk / self.slot_size) as u64;
        let mut capacity = region.capacity;
        while capacity < needed {
            // Chunked growth; double when the slot size swallows the chunk.
            let next = capacity + chunk_slots;
            capacity = if next > capacity { next } else { capacity * 2 };
        }

        let file_len = COLUMN_HEADER_SIZE as u64 + capacity * self.slot_size as u64;
        self.file
            .set_len(file_len)
            .map_err(|e| ColumnError::io(&self.path, e))?;
        let map = MmapOptions::new()
            .map_raw(&self.file)
            .map_err(|e| ColumnError::io(&self.path, e))?;

        tracing::debug!(
            path = %self.path.display(),
            old_capacity = region.capacity,
            new_capacity = capacity,
            "column grown"
        );

        *region = Region { map, capacity };
        Ok(())
    }
}

impl Drop for ColumnFile {
    fn drop(&mut self) {
        let region = self.region.get_mut();
        write_header(&region.map, *self.committed.get_mut());
        // Strengthen the final header write to a synchronous flush; data
        // slots were already queued by the per-append async flushes.
        if let Err(e) = region.map.flush() {
            tracing::warn!(path = %self.path.display(), error = %e, "final column flush failed");
        }
    }
}

impl std::fmt::Debug for ColumnFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnFile")
            .field("path", &self.path)
            .field("slot_size", &self.slot_size)
            .field("count", &self.count())
            .field("capacity", &self.capacity())
            .finish()
    }
}

/// Initial slot capacity of a fresh file: one growth chunk, but never zero.
fn initial_capacity(slot_size: usize, growth_chunk: usize) -> u64 {
    ((growth_chunk / slot_size) as u64).max(1)
}

fn read_header(map: &MmapRaw) -> u64 {
    let mut buf = [0u8; COLUMN_HEADER_SIZE];
    // Safety: every mapping spans at least the header.
    unsafe {
        std::ptr::copy_nonoverlapping(map.as_ptr(), buf.as_mut_ptr(), COLUMN_HEADER_SIZE);
    }
    u64::from_ne_bytes(buf)
}

fn write_header(map: &MmapRaw, count: u64) {
    let bytes = count.to_ne_bytes();
    // Safety: every mapping spans at least the header.
    unsafe {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), map.as_mut_ptr(), COLUMN_HEADER_SIZE);
    }
}
