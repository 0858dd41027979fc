//! Asynchronous compressed swap backend.
//!
//! A single writer thread owns the
//! swap file; producing threads never block on disk I/O themselves except
//! when the write queue is full. Writes to the same tile before the writer
//! gets to them coalesce in place rather than piling up; the
//! free extents of the file are tracked as an in-memory [`gap_list::GapList`]
//! rather than relying on filesystem holes.

mod compression;
mod gap_list;

use std::collections::{HashMap, VecDeque};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write as _};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::backend::base::{TileBackendBase, TileFormat};
use crate::config::SwapCompression;
use crate::error::Result;
use crate::source::{Command, Response, TileSource};
use crate::tile::{Coord, Tile};

pub use compression::Compressor;
use compression::{codec_for, COMPRESSION_MAX_RATIO};

/// File is grown by this multiple of the block being written when no gap
/// fits it.
const FILE_GROWTH_FACTOR: u64 = 32;

#[derive(Clone, Copy)]
struct BlockState {
    /// `None` until the writer thread has actually placed the bytes.
    offset: Option<u64>,
    on_disk_size: u64,
    payload_size: usize,
    compression: Option<&'static str>,
}

/// One physical on-disk allocation, possibly shared by several
/// `(x, y, z)` index entries through [`SwapBackend::copy`].
struct SwapBlock {
    state: Mutex<BlockState>,
    /// Number of index entries currently pointing at this block. When it
    /// drops to zero the block is destroyed.
    entry_refs: AtomicUsize,
}

impl SwapBlock {
    fn new_unwritten(payload_size: usize) -> Arc<Self> {
        Arc::new(SwapBlock {
            state: Mutex::new(BlockState {
                offset: None,
                on_disk_size: 0,
                payload_size,
                compression: None,
            }),
            entry_refs: AtomicUsize::new(1),
        })
    }
}

enum QueueOp {
    Write { coord: Coord, block: Arc<SwapBlock>, payload: Vec<u8> },
    Destroy { block: Arc<SwapBlock> },
}

impl QueueOp {
    fn byte_cost(&self) -> u64 {
        match self {
            QueueOp::Write { payload, .. } => payload.len() as u64,
            QueueOp::Destroy { .. } => 0,
        }
    }

    fn targets(&self, block: &Arc<SwapBlock>) -> bool {
        match self {
            QueueOp::Write { block: b, .. } | QueueOp::Destroy { block: b } => Arc::ptr_eq(b, block),
        }
    }
}

struct QueueState {
    ops: VecDeque<QueueOp>,
    queued_bytes: u64,
    exit: bool,
}

/// Shared state guarding the swap file itself: the gap list, the kernel
/// file-position trackers, and the index from tile coordinates to blocks.
struct FileState {
    file: File,
    file_size: u64,
    out_offset: u64,
    gaps: gap_list::GapList,
}

/// Asynchronous, optionally-compressed spill-to-disk tile backend.
pub struct SwapBackend {
    base: TileBackendBase,
    index: Mutex<HashMap<Coord, Arc<SwapBlock>>>,
    queue: Arc<(Mutex<QueueState>, Condvar, Condvar)>, // (state, not_empty, not_full)
    file_state: Arc<Mutex<FileState>>,
    read_lock: Arc<Mutex<File>>,
    queue_max: AtomicU64,
    compressor: Option<Arc<dyn Compressor>>,
    writer: Option<JoinHandle<()>>,
}

impl SwapBackend {
    /// Create (or truncate) `path` as the swap file and start the writer
    /// thread. `queue_max` bounds the in-flight write queue.
    pub fn new(
        path: PathBuf,
        format: TileFormat,
        compression: &SwapCompression,
        queue_max: u64,
    ) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).create(true).truncate(true).open(&path)?;
        let read_file = OpenOptions::new().read(true).open(&path)?;

        let file_state = Arc::new(Mutex::new(FileState {
            file,
            file_size: 0,
            out_offset: 0,
            gaps: gap_list::GapList::new(),
        }));
        let queue = Arc::new((Mutex::new(QueueState { ops: VecDeque::new(), queued_bytes: 0, exit: false }), Condvar::new(), Condvar::new()));

        let compressor = codec_for(compression);

        let writer_queue = queue.clone();
        let writer_file_state = file_state.clone();
        let writer_compressor = compressor.clone();
        let writer = std::thread::Builder::new()
            .name("vfx-tile-swap-writer".into())
            .spawn(move || writer_loop(writer_queue, writer_file_state, writer_compressor))
            .expect("spawning the swap writer thread");

        Ok(SwapBackend {
            base: TileBackendBase::new(format),
            index: Mutex::new(HashMap::new()),
            queue,
            file_state,
            read_lock: Arc::new(Mutex::new(read_file)),
            queue_max: AtomicU64::new(queue_max),
            compressor,
            writer: Some(writer),
        })
    }

    /// Update the write-queue byte budget.
    pub fn set_queue_max(&self, queue_max: u64) {
        self.queue_max.store(queue_max, Ordering::Relaxed);
        let (_, _, not_full) = &*self.queue;
        not_full.notify_all();
    }

    /// Total bytes currently occupying the swap file (allocated extents).
    pub fn total_allocated(&self) -> u64 {
        self.file_state.lock().unwrap().gaps.total_allocated()
    }

    /// Current swap file length, including any unallocated gaps.
    pub fn file_size(&self) -> u64 {
        self.file_state.lock().unwrap().file_size
    }

    /// On-disk byte offset of `coord`'s block, once the writer thread has
    /// actually placed it. `None` if `coord` has no block, or the write is
    /// still queued.
    pub fn block_offset(&self, coord: Coord) -> Option<u64> {
        let block = self.index.lock().unwrap().get(&coord)?.clone();
        block.state.lock().unwrap().offset
    }

    fn enqueue_write(&self, coord: Coord, block: Arc<SwapBlock>, payload: Vec<u8>) {
        let (state_lock, not_empty, not_full) = &*self.queue;
        let mut state = state_lock.lock().unwrap();

        if let Some(existing) = state.ops.iter_mut().find(|op| op.targets(&block)) {
            if let QueueOp::Write { payload: existing_payload, .. } = existing {
                state.queued_bytes -= existing_payload.len() as u64;
                state.queued_bytes += payload.len() as u64;
                *existing_payload = payload;
                not_empty.notify_one();
                return;
            }
            // a pending Destroy for this block means void() raced ahead of
            // us; treat this as a fresh write replacing it.
            state.queued_bytes += payload.len() as u64;
            *existing = QueueOp::Write { coord, block, payload };
            not_empty.notify_one();
            return;
        }

        let mut payload = payload;
        while state.queued_bytes + payload.len() as u64 > self.queue_max.load(Ordering::Relaxed) {
            if let Some(compressor) = &self.compressor {
                if let Some(shrunk) = compress_if_worthwhile(compressor.as_ref(), &payload) {
                    payload = shrunk;
                    continue;
                }
            }
            state = not_full.wait(state).unwrap();
        }

        state.queued_bytes += payload.len() as u64;
        state.ops.push_back(QueueOp::Write { coord, block, payload });
        not_empty.notify_one();
    }
}

impl Drop for SwapBackend {
    fn drop(&mut self) {
        let (state_lock, not_empty, _) = &*self.queue;
        state_lock.lock().unwrap().exit = true;
        not_empty.notify_all();
        if let Some(handle) = self.writer.take() {
            let _ = handle.join();
        }
    }
}

impl TileSource for SwapBackend {
    fn downstream(&self) -> Option<&dyn TileSource> {
        None
    }

    fn dispatch(&self, command: Command) -> Response {
        match command {
            Command::Get { coord } => Response::Tile(self.do_get(coord)),
            Command::Set { coord, tile } => {
                self.do_set(coord, tile);
                Response::None
            }
            Command::Exist { coord } | Command::IsCached { coord } => {
                Response::Bool(self.do_exist(coord))
            }
            Command::Void { coord, .. } => {
                self.do_void(coord);
                Response::None
            }
            Command::Copy { src, dst } => Response::Bool(self.do_copy(src, dst)),
            Command::Flush => {
                self.do_flush();
                Response::None
            }
            other => Self::terminal_response(&other),
        }
    }
}

impl SwapBackend {
    fn do_set(&self, coord: Coord, tile: Tile) {
        if tile.is_zero_tile() {
            // the zero tile's bytes are the process-wide all-zero page;
            // writing it through to disk would waste writer-thread and
            // swap-file capacity for content trivially reconstructible
            // without ever touching the backend.
            return;
        }
        let payload = tile.read_lock().bytes().as_slice().to_vec();
        let block = {
            let mut index = self.index.lock().unwrap();
            index
                .entry(coord)
                .and_modify(|_| {})
                .or_insert_with(|| SwapBlock::new_unwritten(payload.len()))
                .clone()
        };
        self.enqueue_write(coord, block, payload);
    }

    fn do_get(&self, coord: Coord) -> Option<Tile> {
        let block = self.index.lock().unwrap().get(&coord)?.clone();

        // serve straight from the queue if a write/destroy is pending,
        // per "Open question": reading the queued payload is
        // serialised through the same queue mutex that guards enqueueing,
        // rather than trusting the single-writer-thread argument alone.
        {
            let (state_lock, _, _) = &*self.queue;
            let state = state_lock.lock().unwrap();
            match state.ops.iter().rev().find(|op| op.targets(&block)) {
                Some(QueueOp::Destroy { .. }) => return None,
                Some(QueueOp::Write { payload, .. }) => {
                    let tile = Tile::new(coord, payload.len());
                    tile.store(payload.clone());
                    return Some(tile);
                }
                None => {}
            }
        }

        let state = block.state.lock().unwrap();
        let offset = state.offset?;
        let on_disk_size = state.on_disk_size;
        let payload_size = state.payload_size;
        let compression = state.compression;
        drop(state);

        let mut read_guard = self.read_lock.lock().unwrap();
        let mut bytes = vec![0u8; on_disk_size as usize];
        read_guard.seek(SeekFrom::Start(offset)).ok()?;
        read_guard.read_exact(&mut bytes).ok()?;
        drop(read_guard);

        let bytes = match compression {
            Some(name) => {
                let codec = compression::by_name(name)?;
                codec.decompress(&bytes, payload_size).ok()?
            }
            None => bytes,
        };

        let tile = Tile::new(coord, bytes.len());
        tile.store(bytes);
        Some(tile)
    }

    fn do_exist(&self, coord: Coord) -> bool {
        self.index.lock().unwrap().contains_key(&coord)
    }

    fn do_void(&self, coord: Coord) {
        let block = {
            let mut index = self.index.lock().unwrap();
            index.remove(&coord)
        };
        let Some(block) = block else {
            tracing::warn!(?coord, "void on an untracked swap coordinate");
            return;
        };

        if block.entry_refs.fetch_sub(1, Ordering::AcqRel) != 1 {
            return; // other entries (from `copy`) still reference this block.
        }

        let (state_lock, not_empty, _) = &*self.queue;
        let mut state = state_lock.lock().unwrap();
        if let Some(pos) = state.ops.iter().position(|op| op.targets(&block)) {
            let existing = state.ops.remove(pos).unwrap();
            state.queued_bytes -= existing.byte_cost();
        }
        state.ops.push_front(QueueOp::Destroy { block });
        not_empty.notify_one();
    }

    fn do_copy(&self, src: Coord, dst: Coord) -> bool {
        let mut index = self.index.lock().unwrap();
        let Some(block) = index.get(&src).cloned() else {
            return false;
        };
        block.entry_refs.fetch_add(1, Ordering::AcqRel);
        if let Some(replaced) = index.insert(dst, block) {
            drop(index);
            if replaced.entry_refs.fetch_sub(1, Ordering::AcqRel) == 1 {
                let (state_lock, not_empty, _) = &*self.queue;
                let mut state = state_lock.lock().unwrap();
                state.ops.push_front(QueueOp::Destroy { block: replaced });
                not_empty.notify_one();
            }
        }
        true
    }

    fn do_flush(&self) {
        // the writer thread drains the queue continuously; flush just waits
        // for it to catch up.
        let (state_lock, _, not_full) = &*self.queue;
        let mut state = state_lock.lock().unwrap();
        while !state.ops.is_empty() {
            state = not_full.wait_timeout(state, std::time::Duration::from_millis(5)).unwrap().0;
        }
    }
}

fn compress_if_worthwhile(compressor: &dyn Compressor, payload: &[u8]) -> Option<Vec<u8>> {
    let compressed = compressor.compress(payload)?;
    let ratio = compressed.len() as f64 / payload.len().max(1) as f64;
    if ratio <= COMPRESSION_MAX_RATIO { Some(compressed) } else { None }
}

fn writer_loop(
    queue: Arc<(Mutex<QueueState>, Condvar, Condvar)>,
    file_state: Arc<Mutex<FileState>>,
    compressor: Option<Arc<dyn Compressor>>,
) {
    let (state_lock, not_empty, not_full) = &*queue;
    loop {
        let op = {
            let mut state = state_lock.lock().unwrap();
            while state.ops.is_empty() && !state.exit {
                state = not_empty.wait(state).unwrap();
            }
            if state.ops.is_empty() && state.exit {
                return;
            }
            let op = state.ops.pop_front().unwrap();
            state.queued_bytes = state.queued_bytes.saturating_sub(op.byte_cost());
            not_full.notify_all();
            op
        };

        match op {
            QueueOp::Write { block, payload, .. } => {
                run_write(&file_state, &block, payload, compressor.as_deref());
            }
            QueueOp::Destroy { block } => {
                run_destroy(&file_state, &block);
            }
        }
    }
}

fn run_write(file_state: &Mutex<FileState>, block: &SwapBlock, payload: Vec<u8>, compressor: Option<&dyn Compressor>) {
    let (bytes, codec_name): (Vec<u8>, Option<&'static str>) = match compressor {
        Some(c) => match compress_if_worthwhile(c, &payload) {
            Some(shrunk) => (shrunk, Some(c.name())),
            None => (payload.clone(), None),
        },
        None => (payload.clone(), None),
    };

    let mut fs = file_state.lock().unwrap();

    let mut block_state = block.state.lock().unwrap();
    if let Some(old_offset) = block_state.offset {
        if block_state.on_disk_size != bytes.len() as u64 {
            fs.gaps.free(old_offset, block_state.on_disk_size);
        }
    }

    let offset = match fs.gaps.alloc(bytes.len() as u64) {
        Some(offset) => offset,
        None => {
            let growth = (bytes.len() as u64 * FILE_GROWTH_FACTOR).max(bytes.len() as u64);
            let offset = fs.file_size;
            if let Err(e) = fs.file.set_len(fs.file_size + growth) {
                tracing::warn!(error = %e, "swap file growth failed; abandoning write");
                return;
            }
            fs.gaps.add_capacity(fs.file_size, growth);
            fs.file_size += growth;
            fs.gaps.alloc(bytes.len() as u64).unwrap_or(offset)
        }
    };

    if fs.out_offset != offset {
        if let Err(e) = fs.file.seek(SeekFrom::Start(offset)) {
            tracing::warn!(error = %e, "swap seek failed; abandoning write");
            return;
        }
    }
    if let Err(e) = fs.file.write_all(&bytes) {
        tracing::warn!(error = %e, "swap write failed; tile remains authoritative in memory");
        return;
    }
    fs.out_offset = offset + bytes.len() as u64;

    block_state.offset = Some(offset);
    block_state.on_disk_size = bytes.len() as u64;
    block_state.payload_size = payload.len();
    block_state.compression = codec_name;
}

fn run_destroy(file_state: &Mutex<FileState>, block: &SwapBlock) {
    let block_state = block.state.lock().unwrap();
    if let Some(offset) = block_state.offset {
        file_state.lock().unwrap().gaps.free(offset, block_state.on_disk_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(dir: &tempfile::TempDir, queue_max: u64) -> SwapBackend {
        SwapBackend::new(
            dir.path().join("swap-test"),
            TileFormat::new(4, 4, 1),
            &SwapCompression::None,
            queue_max,
        )
        .unwrap()
    }

    #[test]
    fn round_trip_write_flush_read() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir, 1 << 20);
        let coord = Coord::new(0, 0, 0);
        let tile = Tile::new(coord, 16);
        tile.store(vec![7; 16]);
        backend.set(coord, tile);
        backend.do_flush();

        let fetched = backend.do_get(coord).unwrap();
        assert_eq!(fetched.read_lock().bytes().as_slice(), &[7; 16]);
    }

    #[test]
    fn queue_coalesces_multiple_writes_before_flush() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir, 1 << 20);
        let coord = Coord::new(0, 0, 0);

        for v in 0u8..10 {
            let tile = Tile::new(coord, 4);
            tile.store(vec![v; 4]);
            backend.set(coord, tile);
        }
        {
            let (state_lock, _, _) = &*backend.queue;
            // exactly one queued write op for this coordinate: coalescing,
            // not ten separate enqueues.
            assert_eq!(state_lock.lock().unwrap().ops.len(), 1);
        }
        backend.do_flush();
        let fetched = backend.do_get(coord).unwrap();
        assert_eq!(fetched.read_lock().bytes().as_slice(), &[9; 4]);
    }

    #[test]
    fn void_removes_tile_and_frees_its_extent() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir, 1 << 20);
        let coord = Coord::new(1, 1, 0);
        let tile = Tile::new(coord, 8);
        tile.store(vec![3; 8]);
        backend.set(coord, tile);
        backend.do_flush();
        assert!(backend.exists(coord));

        backend.do_void(coord);
        assert!(!backend.exists(coord));
        assert!(backend.do_get(coord).is_none());
    }

    #[test]
    fn copy_shares_block_without_duplicating_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir, 1 << 20);
        let src = Coord::new(0, 0, 0);
        let dst = Coord::new(1, 0, 0);
        let tile = Tile::new(src, 8);
        tile.store(vec![5; 8]);
        backend.set(src, tile);
        backend.do_flush();

        assert!(backend.do_copy(src, dst));
        let copied = backend.do_get(dst).unwrap();
        assert_eq!(copied.read_lock().bytes().as_slice(), &[5; 8]);

        backend.do_void(src);
        // the destination entry still references the shared block.
        assert!(backend.do_get(dst).is_some());
    }

    #[test]
    fn gap_reuse_places_new_block_in_freed_hole() {
        let dir = tempfile::tempdir().unwrap();
        let backend = backend(&dir, 1 << 20);

        let a = Coord::new(0, 0, 0);
        let b = Coord::new(1, 0, 0);
        let ta = Tile::new(a, 1024);
        ta.store(vec![1; 1024]);
        backend.set(a, ta);
        backend.do_flush();

        let tb = Tile::new(b, 2048);
        tb.store(vec![2; 2048]);
        backend.set(b, tb);
        backend.do_flush();

        let a_offset = backend.index.lock().unwrap().get(&a).unwrap().state.lock().unwrap().offset.unwrap();
        assert_eq!(a_offset, 0);

        backend.do_void(a);
        backend.do_flush();

        let c = Coord::new(2, 0, 0);
        let tc = Tile::new(c, 1024);
        tc.store(vec![3; 1024]);
        backend.set(c, tc);
        backend.do_flush();

        let c_offset = backend.index.lock().unwrap().get(&c).unwrap().state.lock().unwrap().offset.unwrap();
        assert_eq!(c_offset, 0, "first-fit should reuse the gap left by voiding `a`");
    }
}
