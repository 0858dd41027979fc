//! Region processor.
//!
//! Walks a rectangular region at a given mipmap level chunk-by-chunk. Each
//! chunk is dispatched one of two ways: the default [`Processor::new`]
//! issues a `GET` through the source chain for every tile the chunk
//! overlaps (cache-assisted); [`Processor::new_raw_blit`] instead hands each
//! covered tile's coordinate straight to a caller-supplied callback,
//! bypassing the cache entirely for callers that already have their own
//! destination buffer to write into. Building the actual unbuffered
//! operation graph that would drive that callback is out of scope for this
//! crate (see the module docs at the crate root); only the dispatch-mode
//! selection itself lives here. Chunking lets a caller interleave ticks with
//! other work and check a cooperative-cancellation flag between them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::parallel::Rect;
use crate::source::TileSource;
use crate::tile::Coord;

/// Chunk side lengths a [`Processor`] snaps to, aligning chunk boundaries
/// with common tile-grid sizes.
const CHUNK_SIDE_CANDIDATES: [usize; 3] = [64, 128, 256];

/// Nominal chunk area at mipmap level 0, in pixels.
const BASE_CHUNK_AREA: usize = 256 * 256;

fn chunk_side_for_level(level: u32) -> usize {
    // a chunk covers the same amount of *underlying* (level-0) data at any
    // level, so its pixel footprint at level `z` shrinks by 4^z.
    let shift = (2 * level).min(30);
    let area = (BASE_CHUNK_AREA >> shift).max(CHUNK_SIDE_CANDIDATES[0] * CHUNK_SIDE_CANDIDATES[0]);
    let side = (area as f64).sqrt() as usize;
    CHUNK_SIDE_CANDIDATES
        .iter()
        .copied()
        .find(|&candidate| side <= candidate)
        .unwrap_or(*CHUNK_SIDE_CANDIDATES.last().unwrap())
}

/// Split `region` into a row-major grid of chunks at most `chunk_side` on a
/// side, clipped to the region's bounds.
fn split_region(region: Rect, chunk_side: usize) -> Vec<Rect> {
    let mut chunks = Vec::new();
    let mut y = 0;
    while y < region.height {
        let h = chunk_side.min(region.height - y);
        let mut x = 0;
        while x < region.width {
            let w = chunk_side.min(region.width - x);
            chunks.push(Rect { x: region.x + x, y: region.y + y, width: w, height: h });
            x += w;
        }
        y += h;
    }
    chunks
}

/// Tile coordinates overlapping `rect` (given in level-`level` pixel
/// units) on a grid of `tile_width x tile_height` tiles at level 0.
fn tiles_covering(rect: Rect, tile_width: u32, tile_height: u32, level: u32) -> Vec<Coord> {
    let shift = level.min(30);
    let tw = (tile_width >> shift).max(1) as usize;
    let th = (tile_height >> shift).max(1) as usize;

    let x0 = (rect.x / tw) as i32;
    let x1 = ((rect.x + rect.width).div_ceil(tw).max(1) - 1) as i32;
    let y0 = (rect.y / th) as i32;
    let y1 = ((rect.y + rect.height).div_ceil(th).max(1) - 1) as i32;

    let mut coords = Vec::new();
    for ty in y0..=y1 {
        for tx in x0..=x1 {
            coords.push(Coord::new(tx, ty, level));
        }
    }
    coords
}

/// How [`Processor::process`] turns a covered tile coordinate into work.
enum DispatchMode {
    /// `GET` each covered tile through the source chain.
    Buffered,
    /// Bypass the cache: hand each covered tile's coordinate straight to a
    /// caller-supplied raw blit callback.
    RawBlit(Arc<dyn Fn(Coord) + Send + Sync>),
}

/// Drives a region through a [`TileSource`] chain in bounded chunks,
/// tracking how much of the region has been covered.
pub struct Processor {
    source: Arc<dyn TileSource>,
    tile_width: u32,
    tile_height: u32,
    level: u32,
    queue: Mutex<VecDeque<Rect>>,
    total_area: u64,
    covered_area: AtomicU64,
    mode: DispatchMode,
}

impl Processor {
    /// Build a processor for `region` (in level-`level` pixel units)
    /// against `source`, given the tile grid's level-0 geometry.
    pub fn new(source: Arc<dyn TileSource>, region: Rect, level: u32, tile_width: u32, tile_height: u32) -> Self {
        Self::with_mode(source, region, level, tile_width, tile_height, DispatchMode::Buffered)
    }

    /// Build a processor that bypasses the cache: instead of `GET`ting each
    /// covered tile through `source`, `blit` is called with its coordinate
    /// directly. `source` is still required (e.g. for a caller that wants to
    /// combine raw blits with occasional cache-assisted reads elsewhere) but
    /// `process` never dispatches through it in this mode.
    pub fn new_raw_blit(
        source: Arc<dyn TileSource>,
        region: Rect,
        level: u32,
        tile_width: u32,
        tile_height: u32,
        blit: Arc<dyn Fn(Coord) + Send + Sync>,
    ) -> Self {
        Self::with_mode(source, region, level, tile_width, tile_height, DispatchMode::RawBlit(blit))
    }

    fn with_mode(source: Arc<dyn TileSource>, region: Rect, level: u32, tile_width: u32, tile_height: u32, mode: DispatchMode) -> Self {
        let chunk_side = chunk_side_for_level(level);
        let chunks = split_region(region, chunk_side);
        let total_area = (region.width as u64) * (region.height as u64);
        Processor {
            source,
            tile_width,
            tile_height,
            level,
            queue: Mutex::new(chunks.into()),
            total_area,
            covered_area: AtomicU64::new(0),
            mode,
        }
    }

    /// Process one chunk: dispatch every tile it overlaps per the
    /// processor's [`DispatchMode`]. Returns `false` once the work queue is
    /// empty (nothing left to do).
    pub fn process(&self) -> bool {
        let Some(rect) = self.queue.lock().unwrap().pop_front() else {
            return false;
        };
        for coord in tiles_covering(rect, self.tile_width, self.tile_height, self.level) {
            match &self.mode {
                DispatchMode::Buffered => {
                    self.source.get(coord);
                }
                DispatchMode::RawBlit(blit) => blit(coord),
            }
        }
        self.covered_area.fetch_add((rect.width as u64) * (rect.height as u64), Ordering::Relaxed);
        true
    }

    /// Fraction of the requested region covered so far, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_area == 0 {
            return 1.0;
        }
        self.covered_area.load(Ordering::Relaxed) as f64 / self.total_area as f64
    }

    /// True once every chunk has been processed.
    pub fn is_done(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }

    /// Repeatedly call [`Processor::process`] until the work queue drains
    /// or `should_stop` returns `true` between ticks.
    pub fn run_to_completion(&self, should_stop: impl Fn() -> bool) {
        while !should_stop() {
            if !self.process() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Command, Response};
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        gets: AtomicUsize,
    }

    impl TileSource for CountingSource {
        fn downstream(&self) -> Option<&dyn TileSource> {
            None
        }
        fn dispatch(&self, command: Command) -> Response {
            if let Command::Get { .. } = &command {
                self.gets.fetch_add(1, Ordering::Relaxed);
            }
            self.forward(command)
        }
    }

    #[test]
    fn run_to_completion_reaches_full_progress() {
        let source: Arc<dyn TileSource> = Arc::new(CountingSource { gets: AtomicUsize::new(0) });
        let region = Rect { x: 0, y: 0, width: 300, height: 200 };
        let processor = Processor::new(source, region, 0, 128, 128);
        processor.run_to_completion(|| false);
        assert!(processor.is_done());
        assert!((processor.progress() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn chunking_covers_every_tile_in_the_region() {
        let counting = Arc::new(CountingSource { gets: AtomicUsize::new(0) });
        let source: Arc<dyn TileSource> = counting.clone();
        let region = Rect { x: 0, y: 0, width: 256, height: 256 };
        let processor = Processor::new(source, region, 0, 128, 128);
        processor.run_to_completion(|| false);
        // a 256x256 region on a 128x128 tile grid covers a 2x2 tile block.
        assert!(counting.gets.load(Ordering::Relaxed) >= 4);
    }

    #[test]
    fn raw_blit_mode_bypasses_the_source_and_calls_back_per_tile() {
        let counting = Arc::new(CountingSource { gets: AtomicUsize::new(0) });
        let source: Arc<dyn TileSource> = counting.clone();
        let blitted = Arc::new(AtomicUsize::new(0));
        let blitted_inner = blitted.clone();
        let region = Rect { x: 0, y: 0, width: 256, height: 256 };
        let processor =
            Processor::new_raw_blit(source, region, 0, 128, 128, Arc::new(move |_coord| { blitted_inner.fetch_add(1, Ordering::Relaxed); }));
        processor.run_to_completion(|| false);
        assert!(blitted.load(Ordering::Relaxed) >= 4);
        assert_eq!(counting.gets.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn chunk_side_shrinks_with_level() {
        assert!(chunk_side_for_level(4) <= chunk_side_for_level(0));
    }

    #[test]
    fn stop_flag_halts_before_completion() {
        let source: Arc<dyn TileSource> = Arc::new(CountingSource { gets: AtomicUsize::new(0) });
        let region = Rect { x: 0, y: 0, width: 1024, height: 1024 };
        let processor = Processor::new(source, region, 0, 64, 64);
        let mut ticks = 0;
        processor.run_to_completion(|| {
            ticks += 1;
            ticks > 1
        });
        assert!(!processor.is_done());
    }
}
