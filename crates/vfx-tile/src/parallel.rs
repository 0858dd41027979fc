//! Worker-pool dispatcher.
//!
//! Built on a dedicated [`rayon::ThreadPool`] the way [`vfx_ops::parallel`]
//! uses the global rayon pool for image kernels — the difference here is
//! that a [`crate::context::TileStore`] owns its own pool (sized from
//! [`crate::config::TileStoreConfig::threads`]) rather than sharing the
//! process-wide default, and every call goes through [`Dispatcher::distribute`]
//! so nested calls collapse to serial execution instead of deadlocking or
//! oversubscribing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

/// How [`Dispatcher::distribute_area`] should cut a rectangle into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Cut along rows (each chunk spans the full width).
    Horizontal,
    /// Cut along columns (each chunk spans the full height).
    Vertical,
    /// Cut along whichever of width/height is larger.
    Longest,
}

/// A sub-rectangle handed to a [`Dispatcher::distribute_area`] callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    /// Left edge, in the same units as the area passed to `distribute_area`.
    pub x: usize,
    /// Top edge.
    pub y: usize,
    /// Width of this chunk.
    pub width: usize,
    /// Height of this chunk.
    pub height: usize,
}

/// Partitions work across a fixed-size thread pool with an analytically
/// chosen thread count.
pub struct Dispatcher {
    pool: rayon::ThreadPool,
    pool_size: usize,
    /// Measured per-thread dispatch overhead, in nanoseconds.
    thread_cost_ns: AtomicU64,
    /// Re-entrancy guard: sibling calls from inside a `distribute` callback
    /// run serially instead of nesting pool work.
    busy: AtomicBool,
}

impl Dispatcher {
    /// Build a dispatcher with `pool_size` worker threads, measuring the initial
    /// thread dispatch cost immediately.
    pub fn new(pool_size: usize) -> Self {
        let pool_size = pool_size.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(pool_size)
            .thread_name(|i| format!("vfx-tile-worker-{i}"))
            .build()
            .expect("building the tile worker pool");

        let dispatcher = Dispatcher {
            pool,
            pool_size,
            thread_cost_ns: AtomicU64::new(0),
            busy: AtomicBool::new(false),
        };
        dispatcher.remeasure_thread_cost();
        dispatcher
    }

    /// Worker count this dispatcher was built with.
    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Re-measure per-thread dispatch overhead as the median of 10 NOP
    /// round-trips through the pool. Call this after resizing the
    /// pool (a fresh [`Dispatcher`] does this automatically).
    pub fn remeasure_thread_cost(&self) {
        if self.pool_size <= 1 {
            self.thread_cost_ns.store(0, Ordering::Relaxed);
            return;
        }
        let mut samples = [0u64; 10];
        for sample in &mut samples {
            let start = Instant::now();
            self.pool.install(|| {});
            *sample = start.elapsed().as_nanos() as u64;
        }
        samples.sort_unstable();
        self.thread_cost_ns.store(samples[samples.len() / 2], Ordering::Relaxed);
    }

    /// The analytically optimal thread count for `n_elements` units of work,
    /// clamped to `[1, pool_size]`.
    ///
    /// Minimises `work/threads + thread_cost * threads` by solving for the
    /// zero of its derivative: `threads = (c + sqrt(c*(c + 4n))) / (2c)`,
    /// where `c` is the measured per-thread dispatch cost and `n` is
    /// `n_elements`.
    pub fn optimal_threads(&self, n_elements: usize) -> usize {
        if n_elements <= 1 || self.pool_size <= 1 {
            return 1;
        }
        let c = self.thread_cost_ns.load(Ordering::Relaxed) as f64;
        if c <= 0.0 {
            return self.pool_size;
        }
        let n = n_elements as f64;
        let threads = (c + (c * (c + 4.0 * n)).sqrt()) / (2.0 * c);
        (threads.round() as usize).clamp(1, self.pool_size)
    }

    /// Run `f(i, n)` for `i` in `0..n`, `n = max_n.clamp(1, pool_size)`, in
    /// parallel across the pool. A nested call (from inside another
    /// `distribute` callback) runs `f(0, 1)` serially instead.
    pub fn distribute<F>(&self, max_n: usize, f: F)
    where
        F: Fn(usize, usize) + Sync,
    {
        if self.busy.swap(true, Ordering::AcqRel) {
            f(0, 1);
            return;
        }

        let n = max_n.clamp(1, self.pool_size);
        if n <= 1 {
            f(0, 1);
        } else {
            self.pool.install(|| {
                use rayon::prelude::*;
                (0..n).into_par_iter().for_each(|i| f(i, n));
            });
        }

        self.busy.store(false, Ordering::Release);
    }

    /// Split a linear extent of `size` units into contiguous, roughly equal
    /// sub-ranges of at least `min_sub_size` units each, running `f(start,
    /// len)` on each in parallel.
    pub fn distribute_range<F>(&self, size: usize, min_sub_size: usize, f: F)
    where
        F: Fn(usize, usize) + Sync,
    {
        if size == 0 {
            return;
        }
        let min_sub_size = min_sub_size.max(1);
        let max_splits = (size / min_sub_size).max(1);
        let n = self.optimal_threads(size).min(max_splits);

        self.distribute(n, |i, n| {
            let (start, len) = chunk_bounds(size, i, n);
            if len > 0 {
                f(start, len);
            }
        });
    }

    /// Split a rectangle into chunks along `split`, running `f(rect)` on
    /// each in parallel, each chunk covering at least `min_sub_area` pixels.
    pub fn distribute_area<F>(&self, area: Rect, min_sub_area: usize, split: SplitAxis, f: F)
    where
        F: Fn(Rect) + Sync,
    {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let axis = match split {
            SplitAxis::Horizontal => SplitAxis::Horizontal,
            SplitAxis::Vertical => SplitAxis::Vertical,
            SplitAxis::Longest => {
                if area.width >= area.height {
                    SplitAxis::Vertical
                } else {
                    SplitAxis::Horizontal
                }
            }
        };

        match axis {
            SplitAxis::Vertical => {
                let min_sub_w = (min_sub_area / area.height.max(1)).max(1);
                self.distribute_range(area.width, min_sub_w, |x0, w| {
                    f(Rect { x: area.x + x0, y: area.y, width: w, height: area.height });
                });
            }
            SplitAxis::Horizontal => {
                let min_sub_h = (min_sub_area / area.width.max(1)).max(1);
                self.distribute_range(area.height, min_sub_h, |y0, h| {
                    f(Rect { x: area.x, y: area.y + y0, width: area.width, height: h });
                });
            }
            SplitAxis::Longest => unreachable!("resolved above"),
        }
    }
}

/// `[start, start+len)` of the `i`th of `n` roughly-equal chunks covering
/// `size` units, with any remainder distributed to the earliest chunks.
fn chunk_bounds(size: usize, i: usize, n: usize) -> (usize, usize) {
    let base = size / n;
    let extra = size % n;
    let start = i * base + i.min(extra);
    let len = base + if i < extra { 1 } else { 0 };
    (start, len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;

    #[test]
    fn distribute_covers_every_index_exactly_once() {
        let dispatcher = Dispatcher::new(4);
        let seen = Mutex::new(Vec::new());
        dispatcher.distribute(4, |i, _n| {
            seen.lock().unwrap().push(i);
        });
        let mut seen = seen.into_inner().unwrap();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn nested_distribute_runs_serially() {
        let dispatcher = Dispatcher::new(4);
        let nested_n = AtomicUsize::new(99);
        dispatcher.distribute(4, |_i, _n| {
            dispatcher.distribute(4, |_j, inner_n| {
                nested_n.store(inner_n, Ordering::SeqCst);
            });
        });
        assert_eq!(nested_n.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distribute_range_covers_size_with_no_overlap() {
        let dispatcher = Dispatcher::new(4);
        let covered = Mutex::new(vec![false; 97]);
        dispatcher.distribute_range(97, 1, |start, len| {
            let mut covered = covered.lock().unwrap();
            for i in start..start + len {
                assert!(!covered[i], "index {i} covered twice");
                covered[i] = true;
            }
        });
        assert!(covered.into_inner().unwrap().iter().all(|&c| c));
    }

    #[test]
    fn distribute_range_respects_min_sub_size() {
        let dispatcher = Dispatcher::new(8);
        let chunk_count = AtomicUsize::new(0);
        dispatcher.distribute_range(100, 60, |_start, len| {
            assert!(len >= 1);
            chunk_count.fetch_add(1, Ordering::SeqCst);
        });
        // 100 / 60 rounds down to 1 usable split.
        assert_eq!(chunk_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn distribute_area_longest_picks_vertical_for_wide_rect() {
        let dispatcher = Dispatcher::new(4);
        let wide = Rect { x: 0, y: 0, width: 400, height: 10 };
        let widths = Mutex::new(Vec::new());
        dispatcher.distribute_area(wide, 1, SplitAxis::Longest, |r| {
            widths.lock().unwrap().push(r.width);
            assert_eq!(r.height, 10);
        });
        assert!(widths.into_inner().unwrap().iter().sum::<usize>() == 400);
    }

    #[test]
    fn optimal_threads_clamps_to_pool_size() {
        let dispatcher = Dispatcher::new(4);
        assert_eq!(dispatcher.optimal_threads(0), 1);
        assert!(dispatcher.optimal_threads(1_000_000) <= 4);
    }
}
