//! LRU cache handler: per-buffer tile cache plus the
//! process-wide accounting and wash/trim eviction loop that bounds total
//! resident memory across every buffer sharing a [`CacheRegistry`].
//!
//! The per-cache LRU uses a `HashMap` + `VecDeque` rather than an embedded
//! doubly-linked list node; a `VecDeque` reorder is O(n) in the number of
//! resident tiles per cache, which is small relative to a tile's own I/O
//! cost. The cross-cache "oldest cache" scan is a straightforward linear
//! scan by last-access time.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::{Duration, Instant};

use crate::source::{Command, Response, TileSource};
use crate::tile::{Coord, Tile, DAMAGE_FULL};

/// How much the adaptive undershoot ratio grows per back-to-back trim
/// within [`TRIM_BURST_WINDOW`].
const TRIM_GROWTH_FACTOR: f64 = 2.0;
/// Ceiling on the adaptive undershoot ratio.
const TRIM_UNDERSHOOT_MAX: f64 = 0.5;
/// Resting undershoot ratio once idle for [`TRIM_IDLE_RESET`].
const TRIM_UNDERSHOOT_MIN: f64 = 0.01;
/// Two trims closer together than this count as "back to back".
const TRIM_BURST_WINDOW: Duration = Duration::from_millis(100);
/// Idle period after which the undershoot ratio resets to its minimum.
const TRIM_IDLE_RESET: Duration = Duration::from_millis(200);
/// Fraction of a cache's resident set that `wash` opportunistically
/// writes back on one idle tick.
const WASH_FRACTION: f64 = 0.20;

struct CacheState {
    entries: HashMap<Coord, Tile>,
    /// Front = least recently used, back = most recently used.
    order: VecDeque<Coord>,
}

impl CacheState {
    fn touch(&mut self, coord: Coord) {
        if let Some(pos) = self.order.iter().position(|c| *c == coord) {
            self.order.remove(pos);
        }
        self.order.push_back(coord);
    }
}

/// Per-buffer cache state, shared between a [`CacheHandler`] and the
/// [`CacheRegistry`] it is registered with (the registry needs to reach
/// into a cache's LRU tail during `trim`/`wash`).
struct CacheShared {
    downstream: Arc<dyn TileSource>,
    state: Mutex<CacheState>,
    /// Logical per-cache clock, bumped on every `get`/insert.
    time: AtomicU64,
    eviction_counter: AtomicU64,
    /// Top of this cache's owning source chain (the handler a producer
    /// actually issues commands against, e.g. the [`crate::handler::zoom::ZoomHandler`]
    /// wrapping this cache). Stamped onto every `z == 0` tile this cache
    /// holds, so a tile can damage its mipmap parent on unlock/void without
    /// this cache needing to reach upward through its own references.
    top: Mutex<Option<Weak<dyn TileSource>>>,
}

impl CacheShared {
    /// Attempt to evict exactly one tile from this cache's LRU tail,
    /// applying the three skip rules. Returns `true` if a tile was
    /// evicted.
    fn evict_one(&self, registry: &CacheRegistry) -> bool {
        let mut state = self.state.lock().unwrap();
        let mut victim_idx = None;
        for (idx, coord) in state.order.iter().enumerate() {
            let tile = &state.entries[coord];
            if tile.ref_count() > 1 {
                continue; // rule 1: someone else holds a reference.
            }
            if tile.keep_identity() {
                continue; // rule 2: pinned tile.
            }
            let n = tile.n_clones();
            if n > 1 && tile.is_dirty() {
                // rule 3: probabilistic skip proportional to clone-set size.
                let count = self.eviction_counter.fetch_add(1, Ordering::Relaxed);
                if (count % n as u64) != 0 {
                    continue;
                }
            }
            victim_idx = Some(idx);
            break;
        }

        let Some(idx) = victim_idx else { return false };
        let coord = state.order.remove(idx).unwrap();
        let tile = state.entries.remove(&coord).unwrap();
        drop(state);

        if tile.is_dirty() {
            self.downstream.set(coord, tile.clone());
        }
        tile.mark_cached(false);
        registry.note_removed(&tile);
        true
    }

    fn wash(&self, registry: &CacheRegistry) -> bool {
        let Ok(mut state) = self.state.try_lock() else {
            return false; // contended; skip this tick.
        };
        let n_wash = ((state.order.len() as f64) * WASH_FRACTION).ceil() as usize;
        let candidates: Vec<Coord> = state.order.iter().take(n_wash).copied().collect();
        drop(state);

        let mut did_work = false;
        for coord in candidates {
            let state = self.state.lock().unwrap();
            let Some(tile) = state.entries.get(&coord).cloned() else { continue };
            drop(state);
            if tile.is_dirty() {
                self.downstream.set(coord, tile.clone());
                tile.mark_stored();
                did_work = true;
            }
        }
        let _ = registry;
        did_work
    }
}

struct TrimState {
    undershoot: f64,
    last_trim: Option<Instant>,
}

/// Process-wide cache accounting and eviction coordinator. Construct one per
/// process (or one per test) and share it between every [`CacheHandler`]
/// whose memory should count against the same budget.
pub struct CacheRegistry {
    caches: Mutex<Vec<Arc<CacheShared>>>,
    budget: AtomicU64,
    cache_total: AtomicU64,
    cache_total_uncloned: AtomicU64,
    high_watermark: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    trim_state: Mutex<TrimState>,
}

impl CacheRegistry {
    /// Create a registry with the given byte budget.
    pub fn new(budget: u64) -> Arc<Self> {
        Arc::new(CacheRegistry {
            caches: Mutex::new(Vec::new()),
            budget: AtomicU64::new(budget),
            cache_total: AtomicU64::new(0),
            cache_total_uncloned: AtomicU64::new(0),
            high_watermark: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            trim_state: Mutex::new(TrimState { undershoot: TRIM_UNDERSHOOT_MIN, last_trim: None }),
        })
    }

    /// Update the cache budget.
    pub fn set_budget(&self, budget: u64) {
        self.budget.store(budget, Ordering::Relaxed);
        if self.cache_total.load(Ordering::Relaxed) > budget {
            self.trim();
        }
    }

    /// Aggregate bytes counted once per clone-set.
    pub fn cache_total(&self) -> u64 {
        self.cache_total.load(Ordering::Relaxed)
    }

    /// Aggregate bytes counted once per cached tile, including duplicate
    /// clones.
    pub fn cache_total_uncloned(&self) -> u64 {
        self.cache_total_uncloned.load(Ordering::Relaxed)
    }

    /// Highest `cache_total` observed.
    pub fn high_watermark(&self) -> u64 {
        self.high_watermark.load(Ordering::Relaxed)
    }

    /// Cumulative cache hit count across every registered cache.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Cumulative cache miss count across every registered cache.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn note_inserted(&self, tile: &Tile, already_counted: bool) {
        if !already_counted {
            self.cache_total.fetch_add(tile.size() as u64, Ordering::Relaxed);
        }
        self.cache_total_uncloned.fetch_add(tile.size() as u64, Ordering::Relaxed);
        let total = self.cache_total.load(Ordering::Relaxed);
        self.high_watermark.fetch_max(total, Ordering::Relaxed);
    }

    fn note_removed(&self, tile: &Tile) {
        // `n_cached_clones` was already decremented by `tile.mark_cached(false)`
        // in the caller; zero means this was the last cached member of the
        // clone-set, so the set no longer counts toward `cache_total`.
        if tile.n_cached_clones() == 0 {
            self.cache_total.fetch_sub(tile.size() as u64, Ordering::Relaxed);
        }
        self.cache_total_uncloned.fetch_sub(tile.size() as u64, Ordering::Relaxed);
    }

    fn oldest_cache(&self) -> Option<Arc<CacheShared>> {
        self.caches
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.time.load(Ordering::Relaxed) > 0)
            .min_by_key(|c| c.time.load(Ordering::Relaxed))
            .cloned()
    }

    fn adaptive_target(&self) -> u64 {
        let mut trim_state = self.trim_state.lock().unwrap();
        let now = Instant::now();
        match trim_state.last_trim {
            Some(last) if now.duration_since(last) < TRIM_BURST_WINDOW => {
                trim_state.undershoot = (trim_state.undershoot * TRIM_GROWTH_FACTOR).min(TRIM_UNDERSHOOT_MAX);
            }
            Some(last) if now.duration_since(last) >= TRIM_IDLE_RESET => {
                trim_state.undershoot = TRIM_UNDERSHOOT_MIN;
            }
            _ => {}
        }
        trim_state.last_trim = Some(now);
        let budget = self.budget.load(Ordering::Relaxed) as f64;
        (budget * (1.0 - trim_state.undershoot)) as u64
    }

    /// Evict LRU tiles (across every registered cache) until `cache_total`
    /// is back under budget.
    pub fn trim(&self) {
        let target = self.adaptive_target();
        loop {
            if self.cache_total.load(Ordering::Relaxed) <= target {
                return;
            }
            let Some(cache) = self.oldest_cache() else { return };
            if !cache.evict_one(self) {
                // nothing evictable in the globally-oldest cache right now;
                // further looping here would spin, so stop (the next insert
                // that crosses budget will try again).
                return;
            }
        }
    }

    /// Opportunistically write back the oldest dirty fraction of one
    /// registered cache without evicting.
    /// Returns whether any work was actually done, matching the `IDLE`
    /// command's truthy-if-work-was-done contract.
    pub fn idle_tick(&self) -> bool {
        let caches = self.caches.lock().unwrap().clone();
        for cache in caches {
            if cache.wash(self) {
                return true;
            }
        }
        false
    }
}

/// Per-buffer LRU tile cache.
pub struct CacheHandler {
    shared: Arc<CacheShared>,
    registry: Arc<CacheRegistry>,
}

impl CacheHandler {
    /// Create a cache in front of `downstream`, registered with `registry`
    /// so its memory counts against the shared budget.
    pub fn new(downstream: Arc<dyn TileSource>, registry: Arc<CacheRegistry>) -> Self {
        let shared = Arc::new(CacheShared {
            downstream,
            state: Mutex::new(CacheState { entries: HashMap::new(), order: VecDeque::new() }),
            time: AtomicU64::new(0),
            eviction_counter: AtomicU64::new(0),
            top: Mutex::new(None),
        });
        registry.caches.lock().unwrap().push(shared.clone());
        CacheHandler { shared, registry }
    }

    /// Register the top of this cache's owning source chain (see
    /// [`CacheShared::top`]). Tiles inserted afterward get it stamped on so
    /// they can propagate mipmap damage on unlock/void.
    pub fn set_top(&self, top: Weak<dyn TileSource>) {
        *self.shared.top.lock().unwrap() = Some(top);
    }

    fn bump_time(&self) -> u64 {
        self.shared.time.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn insert(&self, tile: Tile, coord: Coord) {
        let mut state = self.shared.state.lock().unwrap();
        if let Some(old) = state.entries.remove(&coord) {
            if let Some(pos) = state.order.iter().position(|c| *c == coord) {
                state.order.remove(pos);
            }
            old.mark_cached(false);
            self.registry.note_removed(&old);
        }

        let already_counted = tile.n_cached_clones() > 0;
        tile.mark_cached(true);
        if coord.z == 0 {
            if let Some(top) = self.shared.top.lock().unwrap().as_ref() {
                tile.set_owning_source(top.clone());
            }
        }
        state.order.push_back(coord);
        state.entries.insert(coord, tile.clone());
        drop(state);

        self.registry.note_inserted(&tile, already_counted);
        self.bump_time();

        if self.registry.cache_total() > self.registry.budget.load(Ordering::Relaxed) {
            self.registry.trim();
        }
    }

    fn get_impl(&self, coord: Coord) -> Option<Tile> {
        {
            let mut state = self.shared.state.lock().unwrap();
            if let Some(tile) = state.entries.get(&coord).cloned() {
                state.touch(coord);
                drop(state);
                self.bump_time();
                self.registry.record_hit();
                return Some(tile);
            }
        }
        self.registry.record_miss();
        let tile = self.shared.downstream.get(coord)?;
        self.insert(tile.clone(), coord);
        Some(tile)
    }

    fn void_impl(&self, coord: Coord, mask: Option<u64>) {
        let mut state = self.shared.state.lock().unwrap();
        let Some(tile) = state.entries.get(&coord).cloned() else {
            tracing::warn!(?coord, "void on a tile not resident in this cache");
            return;
        };
        tile.add_damage(mask.unwrap_or(DAMAGE_FULL));
        let fully_damaged = tile.damage() == DAMAGE_FULL;
        if fully_damaged {
            if let Some(pos) = state.order.iter().position(|c| *c == coord) {
                state.order.remove(pos);
            }
            state.entries.remove(&coord);
        }
        drop(state);

        if fully_damaged {
            tile.mark_cached(false);
            self.registry.note_removed(&tile);
        }
        if coord.z == 0 {
            // the tile is still valid (or was just dropped, in which case
            // this is a no-op downstream since the parent will re-derive
            // it); either way the level-1 quadrant it contributed to is now
            // stale.
            tile.propagate_parent_damage();
        }
    }

    fn flush_impl(&self) {
        let state = self.shared.state.lock().unwrap();
        let dirty: Vec<(Coord, Tile)> =
            state.order.iter().filter_map(|c| state.entries.get(c).map(|t| (*c, t.clone()))).collect();
        drop(state);
        for (coord, tile) in dirty {
            if tile.is_dirty() {
                self.shared.downstream.set(coord, tile.clone());
                tile.mark_stored();
            }
        }
    }

    /// Number of tiles currently resident in this cache.
    pub fn len(&self) -> usize {
        self.shared.state.lock().unwrap().entries.len()
    }

    /// True if no tiles are currently resident in this cache.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TileSource for CacheHandler {
    fn downstream(&self) -> Option<&dyn TileSource> {
        Some(self.shared.downstream.as_ref())
    }

    fn dispatch(&self, command: Command) -> Response {
        match command {
            Command::Get { coord } => Response::Tile(self.get_impl(coord)),
            Command::Set { coord, tile } => {
                self.insert(tile, coord);
                Response::None
            }
            Command::Void { coord, mask } => {
                self.void_impl(coord, mask);
                Response::None
            }
            Command::IsCached { coord } => {
                Response::Bool(self.shared.state.lock().unwrap().entries.contains_key(&coord))
            }
            Command::Idle => Response::Bool(self.registry.idle_tick()),
            Command::Flush => {
                self.flush_impl();
                Response::None
            }
            other => self.forward(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingBackend {
        sets: std::sync::atomic::AtomicUsize,
    }

    impl TileSource for CountingBackend {
        fn downstream(&self) -> Option<&dyn TileSource> {
            None
        }
        fn dispatch(&self, command: Command) -> Response {
            if let Command::Set { .. } = &command {
                self.sets.fetch_add(1, Ordering::Relaxed);
            }
            self.forward(command)
        }
    }

    fn fresh_cache(budget: u64) -> (CacheHandler, Arc<CacheRegistry>) {
        let backend: Arc<dyn TileSource> = Arc::new(CountingBackend { sets: Default::default() });
        let registry = CacheRegistry::new(budget);
        (CacheHandler::new(backend, registry.clone()), registry)
    }

    #[test]
    fn insert_then_get_hits_without_forwarding() {
        let (cache, registry) = fresh_cache(1 << 20);
        let coord = Coord::new(0, 0, 0);
        let tile = Tile::new(coord, 64);
        cache.set(coord, tile);
        assert!(cache.get(coord).is_some());
        assert_eq!(registry.hits(), 1);
    }

    #[test]
    fn cache_total_tracks_inserts_and_evictions() {
        let (cache, registry) = fresh_cache(1 << 20);
        let coord = Coord::new(0, 0, 0);
        let tile = Tile::new(coord, 256);
        cache.set(coord, tile);
        assert_eq!(registry.cache_total(), 256);
        assert_eq!(registry.cache_total_uncloned(), 256);

        cache.void(coord, None);
        assert_eq!(registry.cache_total(), 0);
        assert_eq!(registry.cache_total_uncloned(), 0);
    }

    #[test]
    fn trim_respects_budget_after_overflow() {
        let (cache, registry) = fresh_cache(1000);
        for i in 0..20 {
            let coord = Coord::new(i, 0, 0);
            let tile = Tile::new(coord, 100);
            tile.mark_stored(); // clean, so eviction doesn't need to flush.
            cache.set(coord, tile);
        }
        assert!(registry.cache_total() <= 1000);
    }

    #[test]
    fn most_recently_used_tile_survives_lru_eviction() {
        let (cache, registry) = fresh_cache(250);
        let a = Coord::new(0, 0, 0);
        let b = Coord::new(1, 0, 0);

        let ta = Tile::new(a, 100);
        ta.mark_stored();
        cache.set(a, ta);
        let tb = Tile::new(b, 100);
        tb.mark_stored();
        cache.set(b, tb);

        // touch `a` so `b` becomes the LRU tile.
        cache.get(a);

        let c = Coord::new(2, 0, 0);
        let tc = Tile::new(c, 100);
        tc.mark_stored();
        cache.set(c, tc);

        assert!(registry.cache_total() <= 250);
        assert!(cache.get(a).is_some(), "recently touched tile should survive trim");
    }

    #[test]
    fn void_with_partial_mask_keeps_tile_resident() {
        let (cache, _registry) = fresh_cache(1 << 20);
        let coord = Coord::new(0, 0, 0);
        let tile = Tile::new(coord, 64);
        tile.clear_damage();
        tile.mark_stored();
        cache.set(coord, tile);
        cache.void(coord, Some(0x1));
        assert!(cache.is_cached(coord), "a partial damage mask must not evict the tile");
    }
}
