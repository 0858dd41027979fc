//! The tile object: a refcounted, copy-on-write pixel payload with a dirty
//! mask.
//!
//! Sharing is tracked by a `clone_state` enum (`Uncloned`/`Cloned`/
//! `Uncloning`) guarded by atomics and a spinlock-flavoured CAS loop, with a
//! separate clone-set counting how many live tiles share one payload and how
//! many of those are currently cached. Every [`Tile`] is an `Arc<TileInner>`
//! clone, so construction/destruction already gets reference counting from
//! `Arc`'s `Clone`/`Drop`. The clone-*set* (tiles sharing one payload via
//! `Tile::dup`) is a distinct, smaller `Arc<CloneSet>` that only the
//! copy-on-write path touches, the same shape as an `Arc<Vec<T>>`-backed
//! copy-on-write payload elsewhere in this workspace, kept independent here
//! since this crate has no dependency on that code.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::source::TileSource;

/// Damage mask value meaning "entire tile is dirty".
pub const DAMAGE_FULL: u64 = u64::MAX;

/// Tile grid coordinates: `(x, y)` in tile units at mipmap level `z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coord {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
    /// Mipmap level (0 = full resolution).
    pub z: u32,
}

impl Coord {
    /// Construct a coordinate.
    pub fn new(x: i32, y: i32, z: u32) -> Self {
        Coord { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum CloneState {
    Uncloned = 0,
    Cloned = 1,
    Uncloning = 2,
}

impl CloneState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => CloneState::Uncloned,
            1 => CloneState::Cloned,
            _ => CloneState::Uncloning,
        }
    }
}

/// Bookkeeping shared by every [`Tile`] produced from one [`Tile::dup`]
/// chain. `n_clones` counts live tiles sharing the
/// payload; `n_cached_clones` counts how many of those are currently held
/// by a cache handler.
struct CloneSet {
    n_clones: AtomicUsize,
    n_cached_clones: AtomicUsize,
}

impl CloneSet {
    fn new() -> Arc<Self> {
        Arc::new(CloneSet {
            n_clones: AtomicUsize::new(1),
            n_cached_clones: AtomicUsize::new(0),
        })
    }
}

struct TileInner {
    coord: Coord,
    payload: Mutex<Arc<Vec<u8>>>,
    clone_set: Mutex<Option<Arc<CloneSet>>>,
    clone_state: AtomicU8,
    rev: AtomicU64,
    stored_rev: AtomicU64,
    damage: AtomicU64,
    lock_count: AtomicUsize,
    read_lock_count: AtomicUsize,
    is_zero_tile: bool,
    is_global_tile: bool,
    keep_identity: AtomicBool,
    /// Called whenever a write lock on this tile is released. Not used by
    /// anything in this crate yet; a handler or test harness may hook it to
    /// observe write completion.
    unlock_notify: Mutex<Option<Arc<dyn Fn() + Send + Sync>>>,
    /// Weak handle to the top of this tile's owning source chain (the
    /// outermost handler a producer issues commands against). Set by
    /// [`crate::handler::cache::CacheHandler`] when a tile is inserted, so
    /// that unlocking or voiding a `z == 0` tile can damage the
    /// corresponding quadrant at higher mipmap levels without the tile
    /// owning its storage outright (see SPEC_FULL.md §9 "Back-references
    /// without cycles").
    owning_source: Mutex<Option<Weak<dyn TileSource>>>,
}

/// A cache/swap unit of pixel data.
///
/// Cloning a `Tile` (via [`Tile::clone`]) is a cheap `Arc` bump and shares
/// the *same* logical tile identity (same lock state, same damage mask) —
/// use this when handing a tile to another owner that will see the same
/// object. Use [`Tile::dup`] instead when you want an independent tile that
/// happens to start out sharing the same pixel bytes (copy-on-write).
#[derive(Clone)]
pub struct Tile {
    inner: Arc<TileInner>,
}

impl Tile {
    /// Allocate a new tile with `size` bytes of zeroed payload, fully
    /// damaged (freshly created data has no on-disk counterpart yet).
    pub fn new(coord: Coord, size: usize) -> Self {
        Tile {
            inner: Arc::new(TileInner {
                coord,
                payload: Mutex::new(Arc::new(vec![0u8; size])),
                clone_set: Mutex::new(None),
                clone_state: AtomicU8::new(CloneState::Uncloned as u8),
                rev: AtomicU64::new(0),
                stored_rev: AtomicU64::new(0),
                damage: AtomicU64::new(DAMAGE_FULL),
                lock_count: AtomicUsize::new(0),
                read_lock_count: AtomicUsize::new(0),
                is_zero_tile: false,
                is_global_tile: false,
                keep_identity: AtomicBool::new(false),
                unlock_notify: Mutex::new(None),
                owning_source: Mutex::new(None),
            }),
        }
    }

    /// Construct the shared, read-only zero tile used as a placeholder for
    /// never-written regions.
    pub fn new_zero(coord: Coord, size: usize) -> Self {
        Tile {
            inner: Arc::new(TileInner {
                coord,
                payload: Mutex::new(Arc::new(vec![0u8; size])),
                clone_set: Mutex::new(None),
                clone_state: AtomicU8::new(CloneState::Uncloned as u8),
                rev: AtomicU64::new(0),
                stored_rev: AtomicU64::new(0),
                damage: AtomicU64::new(0),
                lock_count: AtomicUsize::new(0),
                read_lock_count: AtomicUsize::new(0),
                is_zero_tile: true,
                is_global_tile: true,
                keep_identity: AtomicBool::new(true),
                unlock_notify: Mutex::new(None),
                owning_source: Mutex::new(None),
            }),
        }
    }

    /// Tile grid coordinate.
    pub fn coord(&self) -> Coord {
        self.inner.coord
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.inner.payload.lock().unwrap().len()
    }

    /// True for the shared, never-written zero tile.
    pub fn is_zero_tile(&self) -> bool {
        self.inner.is_zero_tile
    }

    /// True if this tile must never be evicted or shared-mutated (e.g. the
    /// zero tile, or a tile explicitly pinned by a handler).
    pub fn keep_identity(&self) -> bool {
        self.inner.keep_identity.load(Ordering::Relaxed)
    }

    /// Pin or unpin this tile against eviction.
    pub fn set_keep_identity(&self, keep: bool) {
        self.inner.keep_identity.store(keep, Ordering::Relaxed);
    }

    /// Monotonic revision, bumped on every [`Tile::store`].
    pub fn rev(&self) -> u64 {
        self.inner.rev.load(Ordering::Acquire)
    }

    /// Revision as of the last successful write-back to a backend.
    pub fn stored_rev(&self) -> u64 {
        self.inner.stored_rev.load(Ordering::Acquire)
    }

    /// True if `rev() != stored_rev()`, i.e. there is unwritten data.
    pub fn is_dirty(&self) -> bool {
        self.rev() != self.stored_rev()
    }

    /// Record that the current `rev()` has been durably written.
    pub fn mark_stored(&self) {
        self.inner.stored_rev.store(self.rev(), Ordering::Release);
    }

    /// Current damage mask.
    pub fn damage(&self) -> u64 {
        self.inner.damage.load(Ordering::Acquire)
    }

    /// OR `mask` into the damage mask and bump `rev`.
    pub fn add_damage(&self, mask: u64) {
        self.inner.damage.fetch_or(mask, Ordering::AcqRel);
        self.inner.rev.fetch_add(1, Ordering::AcqRel);
    }

    /// Clear the damage mask without touching `rev`.
    pub fn clear_damage(&self) -> u64 {
        self.inner.damage.swap(0, Ordering::AcqRel)
    }

    /// Restore a previously-cleared damage mask.
    pub fn restore_damage(&self, mask: u64) {
        self.inner.damage.store(mask, Ordering::Release);
    }

    /// Number of tiles (including `self`) currently sharing this tile's
    /// payload, or 1 if this tile has never been [`Tile::dup`]'d.
    pub fn n_clones(&self) -> usize {
        match self.inner.clone_set.lock().unwrap().as_ref() {
            Some(set) => set.n_clones.load(Ordering::Acquire),
            None => 1,
        }
    }

    /// Number of clones in this tile's clone-set currently marked cached.
    pub fn n_cached_clones(&self) -> usize {
        match self.inner.clone_set.lock().unwrap().as_ref() {
            Some(set) => set.n_cached_clones.load(Ordering::Acquire),
            None => 0,
        }
    }

    /// Number of live `Tile` handles (across clones, not clone-*set*
    /// sharers) referring to this same logical tile — an `Arc` strong
    /// count. The cache eviction skip rule treats `> 1` as
    /// "someone else is holding a reference; don't evict".
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Acquire a write lock, privatizing the payload first if it is shared
    /// with other clones (copy-on-write). Returns a guard; writes through
    /// it bump `rev`.
    pub fn lock(&self) -> TileWriteGuard<'_> {
        self.unclone();
        self.inner.lock_count.fetch_add(1, Ordering::AcqRel);
        TileWriteGuard { tile: self }
    }

    /// Acquire a read lock. Never privatizes: readers are safe to share.
    pub fn read_lock(&self) -> TileReadGuard<'_> {
        self.inner.read_lock_count.fetch_add(1, Ordering::AcqRel);
        TileReadGuard { tile: self }
    }

    /// Overwrite the payload wholesale (used by `SET`/`REFETCH` handlers
    /// that replace bytes outright rather than mutating in place).
    pub fn store(&self, data: Vec<u8>) {
        self.unclone();
        *self.inner.payload.lock().unwrap() = Arc::new(data);
        self.inner.rev.fetch_add(1, Ordering::AcqRel);
    }

    /// Produce an independent tile starting out with this tile's current
    /// payload bytes.
    ///
    /// If `self.keep_identity()` is false (the common case), this is a
    /// cheap copy-on-write share: the returned tile and `self` both move to
    /// [`CloneState::Cloned`] and share one [`CloneSet`], and the first of
    /// them to need exclusive access (via [`Tile::lock`] or [`Tile::store`])
    /// pays the copy cost in [`Tile::unclone`]. If `self.keep_identity()` is
    /// true, `self`'s `data` pointer must never change out from under it, so
    /// this eagerly deep-copies the bytes instead of entering a clone set.
    ///
    /// Either way the new tile carries `damage = 0` (its bytes are a known-
    /// good snapshot, not stale) and a bumped `rev` (the copy counts as
    /// freshly dirty for storage purposes).
    pub fn dup(&self) -> Tile {
        if self.keep_identity() {
            let copy = (*self.inner.payload.lock().unwrap()).as_ref().clone();
            return Tile {
                inner: Arc::new(TileInner {
                    coord: self.inner.coord,
                    payload: Mutex::new(Arc::new(copy)),
                    clone_set: Mutex::new(None),
                    clone_state: AtomicU8::new(CloneState::Uncloned as u8),
                    rev: AtomicU64::new(self.rev() + 1),
                    stored_rev: AtomicU64::new(self.stored_rev()),
                    damage: AtomicU64::new(0),
                    lock_count: AtomicUsize::new(0),
                    read_lock_count: AtomicUsize::new(0),
                    is_zero_tile: false,
                    is_global_tile: false,
                    keep_identity: AtomicBool::new(false),
                    unlock_notify: Mutex::new(None),
                    owning_source: Mutex::new(None),
                }),
            };
        }

        let mut guard = self.inner.clone_set.lock().unwrap();
        let set = guard.get_or_insert_with(CloneSet::new).clone();
        set.n_clones.fetch_add(1, Ordering::AcqRel);
        self.inner.clone_state.store(CloneState::Cloned as u8, Ordering::Release);
        drop(guard);

        let payload = self.inner.payload.lock().unwrap().clone();
        Tile {
            inner: Arc::new(TileInner {
                coord: self.inner.coord,
                payload: Mutex::new(payload),
                clone_set: Mutex::new(Some(set)),
                clone_state: AtomicU8::new(CloneState::Cloned as u8),
                rev: AtomicU64::new(self.rev() + 1),
                stored_rev: AtomicU64::new(self.stored_rev()),
                damage: AtomicU64::new(0),
                lock_count: AtomicUsize::new(0),
                read_lock_count: AtomicUsize::new(0),
                is_zero_tile: false,
                is_global_tile: false,
                keep_identity: AtomicBool::new(false),
                unlock_notify: Mutex::new(None),
                owning_source: Mutex::new(None),
            }),
        }
    }

    /// Register the callback invoked every time a write lock on this tile
    /// drops to zero (see [`Tile::lock`]).
    pub fn set_unlock_notify(&self, notify: Arc<dyn Fn() + Send + Sync>) {
        *self.inner.unlock_notify.lock().unwrap() = Some(notify);
    }

    /// Register the top of this tile's owning source chain, used to
    /// propagate damage to higher mipmap levels when a `z == 0` tile is
    /// unlocked or voided. A non-owning (`Weak`) handle, per the "back-
    /// references without cycles" design: the tile never keeps its chain
    /// alive.
    pub fn set_owning_source(&self, source: Weak<dyn TileSource>) {
        *self.inner.owning_source.lock().unwrap() = Some(source);
    }

    /// If this is a `z == 0` tile with a registered owning source, damage
    /// the quadrant of its level-1 parent that this tile contributes to.
    /// No-op for `z > 0` tiles or tiles with no registered owning source
    /// (e.g. one that was never inserted into a cache).
    pub(crate) fn propagate_parent_damage(&self) {
        if self.inner.coord.z != 0 {
            return;
        }
        let Some(source) = self.inner.owning_source.lock().unwrap().as_ref().and_then(Weak::upgrade) else {
            return;
        };
        let coord = self.inner.coord;
        let parent = Coord::new(coord.x >> 1, coord.y >> 1, 1);
        let quadrant = ((coord.y & 1) << 1 | (coord.x & 1)) as u32;
        source.void(parent, Some(quadrant_damage_mask(quadrant)));
    }

    /// Mark this tile as currently held by a cache handler, for the
    /// clone-set-aware eviction skip rule.
    pub fn mark_cached(&self, cached: bool) {
        if let Some(set) = self.inner.clone_set.lock().unwrap().as_ref() {
            if cached {
                set.n_cached_clones.fetch_add(1, Ordering::AcqRel);
            } else {
                set.n_cached_clones.fetch_sub(1, Ordering::AcqRel);
            }
        }
    }

    /// Fraction of this tile's clone-set currently cached, in `[0, 1]`, or
    /// `0.0` for an unshared tile. A cache handler uses this to
    /// probabilistically skip eviction of widely-shared tiles (rule 3).
    pub fn cached_clone_fraction(&self) -> f64 {
        match self.inner.clone_set.lock().unwrap().as_ref() {
            Some(set) => {
                let n = set.n_clones.load(Ordering::Acquire) as f64;
                let cached = set.n_cached_clones.load(Ordering::Acquire) as f64;
                if n > 0.0 {
                    cached / n
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    /// Ensure this tile's payload is privately owned, copying it out of its
    /// clone-set if shared.
    ///
    /// This is the race-prone step of "uncloning": while this tile
    /// copies the bytes, another clone of the same set may concurrently do
    /// the same thing. The race is resolved by decrementing the *shared*
    /// clone count speculatively before copying, then checking afterward
    /// whether it reached zero:
    ///
    /// - If it reached zero, this tile is now the last reference to the
    ///   original shared payload, so the copy was unnecessary — discard it
    ///   and keep the original `Arc` (which is now privately owned since
    ///   `Arc`'s strong count is what actually determines uniqueness; the
    ///   `n_clones` bookkeeping tracks *logical* tiles, which can lag the
    ///   `Arc` count while an uncloning race is in flight).
    /// - Otherwise another clone is still sharing the original, so the
    ///   fresh copy this tile just made is the correct privatized payload.
    fn unclone(&self) {
        loop {
            let state = CloneState::from_u8(self.inner.clone_state.load(Ordering::Acquire));
            match state {
                CloneState::Uncloned => return,
                CloneState::Uncloning => {
                    spin_wait();
                    continue;
                }
                CloneState::Cloned => {
                    if self
                        .inner
                        .clone_state
                        .compare_exchange(
                            CloneState::Cloned as u8,
                            CloneState::Uncloning as u8,
                            Ordering::AcqRel,
                            Ordering::Acquire,
                        )
                        .is_err()
                    {
                        continue; // another thread raced us into Uncloning; retry.
                    }
                    break;
                }
            }
        }

        let set = self
            .inner
            .clone_set
            .lock()
            .unwrap()
            .clone()
            .expect("Cloned state implies a clone-set");

        let original = self.inner.payload.lock().unwrap().clone();
        let mut copy = (*original).clone();
        let _ = &mut copy; // materialize the private copy before the race check below.

        let remaining = set.n_clones.fetch_sub(1, Ordering::AcqRel) - 1;
        if remaining == 0 {
            // We were the last logical clone; no concurrent uncloner can
            // still be relying on shared `original`, so keep it as-is and
            // drop the redundant copy.
            *self.inner.clone_set.lock().unwrap() = None;
        } else {
            *self.inner.payload.lock().unwrap() = Arc::new(copy);
        }

        self.inner
            .clone_state
            .store(CloneState::Uncloned as u8, Ordering::Release);
    }
}

/// 16-bit sub-mask of the 8x8 damage grid covering quadrant `q`
/// (`0`=top-left, `1`=top-right, `2`=bottom-left, `3`=bottom-right),
/// shared between [`Tile::propagate_parent_damage`] and
/// [`crate::handler::zoom::ZoomHandler`]'s downscale recursion so both
/// sides agree on which bits a given child contributes to its parent.
pub(crate) fn quadrant_damage_mask(q: u32) -> u64 {
    let (row_off, col_off) = match q {
        0 => (0, 0),
        1 => (0, 4),
        2 => (4, 0),
        _ => (4, 4),
    };
    let mut mask = 0u64;
    for r in 0..4 {
        for c in 0..4 {
            mask |= 1u64 << ((row_off + r) * 8 + (col_off + c));
        }
    }
    mask
}

fn spin_wait() {
    use std::sync::atomic::AtomicUsize as Counter;
    thread_local! {
        static SPINS: Counter = const { Counter::new(0) };
    }
    SPINS.with(|spins| {
        let n = spins.fetch_add(1, Ordering::Relaxed);
        if n < 32 {
            std::hint::spin_loop();
        } else {
            std::thread::yield_now();
        }
    });
}

/// Write access to a [`Tile`]'s payload, obtained via [`Tile::lock`].
pub struct TileWriteGuard<'a> {
    tile: &'a Tile,
}

impl TileWriteGuard<'_> {
    /// Borrow the current bytes.
    pub fn bytes(&self) -> Arc<Vec<u8>> {
        self.tile.inner.payload.lock().unwrap().clone()
    }

    /// Replace the tile bytes and bump its revision.
    pub fn write(&mut self, data: &[u8]) {
        let mut payload = self.tile.inner.payload.lock().unwrap();
        let buf = Arc::make_mut(&mut payload);
        buf.clear();
        buf.extend_from_slice(data);
        self.tile.inner.rev.fetch_add(1, Ordering::AcqRel);
    }
}

impl Drop for TileWriteGuard<'_> {
    fn drop(&mut self) {
        let remaining = self.tile.inner.lock_count.fetch_sub(1, Ordering::AcqRel) - 1;
        if remaining != 0 {
            return;
        }
        // last writer: bump rev once more, clear the damage this write
        // session may have accumulated, notify, and propagate to the
        // mipmap parent if this is a level-0 tile.
        self.tile.inner.rev.fetch_add(1, Ordering::AcqRel);
        self.tile.inner.damage.store(0, Ordering::Release);
        let notify = self.tile.inner.unlock_notify.lock().unwrap().clone();
        if let Some(notify) = notify {
            notify();
        }
        self.tile.propagate_parent_damage();
    }
}

/// Read-only access to a [`Tile`]'s payload, obtained via [`Tile::read_lock`].
pub struct TileReadGuard<'a> {
    tile: &'a Tile,
}

impl TileReadGuard<'_> {
    /// Borrow the current bytes.
    pub fn bytes(&self) -> Arc<Vec<u8>> {
        self.tile.inner.payload.lock().unwrap().clone()
    }
}

impl Drop for TileReadGuard<'_> {
    fn drop(&mut self) {
        self.tile.inner.read_lock_count.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tile_is_fully_damaged() {
        let tile = Tile::new(Coord::new(0, 0, 0), 64);
        assert_eq!(tile.damage(), DAMAGE_FULL);
        assert!(tile.is_dirty());
    }

    #[test]
    fn store_bumps_rev_and_clears_dirty_after_mark_stored() {
        let tile = Tile::new(Coord::new(0, 0, 0), 16);
        let rev0 = tile.rev();
        tile.store(vec![1; 16]);
        assert!(tile.rev() > rev0);
        assert!(tile.is_dirty());
        tile.mark_stored();
        assert!(!tile.is_dirty());
    }

    #[test]
    fn dup_shares_bytes_until_write() {
        let a = Tile::new(Coord::new(0, 0, 0), 4);
        a.store(vec![9, 9, 9, 9]);
        let b = a.dup();
        assert_eq!(a.n_clones(), 2);
        assert_eq!(b.n_clones(), 2);

        b.store(vec![1, 2, 3, 4]);
        // writing to `b` privatizes its payload; `a` keeps its own bytes.
        assert_eq!(a.read_lock().bytes().as_slice(), &[9, 9, 9, 9]);
        assert_eq!(b.read_lock().bytes().as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn clear_and_restore_damage_roundtrips() {
        let tile = Tile::new(Coord::new(0, 0, 0), 4);
        let saved = tile.clear_damage();
        assert_eq!(tile.damage(), 0);
        tile.restore_damage(saved);
        assert_eq!(tile.damage(), DAMAGE_FULL);
    }

    #[test]
    fn cached_clone_fraction_tracks_mark_cached() {
        let a = Tile::new(Coord::new(0, 0, 0), 4);
        let b = a.dup();
        a.mark_cached(true);
        assert!((b.cached_clone_fraction() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn zero_tile_keeps_identity() {
        let z = Tile::new_zero(Coord::new(0, 0, 0), 16);
        assert!(z.is_zero_tile());
        assert!(z.keep_identity());
        assert_eq!(z.damage(), 0);
    }
}
