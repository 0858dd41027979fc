//! Storage context / top-level `TileStore` facade.
//!
//! Cache accounting, the global LRU list, and the swap writer thread are
//! process-wide concerns, but they live as an explicit value here instead of
//! a static singleton: one [`TileStore`] per process (or, for tests, one per
//! test — construction is cheap enough that tests never need to share a
//! static). Every buffer's tile-source chain is built
//! through [`TileStore::new_buffer`] so its cache accounting counts against
//! this store's [`CacheRegistry`] and its swap file (if any) lives in this
//! store's [`SwapDirManager`] directory.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock, Weak};

use crate::backend::base::TileFormat;
use crate::backend::memory::MemoryBackend;
use crate::backend::swap::SwapBackend;
use crate::config::{SwapLocation, TileStoreConfig};
use crate::error::Result;
use crate::handler::cache::CacheRegistry;
use crate::handler::{CacheHandler, SampleFormat, ZoomHandler};
use crate::parallel::Dispatcher;
use crate::source::TileSource;
use crate::swap_dir::SwapDirManager;

/// The process-wide (or per-test) storage context.
///
/// Owns the pieces that must be shared across every buffer built from it:
/// the [`CacheRegistry`] that enforces one process-wide memory budget, the
/// [`SwapDirManager`] that hands out swap file paths, and a [`Dispatcher`]
/// worker pool sized from [`TileStoreConfig::threads`]. A live copy of the
/// config is kept behind a lock so [`TileStore::set_cache_size`] and its
/// siblings can recompute and broadcast derived settings to already-built
/// buffers without reconstructing the store.
pub struct TileStore {
    config: RwLock<TileStoreConfig>,
    registry: Arc<CacheRegistry>,
    swap_dir: Mutex<Option<Arc<SwapDirManager>>>,
    swap_backends: Mutex<Vec<Weak<SwapBackend>>>,
    dispatcher: RwLock<Arc<Dispatcher>>,
}

impl TileStore {
    /// Build a storage context from `config`, opening the swap directory
    /// (if configured) and sizing the worker pool immediately.
    pub fn new(config: TileStoreConfig) -> Result<Self> {
        config.validate()?;

        let registry = CacheRegistry::new(config.tile_cache_size);
        let swap_dir = match &config.swap {
            SwapLocation::Disabled => None,
            SwapLocation::Path(path) => Some(Arc::new(SwapDirManager::open(path.clone())?)),
        };
        let dispatcher = Arc::new(Dispatcher::new(config.threads));

        Ok(TileStore {
            config: RwLock::new(config),
            registry,
            swap_dir: Mutex::new(swap_dir),
            swap_backends: Mutex::new(Vec::new()),
            dispatcher: RwLock::new(dispatcher),
        })
    }

    /// Build a store from `TileStoreConfig::from_env()`.
    pub fn from_env() -> Result<Self> {
        TileStore::new(TileStoreConfig::from_env())
    }

    /// Snapshot of the live configuration.
    pub fn config(&self) -> TileStoreConfig {
        self.config.read().unwrap().clone()
    }

    /// The process-wide cache accounting registry every buffer's
    /// [`CacheHandler`] is registered with.
    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    /// The worker pool buffers built from this store should dispatch
    /// parallel work through.
    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        self.dispatcher.read().unwrap().clone()
    }

    /// Whether this store currently has a swap directory.
    pub fn swap_enabled(&self) -> bool {
        self.swap_dir.lock().unwrap().is_some()
    }

    /// Build a fresh buffer's tile-source chain: a [`ZoomHandler`] in front
    /// of a [`CacheHandler`] in front of either a [`SwapBackend`] (swap
    /// enabled) or a [`MemoryBackend`].
    ///
    /// The returned chain's top is what a producer issues `GET`/`SET`/etc.
    /// against; nothing about the chain shape is exposed beyond the
    /// [`TileSource`] trait, so callers can layer their own handlers above
    /// it (e.g. a [`crate::backend::buffer::BufferBackend`] in a different
    /// buffer's chain pointing back at this one).
    pub fn new_buffer(&self, format: TileFormat, sample_format: SampleFormat) -> Result<Arc<dyn TileSource>> {
        let config = self.config();

        let backend: Arc<dyn TileSource> = match &*self.swap_dir.lock().unwrap() {
            Some(dir) => {
                let path = dir.create_file(None);
                let swap = Arc::new(SwapBackend::new(path, format, &config.swap_compression, config.queue_size)?);
                self.swap_backends.lock().unwrap().push(Arc::downgrade(&swap));
                swap
            }
            None => Arc::new(MemoryBackend::new(format)),
        };

        let cache = Arc::new(CacheHandler::new(backend, self.registry.clone()));
        let zoom: Arc<dyn TileSource> = Arc::new(ZoomHandler::new(cache.clone(), format, sample_format));
        // register the zoom handler as the chain's top so `z == 0` tiles
        // this cache holds can damage their mipmap parent on unlock/void.
        cache.set_top(Arc::downgrade(&zoom));
        Ok(zoom)
    }

    /// Update the process-wide cache budget.
    pub fn set_cache_size(&self, new_size: u64) {
        let queue_size = {
            let mut config = self.config.write().unwrap();
            config.tile_cache_size = new_size;
            config.recompute_queue_size();
            config.queue_size
        };

        self.registry.set_budget(new_size);
        self.broadcast_queue_max(queue_size);
    }

    fn broadcast_queue_max(&self, queue_size: u64) {
        let mut backends = self.swap_backends.lock().unwrap();
        backends.retain(|weak| match weak.upgrade() {
            Some(backend) => {
                backend.set_queue_max(queue_size);
                true
            }
            None => false,
        });
    }

    /// Switch the swap directory: subsequently-built buffers spill
    /// there. `None` disables swap for new buffers, matching "swap
    /// disabled" behaviour; buffers built before the switch keep writing to
    /// their existing swap files under the old directory until dropped.
    pub fn set_swap_dir(&self, path: Option<PathBuf>) -> Result<()> {
        let new_dir = match path {
            Some(p) => Some(Arc::new(SwapDirManager::open(p)?)),
            None => None,
        };

        {
            let mut config = self.config.write().unwrap();
            config.swap = match &new_dir {
                Some(dir) => SwapLocation::Path(dir.dir().to_path_buf()),
                None => SwapLocation::Disabled,
            };
        }

        // dropping the old manager unlinks every swap file it handed out
        // (`SwapDirManager::drop` calls `cleanup`); buffers already holding
        // an `Arc<SwapBackend>` keep their own open file handle regardless.
        *self.swap_dir.lock().unwrap() = new_dir;
        Ok(())
    }

    /// Resize the worker pool. Re-measures dispatch cost for
    /// the new pool immediately rather than lazily on first use.
    pub fn set_threads(&self, threads: usize) {
        let threads = threads.max(1);
        self.config.write().unwrap().threads = threads;
        *self.dispatcher.write().unwrap() = Arc::new(Dispatcher::new(threads));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Coord;
    use std::sync::atomic::Ordering;

    fn test_config(budget: u64, swap_dir: &std::path::Path) -> TileStoreConfig {
        let mut config = TileStoreConfig::default();
        config.tile_width = 64;
        config.tile_height = 64;
        config.tile_cache_size = budget;
        config.swap = SwapLocation::Path(swap_dir.to_path_buf());
        config.recompute_queue_size();
        config.threads = 2;
        config
    }

    #[test]
    fn swap_disabled_store_uses_memory_backend() {
        let mut config = TileStoreConfig::default();
        config.swap = SwapLocation::Disabled;
        let store = TileStore::new(config).unwrap();
        assert!(!store.swap_enabled());

        let format = TileFormat::new(64, 64, 4);
        let buffer = store.new_buffer(format, SampleFormat::U8).unwrap();
        let coord = Coord::new(0, 0, 0);
        let tile = crate::tile::Tile::new(coord, format.tile_size_at(0));
        tile.store(vec![5; format.tile_size_at(0)]);
        buffer.set(coord, tile);
        assert!(buffer.get(coord).is_some());
    }

    #[test]
    fn set_cache_size_broadcasts_queue_max_to_swap_backends() {
        let dir = tempfile::tempdir().unwrap();
        let store = TileStore::new(test_config(1 << 20, dir.path())).unwrap();
        let format = TileFormat::new(64, 64, 4);
        let _buffer = store.new_buffer(format, SampleFormat::U8).unwrap();

        store.set_cache_size(10_000_000);
        assert_eq!(store.config().queue_size, 1_000_000);

        let backends = store.swap_backends.lock().unwrap();
        assert_eq!(backends.len(), 1);
        assert!(backends[0].upgrade().is_some());
    }

    #[test]
    fn dead_swap_backends_are_pruned_from_broadcast_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = TileStore::new(test_config(1 << 20, dir.path())).unwrap();
        let format = TileFormat::new(64, 64, 4);
        {
            let _buffer = store.new_buffer(format, SampleFormat::U8).unwrap();
        } // buffer (and its swap backend) dropped here.

        store.set_cache_size(2_000_000);
        assert_eq!(store.swap_backends.lock().unwrap().len(), 0);
    }

    #[test]
    fn set_threads_resizes_the_dispatcher() {
        let dir = tempfile::tempdir().unwrap();
        let store = TileStore::new(test_config(1 << 20, dir.path())).unwrap();
        store.set_threads(1);
        assert_eq!(store.dispatcher().pool_size(), 1);
        let _ = Ordering::Relaxed;
    }
}
