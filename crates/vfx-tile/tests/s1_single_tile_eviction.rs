//! S1: a single tile's write survives a forced eviction round-trip through swap.

use vfx_tile::config::SwapLocation;
use vfx_tile::{Coord, Tile, TileSource, TileStore, TileStoreConfig};

fn store_with_swap(budget: u64, dir: &std::path::Path) -> TileStore {
    let mut config = TileStoreConfig::default();
    config.tile_width = 64;
    config.tile_height = 64;
    config.tile_cache_size = budget;
    config.swap = SwapLocation::Path(dir.to_path_buf());
    config.recompute_queue_size();
    TileStore::new(config).unwrap()
}

#[test]
fn single_tile_write_read_survives_forced_eviction() {
    let dir = tempfile::tempdir().unwrap();
    let bpp = 4usize;
    let tile_bytes = 64 * 64 * bpp;
    let budget = (tile_bytes * 2) as u64;
    let store = store_with_swap(budget, dir.path());

    let format = vfx_tile::backend::base::TileFormat::new(64, 64, bpp as u32);
    let buffer = store.new_buffer(format, vfx_tile::handler::SampleFormat::U8).unwrap();

    let target = Coord::new(0, 0, 0);
    let mut payload = vec![0u8; tile_bytes];
    payload[(7 * 64 + 3) * bpp] = 1;
    let tile = Tile::new(target, tile_bytes);
    tile.lock().write(&payload);
    buffer.set(target, tile);

    // overflow the budget with filler tiles to force the written tile out
    // of the in-memory cache.
    for i in 1..20 {
        let coord = Coord::new(i, 0, 0);
        buffer.set(coord, Tile::new(coord, tile_bytes));
    }

    assert!(store.registry().cache_total() <= budget);

    let fetched = buffer.get(target).expect("evicted tile must be refetchable from swap");
    assert_eq!(fetched.read_lock().bytes()[(7 * 64 + 3) * bpp], 1);
}
