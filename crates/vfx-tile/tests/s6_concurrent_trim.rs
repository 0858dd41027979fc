//! S6: many threads inserting tiles concurrently never push the process-wide
//! cache total past its budget.

use vfx_tile::backend::base::TileFormat;
use vfx_tile::config::SwapLocation;
use vfx_tile::handler::SampleFormat;
use vfx_tile::{Coord, Tile, TileSource, TileStore, TileStoreConfig};

#[test]
fn concurrent_inserts_stay_within_budget() {
    let dir = tempfile::tempdir().unwrap();
    let bpp = 1usize;
    let tile_bytes = 16 * 16 * bpp;
    let budget = (tile_bytes * 200) as u64; // far fewer than the 8000 tiles below.

    let mut config = TileStoreConfig::default();
    config.tile_width = 16;
    config.tile_height = 16;
    config.tile_cache_size = budget;
    config.swap = SwapLocation::Path(dir.path().to_path_buf());
    config.recompute_queue_size();
    config.threads = 8;
    let store = TileStore::new(config).unwrap();

    let format = TileFormat::new(16, 16, bpp as u32);
    let buffer = store.new_buffer(format, SampleFormat::U8).unwrap();

    std::thread::scope(|scope| {
        for t in 0..8i32 {
            let buffer = &buffer;
            scope.spawn(move || {
                for i in 0..1000i32 {
                    let coord = Coord::new(t * 1000 + i, 0, 0);
                    let tile = Tile::new(coord, tile_bytes);
                    tile.store(vec![t as u8; tile_bytes]);
                    buffer.set(coord, tile);
                }
            });
        }
    });

    assert!(
        store.registry().cache_total() <= budget,
        "cache_total {} exceeded budget {} after concurrent inserts",
        store.registry().cache_total(),
        budget
    );
}
