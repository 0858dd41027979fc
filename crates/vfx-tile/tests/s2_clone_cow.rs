//! S2: two tiles sharing one payload via `dup`; mutating one leaves the
//! other's bytes untouched and costs at most one extra tile's worth of
//! cache accounting.

use vfx_tile::backend::base::TileFormat;
use vfx_tile::config::SwapLocation;
use vfx_tile::handler::SampleFormat;
use vfx_tile::{Coord, Tile, TileSource, TileStore, TileStoreConfig};

#[test]
fn clone_cow_keeps_second_buffer_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = TileStoreConfig::default();
    config.tile_width = 64;
    config.tile_height = 64;
    config.tile_cache_size = 16 * 1024 * 1024;
    config.swap = SwapLocation::Path(dir.path().to_path_buf());
    config.recompute_queue_size();
    let store = TileStore::new(config).unwrap();

    let format = TileFormat::new(64, 64, 1);
    let buffer = store.new_buffer(format, SampleFormat::U8).unwrap();

    let coord = Coord::new(0, 0, 0);
    let original = Tile::new(coord, 64 * 64);
    original.store(vec![9; 64 * 64]);
    buffer.set(coord, original.clone());

    let clone = original.dup();
    let total_before = store.registry().cache_total();

    clone.lock().write(&vec![1u8; 64 * 64]);

    assert_eq!(original.read_lock().bytes().as_slice(), &vec![9u8; 64 * 64][..]);
    assert_eq!(clone.read_lock().bytes().as_slice(), &vec![1u8; 64 * 64][..]);
    // the clone was never inserted into the cache itself, so accounting
    // grows by at most one more tile's worth.
    assert!(store.registry().cache_total() <= total_before + (64 * 64) as u64);
}

#[test]
fn dup_of_a_keep_identity_tile_deep_copies_eagerly() {
    // the zero tile is the crate's one `keep_identity` tile; `dup` on it
    // must not fold the clone into its shared identity.
    let zero = Tile::new_zero(Coord::new(0, 0, 0), 16);
    assert!(zero.keep_identity());
    zero.add_damage(0xFF);

    let clone = zero.dup();
    assert!(!clone.is_zero_tile());
    assert!(!clone.keep_identity());
    assert_eq!(clone.damage(), 0);
    assert_eq!(clone.rev(), zero.rev() + 1);
    assert_eq!(clone.read_lock().bytes().as_slice(), zero.read_lock().bytes().as_slice());

    // mutating the clone must never touch the shared zero tile.
    clone.lock().write(&vec![5u8; 16]);
    assert_eq!(zero.read_lock().bytes().as_slice(), &vec![0u8; 16][..]);
}
