//! S5: voiding a tile frees its on-disk extent for first-fit reuse by a
//! later write, rather than always appending to the end of the file.

use vfx_tile::backend::base::TileFormat;
use vfx_tile::backend::swap::SwapBackend;
use vfx_tile::config::SwapCompression;
use vfx_tile::{Coord, Tile, TileSource};

#[test]
fn voided_extent_is_reused_by_a_same_sized_write() {
    let dir = tempfile::tempdir().unwrap();
    let backend =
        SwapBackend::new(dir.path().join("swap"), TileFormat::new(4, 4, 1), &SwapCompression::None, 1 << 20).unwrap();

    let a = Coord::new(0, 0, 0);
    let b = Coord::new(1, 0, 0);
    let ta = Tile::new(a, 1024);
    ta.store(vec![1; 1024]);
    backend.set(a, ta);
    backend.flush();
    assert_eq!(backend.block_offset(a), Some(0));

    let tb = Tile::new(b, 2048);
    tb.store(vec![2; 2048]);
    backend.set(b, tb);
    backend.flush();
    assert_eq!(backend.block_offset(b), Some(1024));

    backend.void(a, None);
    backend.flush();

    let c = Coord::new(2, 0, 0);
    let tc = Tile::new(c, 1024);
    tc.store(vec![3; 1024]);
    backend.set(c, tc);
    backend.flush();

    assert_eq!(backend.block_offset(c), Some(0), "first-fit should reuse the gap freed by voiding `a`, not grow the file");
}
