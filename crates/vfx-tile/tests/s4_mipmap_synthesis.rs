//! S4: mipmap synthesis box-averages four level-0 children into their
//! shared level-1 parent's four quadrants.

use std::sync::Arc;

use vfx_tile::backend::base::TileFormat;
use vfx_tile::backend::memory::MemoryBackend;
use vfx_tile::handler::{SampleFormat, ZoomHandler};
use vfx_tile::{Coord, Tile, TileSource};

fn solid_tile(coord: Coord, size: usize, value: u8) -> Tile {
    let tile = Tile::new(coord, size);
    tile.store(vec![value; size]);
    tile.clear_damage();
    tile
}

#[test]
fn quadrants_are_the_box_average_of_their_children() {
    let backend = Arc::new(MemoryBackend::new(TileFormat::new(4, 4, 1)));
    backend.set(Coord::new(0, 0, 0), solid_tile(Coord::new(0, 0, 0), 16, 10));
    backend.set(Coord::new(1, 0, 0), solid_tile(Coord::new(1, 0, 0), 16, 20));
    backend.set(Coord::new(0, 1, 0), solid_tile(Coord::new(0, 1, 0), 16, 30));
    backend.set(Coord::new(1, 1, 0), solid_tile(Coord::new(1, 1, 0), 16, 40));

    let zoom = ZoomHandler::new(backend, TileFormat::new(4, 4, 1), SampleFormat::U8);
    let parent = zoom.get(Coord::new(0, 0, 1)).expect("mipmap level must synthesize from its children");
    let bytes = parent.read_lock().bytes();

    // each quadrant of the 4x4 parent is a 2x2 block; every child is a
    // solid colour, so its box average equals that colour exactly.
    let expect_quadrant = |ox: usize, oy: usize, value: f64| {
        for dy in 0..2 {
            for dx in 0..2 {
                let px = bytes[(oy + dy) * 4 + ox + dx] as f64;
                approx::assert_abs_diff_eq!(px, value, epsilon = 1.0);
            }
        }
    };
    expect_quadrant(0, 0, 10.0);
    expect_quadrant(2, 0, 20.0);
    expect_quadrant(0, 2, 30.0);
    expect_quadrant(2, 2, 40.0);
}
