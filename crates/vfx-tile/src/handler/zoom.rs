//! Mipmap (zoom) handler.
//!
//! Requests at level `z > 0` are
//! served from downstream if already valid; otherwise this handler
//! downscales the four level-`z-1` children into the requested tile's four
//! quadrants, fetching each child through `self.get` (not `downstream.get`)
//! so the recursion is cache-assisted at every intermediate level — a
//! request three levels deep pulls each ancestor level through the same
//! cache sitting below this handler.

use std::sync::Arc;

use crate::backend::base::TileFormat;
use crate::source::{Command, Response, TileSource};
use crate::tile::{quadrant_damage_mask, Coord, Tile};

/// How a tile's payload bytes encode one pixel channel, for the box-filter
/// downscale primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleFormat {
    /// Unsigned 8-bit channels (most 8-bit image formats).
    U8,
    /// IEEE-754 32-bit float channels, little-endian in the payload.
    F32,
}

/// Synthesises level `z+1` tiles from four level-`z` children.
pub struct ZoomHandler {
    downstream: Arc<dyn TileSource>,
    format: TileFormat,
    sample_format: SampleFormat,
}

impl ZoomHandler {
    /// Wrap `downstream` (typically a [`crate::handler::cache::CacheHandler`])
    /// with mipmap synthesis for the given tile geometry/pixel layout.
    pub fn new(downstream: Arc<dyn TileSource>, format: TileFormat, sample_format: SampleFormat) -> Self {
        ZoomHandler { downstream, format, sample_format }
    }

    fn level_dims(&self, z: u32) -> (usize, usize) {
        let shift = z.min(30);
        let w = (self.format.tile_width >> shift).max(1) as usize;
        let h = (self.format.tile_height >> shift).max(1) as usize;
        (w, h)
    }

    fn get_impl(&self, coord: Coord) -> Option<Tile> {
        if coord.z == 0 {
            return self.downstream.get(coord);
        }

        let existing = self.downstream.get(coord);
        if let Some(tile) = &existing {
            if tile.damage() == 0 {
                return existing;
            }
        }

        self.synthesize(coord, existing)
    }

    /// Recompute the damaged quadrants of the tile at `coord` (`z > 0`)
    /// from its four level-`z-1` children.
    fn synthesize(&self, coord: Coord, existing: Option<Tile>) -> Option<Tile> {
        let bpp = self.format.bytes_per_pixel as usize;
        let (w, h) = self.level_dims(coord.z);
        let dst_size = w * h * bpp;

        let dst_tile = existing.unwrap_or_else(|| Tile::new(coord, dst_size));
        // clear damage before recursing: if a child fetch turns out to
        // void this (upper-level) tile through some side channel, the
        // damaged region it sees is no longer "full" and the tile survives.
        let saved_damage = dst_tile.clear_damage();

        let mut buf = dst_tile.read_lock().bytes().as_slice().to_vec();
        if buf.len() != dst_size {
            buf = vec![0u8; dst_size];
        }

        let half_w = (w / 2).max(1);
        let half_h = (h / 2).max(1);

        let mut resolved_mask = 0u64;
        let mut any_child = false;

        for q in 0..4u32 {
            let bit_mask = quadrant_damage_mask(q);
            if saved_damage & bit_mask == 0 {
                continue;
            }

            let (dx, dy) = (q & 1, q >> 1);
            let child_coord = Coord::new(coord.x * 2 + dx as i32, coord.y * 2 + dy as i32, coord.z - 1);
            let Some(child) = self.get(child_coord) else { continue };
            any_child = true;

            let origin_x = dx as usize * half_w;
            let origin_y = dy as usize * half_h;

            if child.is_zero_tile() {
                zero_quadrant(&mut buf, w, bpp, origin_x, origin_y, half_w, half_h);
            } else {
                let child_bytes = child.read_lock().bytes();
                let (child_w, child_h) = self.level_dims(coord.z - 1);
                downscale_quadrant(
                    self.sample_format,
                    child_bytes.as_slice(),
                    child_w,
                    child_h,
                    bpp,
                    &mut buf,
                    w,
                    origin_x,
                    origin_y,
                );
            }
            resolved_mask |= bit_mask;
        }

        if !any_child && dst_tile.damage() == 0 {
            // no pre-existing content and nothing to synthesise from: the
            // pyramid is empty here. Let an upstream empty-tile handler
            // substitute the shared zero tile.
            return None;
        }

        dst_tile.lock().write(&buf);
        dst_tile.restore_damage(saved_damage & !resolved_mask);
        self.downstream.set(coord, dst_tile.clone());
        Some(dst_tile)
    }
}

fn zero_quadrant(dst: &mut [u8], dst_stride_px: usize, bpp: usize, origin_x: usize, origin_y: usize, half_w: usize, half_h: usize) {
    for ry in 0..half_h {
        let row_start = ((origin_y + ry) * dst_stride_px + origin_x) * bpp;
        let row_len = half_w * bpp;
        if row_start + row_len <= dst.len() {
            dst[row_start..row_start + row_len].fill(0);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn downscale_quadrant(
    format: SampleFormat,
    child: &[u8],
    child_w: usize,
    child_h: usize,
    bpp: usize,
    dst: &mut [u8],
    dst_stride_px: usize,
    origin_x: usize,
    origin_y: usize,
) {
    let half_w = child_w / 2;
    let half_h = child_h / 2;

    for ry in 0..half_h.min(child_h / 2) {
        for rx in 0..half_w {
            let dst_idx = ((origin_y + ry) * dst_stride_px + (origin_x + rx)) * bpp;
            if dst_idx + bpp > dst.len() {
                continue;
            }
            match format {
                SampleFormat::U8 => {
                    for c in 0..bpp {
                        let sum: u32 = [(0, 0), (1, 0), (0, 1), (1, 1)]
                            .iter()
                            .map(|&(ox, oy)| {
                                let px = rx * 2 + ox;
                                let py = ry * 2 + oy;
                                child[(py * child_w + px) * bpp + c] as u32
                            })
                            .sum();
                        dst[dst_idx + c] = ((sum + 2) / 4) as u8;
                    }
                }
                SampleFormat::F32 => {
                    for c in 0..bpp / 4 {
                        let sample = |ox: usize, oy: usize| -> f32 {
                            let px = rx * 2 + ox;
                            let py = ry * 2 + oy;
                            let off = (py * child_w + px) * bpp + c * 4;
                            f32::from_le_bytes(child[off..off + 4].try_into().unwrap())
                        };
                        let avg = (sample(0, 0) + sample(1, 0) + sample(0, 1) + sample(1, 1)) * 0.25;
                        let out = avg.to_le_bytes();
                        dst[dst_idx + c * 4..dst_idx + c * 4 + 4].copy_from_slice(&out);
                    }
                }
            }
        }
    }
}

impl TileSource for ZoomHandler {
    fn downstream(&self) -> Option<&dyn TileSource> {
        Some(self.downstream.as_ref())
    }

    fn dispatch(&self, command: Command) -> Response {
        match command {
            Command::Get { coord } => Response::Tile(self.get_impl(coord)),
            other => self.forward(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemoryBackend {
        tiles: Mutex<HashMap<Coord, Tile>>,
    }

    impl TileSource for MemoryBackend {
        fn downstream(&self) -> Option<&dyn TileSource> {
            None
        }
        fn dispatch(&self, command: Command) -> Response {
            match command {
                Command::Get { coord } => Response::Tile(self.tiles.lock().unwrap().get(&coord).cloned()),
                Command::Set { coord, tile } => {
                    self.tiles.lock().unwrap().insert(coord, tile);
                    Response::None
                }
                other => self.forward(other),
            }
        }
    }

    fn solid_tile(coord: Coord, size: usize, value: u8) -> Tile {
        let tile = Tile::new(coord, size);
        tile.store(vec![value; size]);
        tile.clear_damage();
        tile
    }

    #[test]
    fn synthesizes_box_average_from_four_children() {
        let backend = Arc::new(MemoryBackend { tiles: Mutex::new(HashMap::new()) });
        // 4x4 tiles, 1 byte/pixel, so each quadrant downscale is 2x2 -> 1x1... actually
        // use tile_width/height = 4 so each level-0 child is 4x4 and the
        // destination (level 1) is also 4x4 with each quadrant 2x2.
        let format = TileFormat::new(4, 4, 1);
        backend.set(Coord::new(0, 0, 0), solid_tile(Coord::new(0, 0, 0), 16, 10));
        backend.set(Coord::new(1, 0, 0), solid_tile(Coord::new(1, 0, 0), 16, 20));
        backend.set(Coord::new(0, 1, 0), solid_tile(Coord::new(0, 1, 0), 16, 30));
        backend.set(Coord::new(1, 1, 0), solid_tile(Coord::new(1, 1, 0), 16, 40));

        let zoom = ZoomHandler::new(backend, format, SampleFormat::U8);
        let parent = zoom.get(Coord::new(0, 0, 1)).expect("mipmap should synthesize");
        let bytes = parent.read_lock().bytes();

        // top-left quadrant (2x2 of the 4x4 dest) should be the downscale
        // of the (0,0,0) child, i.e. uniformly 10.
        assert_eq!(bytes[0], 10);
        // top-right quadrant comes from the (1,0,0) child, value 20.
        assert_eq!(bytes[2], 20);
        // bottom-left quadrant comes from the (0,1,0) child, value 30.
        assert_eq!(bytes[2 * 4], 30);
        // bottom-right quadrant comes from the (1,1,0) child, value 40.
        assert_eq!(bytes[2 * 4 + 2], 40);
    }

    #[test]
    fn empty_pyramid_returns_none() {
        let backend = Arc::new(MemoryBackend { tiles: Mutex::new(HashMap::new()) });
        let format = TileFormat::new(4, 4, 1);
        let zoom = ZoomHandler::new(backend, format, SampleFormat::U8);
        assert!(zoom.get(Coord::new(0, 0, 1)).is_none());
    }
}
