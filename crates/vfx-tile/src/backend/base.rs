//! Tile backend base.
//!
//! Every concrete backend embeds a [`TileBackendBase`] to declare its tile
//! geometry and pixel format. On its own (no concrete storage wired up) it
//! is a terminal [`TileSource`] that answers every command with the
//! protocol's benign null, which is what [`buffer::BufferBackend`] and
//! [`swap::SwapBackend`] both build on.

use crate::source::TileSource;

/// Pixel format declaration: everything a backend needs to know the byte
/// size of one tile at a given mipmap level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFormat {
    /// Tile grid horizontal step, in pixels, at level 0.
    pub tile_width: u32,
    /// Tile grid vertical step, in pixels, at level 0.
    pub tile_height: u32,
    /// Bytes per pixel of the backend's native pixel format.
    pub bytes_per_pixel: u32,
}

impl TileFormat {
    /// Construct a format declaration.
    pub fn new(tile_width: u32, tile_height: u32, bytes_per_pixel: u32) -> Self {
        TileFormat { tile_width, tile_height, bytes_per_pixel }
    }

    /// Payload byte count for a tile at mipmap level `z`.
    pub fn tile_size_at(&self, z: u32) -> usize {
        let shift = z.min(30);
        let w = (self.tile_width >> shift).max(1) as usize;
        let h = (self.tile_height >> shift).max(1) as usize;
        w * h * self.bytes_per_pixel as usize
    }
}

/// Common shell every terminal backend embeds: the geometry/format
/// declaration plus the terminal-node behaviour of [`TileSource`].
///
/// Holding a `TileBackendBase` rather than duplicating `downstream()` /
/// `dispatch()` boilerplate in every backend lets the terminal case fall out
/// of the same trait default every handler uses, instead of a special
/// "is this the bottom" check.
#[derive(Debug, Clone, Copy)]
pub struct TileBackendBase {
    format: TileFormat,
}

impl TileBackendBase {
    /// Construct a base with the given tile geometry/format.
    pub fn new(format: TileFormat) -> Self {
        TileBackendBase { format }
    }

    /// The declared tile format.
    pub fn format(&self) -> TileFormat {
        self.format
    }
}

impl TileSource for TileBackendBase {
    fn downstream(&self) -> Option<&dyn TileSource> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Coord;

    #[test]
    fn tile_size_halves_per_mipmap_level() {
        let fmt = TileFormat::new(128, 128, 4);
        assert_eq!(fmt.tile_size_at(0), 128 * 128 * 4);
        assert_eq!(fmt.tile_size_at(1), 64 * 64 * 4);
        assert_eq!(fmt.tile_size_at(7), 1 * 1 * 4);
    }

    #[test]
    fn bare_base_is_terminal_and_null() {
        let base = TileBackendBase::new(TileFormat::new(128, 128, 4));
        assert!(base.get(Coord::new(0, 0, 0)).is_none());
        assert!(!base.exists(Coord::new(0, 0, 0)));
    }
}
