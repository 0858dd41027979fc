//! In-memory-only terminal backend.
//!
//! When a [`crate::TileStore`] is configured with `swap = None`, buffers
//! built through [`crate::TileStore::new_buffer`] terminate here instead of
//! in [`crate::backend::swap::SwapBackend`]: `GET`/`SET` keep working, but
//! nothing is ever written to disk, so eviction from the cache above this
//! backend is effectively data loss (the authoritative copy the cache was
//! about to drop is exactly what gets stored here, same as the swap
//! backend would — the difference is only that this store never persists
//! past process exit).

use std::collections::HashMap;
use std::sync::Mutex;

use crate::backend::base::{TileBackendBase, TileFormat};
use crate::source::{Command, Response, TileSource};
use crate::tile::{Coord, Tile};

/// Terminal backend that keeps tiles in a plain in-memory table.
pub struct MemoryBackend {
    base: TileBackendBase,
    tiles: Mutex<HashMap<Coord, Tile>>,
}

impl MemoryBackend {
    /// Construct an empty in-memory backend for the given tile geometry.
    pub fn new(format: TileFormat) -> Self {
        MemoryBackend { base: TileBackendBase::new(format), tiles: Mutex::new(HashMap::new()) }
    }

    /// The declared tile format.
    pub fn format(&self) -> TileFormat {
        self.base.format()
    }

    /// Number of tiles currently held.
    pub fn len(&self) -> usize {
        self.tiles.lock().unwrap().len()
    }

    /// True if no tiles are currently held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
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
            Command::Exist { coord } | Command::IsCached { coord } => {
                Response::Bool(self.tiles.lock().unwrap().contains_key(&coord))
            }
            Command::Void { coord, .. } => {
                if self.tiles.lock().unwrap().remove(&coord).is_none() {
                    tracing::warn!(?coord, "void on an untracked in-memory tile");
                }
                Response::None
            }
            Command::Copy { src, dst } => {
                let mut tiles = self.tiles.lock().unwrap();
                match tiles.get(&src).cloned() {
                    Some(tile) => {
                        tiles.insert(dst, tile);
                        Response::Bool(true)
                    }
                    None => Response::Bool(false),
                }
            }
            other => Self::terminal_response(&other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let backend = MemoryBackend::new(TileFormat::new(128, 128, 4));
        let coord = Coord::new(0, 0, 0);
        let tile = Tile::new(coord, 16);
        tile.store(vec![9; 16]);
        backend.set(coord, tile);
        let fetched = backend.get(coord).unwrap();
        assert_eq!(fetched.read_lock().bytes().as_slice(), &[9; 16]);
    }

    #[test]
    fn void_drops_the_tile() {
        let backend = MemoryBackend::new(TileFormat::new(128, 128, 4));
        let coord = Coord::new(1, 1, 0);
        backend.set(coord, Tile::new(coord, 8));
        backend.void(coord, None);
        assert!(backend.get(coord).is_none());
    }

    #[test]
    fn copy_shares_payload_between_coordinates() {
        let backend = MemoryBackend::new(TileFormat::new(128, 128, 4));
        let src = Coord::new(0, 0, 0);
        let dst = Coord::new(1, 0, 0);
        let tile = Tile::new(src, 4);
        tile.store(vec![1, 2, 3, 4]);
        backend.set(src, tile);
        assert!(backend.dispatch(Command::Copy { src, dst }).into_bool());
        assert_eq!(backend.get(dst).unwrap().read_lock().bytes().as_slice(), &[1, 2, 3, 4]);
    }
}
