//! Buffer-backed backend.
//!
//! Some buffers are defined entirely in terms of another buffer's tiles —
//! for example a crop or a view onto a larger raster. Rather than giving
//! such a buffer its own swap storage, its chain terminates in a
//! `BufferBackend` that forwards every command straight to the other
//! buffer's top-of-chain source. A coordinate offset between the two
//! buffers could be layered on top of this forwarding; only the
//! identity-mapped case is needed by any current caller, so the offset is
//! left as a follow-up rather than an untested transform.

use std::sync::Arc;

use crate::backend::base::{TileBackendBase, TileFormat};
use crate::source::{Command, Response, TileSource};

/// Forwards every command to another buffer's top-level source instead of
/// owning pixel storage itself.
pub struct BufferBackend {
    base: TileBackendBase,
    target: Arc<dyn TileSource>,
}

impl BufferBackend {
    /// Wrap `target` (the nested buffer's top-of-chain source) so this
    /// backend's own chain resolves every command against it.
    pub fn new(format: TileFormat, target: Arc<dyn TileSource>) -> Self {
        BufferBackend { base: TileBackendBase::new(format), target }
    }

    /// The declared tile format.
    pub fn format(&self) -> TileFormat {
        self.base.format()
    }
}

impl TileSource for BufferBackend {
    fn downstream(&self) -> Option<&dyn TileSource> {
        // `BufferBackend` is terminal with respect to its own chain; it
        // delegates entirely through `dispatch` below rather than acting as
        // a pass-through link, since the nested buffer's source isn't
        // reachable as a `&dyn TileSource` borrowed from `self`.
        None
    }

    fn dispatch(&self, command: Command) -> Response {
        self.target.dispatch(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{Coord, Tile};

    struct Stub(Tile);
    impl TileSource for Stub {
        fn downstream(&self) -> Option<&dyn TileSource> {
            None
        }
        fn dispatch(&self, command: Command) -> Response {
            match command {
                Command::Get { .. } => Response::Tile(Some(self.0.clone())),
                other => self.forward(other),
            }
        }
    }

    #[test]
    fn forwards_get_to_target() {
        let tile = Tile::new(Coord::new(0, 0, 0), 16);
        let target: Arc<dyn TileSource> = Arc::new(Stub(tile.clone()));
        let backend = BufferBackend::new(TileFormat::new(128, 128, 4), target);
        let got = backend.get(Coord::new(5, 5, 0)).unwrap();
        assert_eq!(got.coord(), tile.coord());
    }
}
