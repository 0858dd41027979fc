//! Tile source command protocol.
//!
//! Every handler operation dispatches through one command value, with
//! unrecognised commands forwarded downstream by convention and a terminal
//! default handler returning null. The forwarding convention is enforced by
//! the compiler rather than by runtime assertion:
//! [`Command`]/[`Response`] are closed enums, and
//! [`TileSource::dispatch`] has a default body that matches only the
//! variants a handler cares about and forwards everything else to
//! [`TileSource::downstream`] — so adding a new command variant is still
//! ABI-safe in the sense that existing handlers don't need to change, but a
//! handler author who *does* want to special-case a command gets exhaustive
//! compiler-checked matching instead of a runtime assert.

use crate::tile::{Coord, Tile};

/// A request issued to a [`TileSource`].
#[derive(Debug, Clone)]
pub enum Command {
    /// Fetch the tile at `coord`.
    Get { coord: Coord },
    /// Install `tile` at `coord`, replacing any existing content.
    Set { coord: Coord, tile: Tile },
    /// Ask whether `coord` is currently resident in a cache.
    IsCached { coord: Coord },
    /// Ask whether any data exists at `coord` (cache or backend).
    Exist { coord: Coord },
    /// Opportunistic low-priority background work (one wash/flush tick).
    Idle,
    /// Invalidate `coord`; `mask` is `None` for "fully damaged".
    Void { coord: Coord, mask: Option<u64> },
    /// Force all dirty tiles to be written through to the backend.
    Flush,
    /// Drop any in-memory copy of `coord` and force a fresh fetch next time.
    Refetch { coord: Coord },
    /// Reset a handler's internal state (e.g. after a geometry change).
    Reinit,
    /// Copy the tile at `src` to `dst`, sharing the underlying block.
    Copy { src: Coord, dst: Coord },
}

/// The result of dispatching a [`Command`].
#[derive(Debug, Clone)]
pub enum Response {
    /// A tile was found (`Get`) or nothing meaningful was produced.
    Tile(Option<Tile>),
    /// A boolean result (`IsCached`, `Exist`, `Copy`).
    Bool(bool),
    /// No result value (`Set`, `Void`, `Flush`, `Refetch`, `Reinit`).
    None,
}

impl Response {
    /// Unwrap a `Tile` response, or `None` for anything else.
    pub fn into_tile(self) -> Option<Tile> {
        match self {
            Response::Tile(t) => t,
            _ => None,
        }
    }

    /// Unwrap a `Bool` response, defaulting to `false` for anything else.
    pub fn into_bool(self) -> bool {
        matches!(self, Response::Bool(true))
    }
}

/// One link in a tile handler chain.
///
/// Implementors only need [`TileSource::downstream`] and whichever commands
/// they actually handle; [`TileSource::dispatch`]'s default body forwards
/// everything else, matching the source protocol's forward-compatibility
/// rule.
pub trait TileSource: Send + Sync {
    /// The next source in the chain, or `None` at the terminal backend.
    fn downstream(&self) -> Option<&dyn TileSource>;

    /// Handle `command`, forwarding anything this handler doesn't
    /// override to [`TileSource::downstream`]. A terminal source (no
    /// downstream) returns the command's benign null response.
    fn dispatch(&self, command: Command) -> Response {
        self.forward(command)
    }

    /// Forward `command` to the downstream source, or return its benign
    /// null response if this is the terminal link.
    fn forward(&self, command: Command) -> Response {
        match self.downstream() {
            Some(next) => next.dispatch(command),
            None => Self::terminal_response(&command),
        }
    }

    /// The response a terminal handler (no downstream, nothing cached)
    /// gives for a command it has never heard of.
    fn terminal_response(command: &Command) -> Response
    where
        Self: Sized,
    {
        match command {
            Command::Get { .. } => Response::Tile(None),
            Command::IsCached { .. } | Command::Exist { .. } | Command::Copy { .. } => {
                Response::Bool(false)
            }
            Command::Idle => Response::Bool(false),
            Command::Set { .. }
            | Command::Void { .. }
            | Command::Flush
            | Command::Refetch { .. }
            | Command::Reinit => Response::None,
        }
    }

    /// Convenience wrapper around [`TileSource::dispatch`] for `Get`.
    fn get(&self, coord: Coord) -> Option<Tile> {
        self.dispatch(Command::Get { coord }).into_tile()
    }

    /// Convenience wrapper around [`TileSource::dispatch`] for `Set`.
    fn set(&self, coord: Coord, tile: Tile) {
        self.dispatch(Command::Set { coord, tile });
    }

    /// Convenience wrapper around [`TileSource::dispatch`] for `Void`.
    fn void(&self, coord: Coord, mask: Option<u64>) {
        self.dispatch(Command::Void { coord, mask });
    }

    /// Convenience wrapper around [`TileSource::dispatch`] for `Exist`.
    fn exists(&self, coord: Coord) -> bool {
        self.dispatch(Command::Exist { coord }).into_bool()
    }

    /// Convenience wrapper around [`TileSource::dispatch`] for `IsCached`.
    fn is_cached(&self, coord: Coord) -> bool {
        self.dispatch(Command::IsCached { coord }).into_bool()
    }

    /// Convenience wrapper around [`TileSource::dispatch`] for `Idle`.
    fn idle(&self) -> bool {
        self.dispatch(Command::Idle).into_bool()
    }

    /// Convenience wrapper around [`TileSource::dispatch`] for `Flush`.
    fn flush(&self) {
        self.dispatch(Command::Flush);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TerminalStub;

    impl TileSource for TerminalStub {
        fn downstream(&self) -> Option<&dyn TileSource> {
            None
        }
    }

    #[test]
    fn terminal_get_is_none() {
        let stub = TerminalStub;
        assert!(stub.get(Coord::new(0, 0, 0)).is_none());
    }

    #[test]
    fn terminal_exist_is_false() {
        let stub = TerminalStub;
        assert!(!stub.exists(Coord::new(0, 0, 0)));
    }

    struct Passthrough<'a> {
        next: &'a dyn TileSource,
    }

    impl TileSource for Passthrough<'_> {
        fn downstream(&self) -> Option<&dyn TileSource> {
            Some(self.next)
        }
    }

    #[test]
    fn unrecognised_command_forwards_downstream() {
        let terminal = TerminalStub;
        let mid = Passthrough { next: &terminal };
        // `mid` handles nothing itself; everything forwards to `terminal`.
        assert!(!mid.is_cached(Coord::new(1, 2, 0)));
        assert!(mid.get(Coord::new(1, 2, 0)).is_none());
    }
}
