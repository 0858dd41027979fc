//! Terminal tile sources: the bottom of a handler
//! chain, where a `GET` either computes/loads a tile or gives up.
//!
//! [`base::TileBackendBase`] is the common geometry/format-declaring shell
//! every concrete backend embeds. [`swap::SwapBackend`] is the on-disk spill
//! target; [`buffer::BufferBackend`] forwards into another buffer's own
//! chain, for nested buffers (an operation whose output is itself a tiled
//! source).

pub mod base;
pub mod buffer;
pub mod memory;
pub mod swap;

pub use base::TileBackendBase;
pub use buffer::BufferBackend;
pub use memory::MemoryBackend;
pub use swap::SwapBackend;
