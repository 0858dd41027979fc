//! Tile-based storage substrate for buffers too large to keep resident.
//!
//! `vfx-tile` divides a raster into fixed-size tiles, caches a bounded
//! working set in memory, and spills the rest to an on-disk swap file. Tiles
//! are shared copy-on-write across logical buffers and regenerated on demand
//! through a chain of pluggable sources.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │         Producer (an operation graph node, out of scope)        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                   handler::zoom::ZoomHandler                    │
//! │        synthesises level z+1 from four level-z children         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                  handler::cache::CacheHandler                   │
//! │     per-buffer LRU, global accounting, wash/trim eviction        │
//! ├─────────────────────────────────────────────────────────────────┤
//! │     backend::swap::SwapBackend  |  backend::buffer::BufferBackend│
//! │   async spill-to-disk, gap list |  forwards to a nested buffer   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every stage implements [`source::TileSource`] and is composed by holding
//! a reference to the stage below it; [`source::Command`] dispatch is
//! uniform across the chain.
//!
//! # Quick start
//!
//! ```ignore
//! use vfx_tile::{TileStore, TileStoreConfig};
//!
//! let config = TileStoreConfig::from_env();
//! let store = TileStore::new(config)?;
//! let tile = store.get(0, 0, 0);
//! ```
//!
//! # Feature flags
//!
//! This crate has no optional features; swap compression is pluggable
//! through [`backend::swap::Compressor`] rather than a Cargo feature, since
//! the codec is a runtime (configuration) choice, not a build-time one.

#![warn(missing_docs)]

pub mod alloc;
pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod parallel;
pub mod processor;
pub mod source;
pub mod swap_dir;
pub mod tile;

pub use config::TileStoreConfig;
pub use context::TileStore;
pub use error::{Result, TileError};
pub use source::{Command, Response, TileSource};
pub use tile::{Coord, Tile, DAMAGE_FULL};

/// Convenient re-exports for callers that want the whole public surface.
pub mod prelude {
    pub use crate::config::TileStoreConfig;
    pub use crate::context::TileStore;
    pub use crate::error::{Result, TileError};
    pub use crate::processor::Processor;
    pub use crate::source::{Command, Response, TileSource};
    pub use crate::tile::{Coord, Tile};
}
