//! Tile handlers: chain links between a user-facing [`crate::TileStore`] and
//! a terminal [`crate::backend`] that sit between the two and add behaviour
//! (caching, mipmap synthesis) without the backend needing to know about it.

pub mod cache;
pub mod zoom;

pub use cache::CacheHandler;
pub use zoom::{SampleFormat, ZoomHandler};
