//! Settings object and environment variable overrides.
//!
//! Precedence follows the same pattern already used elsewhere in this
//! workspace for memory/backend tunables: explicit constructor argument >
//! environment variable > built-in default. Parsing happens once, at
//! [`TileStoreConfig::from_env`] call time, never through a cached global —
//! tests need to build several independently-configured stores in one
//! process.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, TileError};

/// Swap compression codec selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapCompression {
    /// No compression.
    None,
    /// Fast, low-ratio compression (the default).
    Fast,
    /// Implementation-defined named codec.
    Named(String),
}

impl SwapCompression {
    fn parse(s: &str) -> Self {
        match s {
            "none" => SwapCompression::None,
            "fast" => SwapCompression::Fast,
            other => SwapCompression::Named(other.to_string()),
        }
    }
}

impl Default for SwapCompression {
    fn default() -> Self {
        SwapCompression::Fast
    }
}

/// Where the swap file lives, or that swap is disabled entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapLocation {
    /// Swap is disabled; the backend behaves as memory-only.
    Disabled,
    /// Swap directory path (created on first use).
    Path(PathBuf),
}

/// Process-wide tunables for a [`crate::TileStore`].
#[derive(Debug, Clone)]
pub struct TileStoreConfig {
    /// Tile grid horizontal step, in pixels. Must be >= 1.
    pub tile_width: u32,
    /// Tile grid vertical step, in pixels. Must be >= 1.
    pub tile_height: u32,
    /// Process-wide cache budget, in bytes.
    pub tile_cache_size: u64,
    /// Swap directory, or [`SwapLocation::Disabled`].
    pub swap: SwapLocation,
    /// Swap compression codec.
    pub swap_compression: SwapCompression,
    /// Maximum in-flight swap write queue, in bytes.
    pub queue_size: u64,
    /// Worker pool size (including the calling thread).
    pub threads: usize,
}

const DEFAULT_TILE_WIDTH: u32 = 128;
const DEFAULT_TILE_HEIGHT: u32 = 128;
const DEFAULT_CACHE_SIZE: u64 = 512 * 1024 * 1024;
const DEFAULT_QUEUE_SIZE: u64 = 50 * 1024 * 1024;

impl Default for TileStoreConfig {
    fn default() -> Self {
        TileStoreConfig {
            tile_width: DEFAULT_TILE_WIDTH,
            tile_height: DEFAULT_TILE_HEIGHT,
            tile_cache_size: DEFAULT_CACHE_SIZE,
            swap: default_swap_dir(),
            swap_compression: SwapCompression::default(),
            queue_size: DEFAULT_QUEUE_SIZE,
            threads: default_thread_count(),
        }
    }
}

impl TileStoreConfig {
    /// Build a config from the process environment, falling back to
    /// built-in defaults for anything unset or unparsable.
    ///
    /// Recognised variables: `GEGL_CACHE_SIZE` (integer MiB),
    /// `GEGL_TILE_SIZE` (`WxH`), `GEGL_SWAP` (path or `none`),
    /// `GEGL_SWAP_COMPRESSION` (codec name), `GEGL_THREADS` (integer >= 1).
    /// Malformed values are logged and ignored rather than rejected.
    pub fn from_env() -> Self {
        let mut config = TileStoreConfig::default();

        if let Ok(raw) = env::var("GEGL_CACHE_SIZE") {
            match raw.parse::<u64>() {
                Ok(mib) => config.tile_cache_size = mib * 1024 * 1024,
                Err(_) => tracing::warn!(value = %raw, "ignoring malformed GEGL_CACHE_SIZE"),
            }
        }

        if let Ok(raw) = env::var("GEGL_TILE_SIZE") {
            match parse_tile_size(&raw) {
                Some((w, h)) => {
                    config.tile_width = w;
                    config.tile_height = h;
                }
                None => tracing::warn!(value = %raw, "ignoring malformed GEGL_TILE_SIZE (expected WxH)"),
            }
        }

        if let Ok(raw) = env::var("GEGL_SWAP") {
            config.swap = if raw == "none" {
                SwapLocation::Disabled
            } else {
                SwapLocation::Path(PathBuf::from(raw))
            };
        }

        if let Ok(raw) = env::var("GEGL_SWAP_COMPRESSION") {
            config.swap_compression = SwapCompression::parse(&raw);
        }

        if let Ok(raw) = env::var("GEGL_THREADS") {
            match raw.parse::<usize>() {
                Ok(n) if n >= 1 => config.threads = n,
                _ => tracing::warn!(value = %raw, "ignoring malformed GEGL_THREADS"),
            }
        }

        config
    }

    /// Validate the settings, rejecting anything out of its documented
    /// range. Construction never validates implicitly so that partially
    /// built configs (e.g. in tests) can be adjusted field-by-field before
    /// a final check.
    pub fn validate(&self) -> Result<()> {
        if self.tile_width == 0 {
            return Err(TileError::invalid_config("tile-width", "must be >= 1"));
        }
        if self.tile_height == 0 {
            return Err(TileError::invalid_config("tile-height", "must be >= 1"));
        }
        if self.threads == 0 {
            return Err(TileError::invalid_config("threads", "must be >= 1"));
        }
        Ok(())
    }

    /// `queue_size` as a fraction of `tile_cache_size`. Call this
    /// after mutating `tile_cache_size` to keep the two in the documented
    /// relationship; [`crate::context::TileStore::set_cache_size`] does this
    /// automatically for a live store.
    pub fn recompute_queue_size(&mut self) {
        self.queue_size = self.tile_cache_size / 10;
    }

    /// Bytes-per-pixel-independent tile payload size at mipmap level `z`,
    /// given `bytes_per_pixel` at level 0.
    pub fn tile_size_at(&self, z: u32, bytes_per_pixel: u32) -> usize {
        let shift = z.min(30);
        let w = (self.tile_width >> shift).max(1);
        let h = (self.tile_height >> shift).max(1);
        (w as usize) * (h as usize) * (bytes_per_pixel as usize)
    }
}

fn parse_tile_size(raw: &str) -> Option<(u32, u32)> {
    let (w, h) = raw.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

fn default_swap_dir() -> SwapLocation {
    match dirs_cache_dir() {
        Some(dir) => SwapLocation::Path(dir),
        None => SwapLocation::Disabled,
    }
}

/// Minimal "user cache dir" resolution without pulling in a directories
/// crate: `$XDG_CACHE_HOME` then `$HOME/.cache`, falling back to a temp dir.
fn dirs_cache_dir() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CACHE_HOME") {
        return Some(PathBuf::from(xdg));
    }
    if let Ok(home) = env::var("HOME") {
        return Some(PathBuf::from(home).join(".cache"));
    }
    Some(env::temp_dir())
}

fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = TileStoreConfig::default();
        assert_eq!(config.tile_width, 128);
        assert_eq!(config.tile_height, 128);
        assert_eq!(config.tile_cache_size, 512 * 1024 * 1024);
        assert!(config.threads >= 1);
        config.validate().unwrap();
    }

    #[test]
    fn recompute_queue_size_is_ten_percent() {
        let mut config = TileStoreConfig::default();
        config.tile_cache_size = 1_000_000_000;
        config.recompute_queue_size();
        assert_eq!(config.queue_size, 100_000_000);
    }

    #[test]
    fn validate_rejects_zero_tile_width() {
        let mut config = TileStoreConfig::default();
        config.tile_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn tile_size_shrinks_with_mipmap_level() {
        let config = TileStoreConfig::default();
        let level0 = config.tile_size_at(0, 4);
        let level1 = config.tile_size_at(1, 4);
        assert_eq!(level0, 128 * 128 * 4);
        assert_eq!(level1, 64 * 64 * 4);
    }

    #[test]
    fn parse_tile_size_accepts_wxh() {
        assert_eq!(parse_tile_size("256x64"), Some((256, 64)));
        assert_eq!(parse_tile_size("bogus"), None);
    }
}
