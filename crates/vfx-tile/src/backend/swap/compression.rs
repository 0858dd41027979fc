//! Pluggable swap tile-payload compression.
//!
//! The codec is a runtime configuration choice, not a Cargo build-time feature, so it is a trait object rather
//! than a `#[cfg(feature = ...)]` family — matching how `vfx-io`'s EXR
//! codecs are selected per-file rather than per-build.

use crate::config::SwapCompression;

/// Maximal useful compression ratio: if compressing a block doesn't
/// shrink it by at least 5%, the uncompressed form is kept to avoid paying
/// decompression overhead for no benefit.
pub const COMPRESSION_MAX_RATIO: f64 = 0.95;

/// A swap tile-payload codec.
pub trait Compressor: Send + Sync {
    /// Stable name stored alongside the block so `get` can find the same
    /// codec again without re-resolving configuration.
    fn name(&self) -> &'static str;

    /// Compress `data`, or `None` if compression is not worth attempting
    /// (the caller still checks the resulting ratio against
    /// [`COMPRESSION_MAX_RATIO`]).
    fn compress(&self, data: &[u8]) -> Option<Vec<u8>>;

    /// Reverse [`Compressor::compress`]. `expected_len` is the original
    /// uncompressed length, known from the tile's `size` at index time.
    fn decompress(&self, data: &[u8], expected_len: usize) -> std::io::Result<Vec<u8>>;
}

/// DEFLATE via `miniz_oxide` at a low compression level, prioritising
/// writer-thread throughput over ratio.
pub struct FastCompressor;

impl Compressor for FastCompressor {
    fn name(&self) -> &'static str {
        "fast"
    }

    fn compress(&self, data: &[u8]) -> Option<Vec<u8>> {
        Some(miniz_oxide::deflate::compress_to_vec(data, 1))
    }

    fn decompress(&self, data: &[u8], expected_len: usize) -> std::io::Result<Vec<u8>> {
        miniz_oxide::inflate::decompress_to_vec_with_limit(data, expected_len)
            .map_err(|e| std::io::Error::other(format!("swap decompression failed: {e:?}")))
    }
}

/// Resolve the configured codec to a trait object, or `None` for
/// `SwapCompression::None`.
pub fn codec_for(compression: &SwapCompression) -> Option<std::sync::Arc<dyn Compressor>> {
    match compression {
        SwapCompression::None => None,
        SwapCompression::Fast => Some(std::sync::Arc::new(FastCompressor)),
        SwapCompression::Named(name) => by_name(name).map(|c| c as std::sync::Arc<dyn Compressor>).or_else(|| {
            tracing::warn!(%name, "unknown swap-compression codec; falling back to fast");
            Some(std::sync::Arc::new(FastCompressor))
        }),
    }
}

/// Look up a previously-used codec by its stored [`Compressor::name`], for
/// decompression of a block written under a now-possibly-different config.
pub fn by_name(name: &str) -> Option<std::sync::Arc<dyn Compressor>> {
    match name {
        "fast" => Some(std::sync::Arc::new(FastCompressor)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_repetitive_data() {
        let codec = FastCompressor;
        let data = vec![42u8; 4096];
        let compressed = codec.compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        let restored = codec.decompress(&compressed, data.len()).unwrap();
        assert_eq!(restored, data);
    }
}
