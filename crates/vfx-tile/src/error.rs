//! Error types for fallible, non-steady-state operations.
//!
//! The tile-source command protocol itself (`GET`/`SET`/`VOID`/...) is
//! infallible at the type level: a miss returns `None`, a logic violation is
//! logged and the call degrades to a no-op. `TileError` covers the
//! operations that *do* have a meaningful failure: construction, explicit
//! configuration, and swap directory/file I/O.

use std::fmt;

/// Result alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, TileError>;

/// Errors produced by construction-time and configuration-time operations.
#[derive(Debug, thiserror::Error)]
pub enum TileError {
    /// Swap directory or swap file I/O failed.
    #[error("swap I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Both the slab allocator and its aligned-malloc fallback failed.
    ///
    /// This only happens on genuine out-of-memory conditions; the slab
    /// allocator already falls back to a direct allocation before giving up.
    #[error("allocation of {requested} bytes failed: {reason}")]
    Allocation {
        /// Bytes requested.
        requested: usize,
        /// Human-readable cause (e.g. the underlying allocator error).
        reason: String,
    },

    /// A settings value was out of its documented range.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// An operation that requires a swap file was attempted with swap
    /// disabled (`swap = null`). Distinguished from [`TileError::Io`] so
    /// callers can choose to treat it as "fall back to memory-only" rather
    /// than a hard error.
    #[error("swap is disabled")]
    SwapDisabled,
}

impl TileError {
    /// Shorthand for [`TileError::Allocation`].
    pub fn allocation(requested: usize, reason: impl fmt::Display) -> Self {
        TileError::Allocation {
            requested,
            reason: reason.to_string(),
        }
    }

    /// Shorthand for [`TileError::InvalidConfig`].
    pub fn invalid_config(field: &'static str, reason: impl fmt::Display) -> Self {
        TileError::InvalidConfig {
            field,
            reason: reason.to_string(),
        }
    }

    /// True if this is a resource-exhaustion error.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, TileError::Allocation { .. })
            || matches!(self, TileError::Io(e) if e.kind() == std::io::ErrorKind::OutOfMemory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_error_formats_reason() {
        let err = TileError::allocation(4096, "out of memory");
        assert_eq!(err.to_string(), "allocation of 4096 bytes failed: out of memory");
        assert!(err.is_resource_exhaustion());
    }

    #[test]
    fn invalid_config_is_not_resource_exhaustion() {
        let err = TileError::invalid_config("tile-width", "must be >= 1");
        assert!(!err.is_resource_exhaustion());
    }
}
