//! Error Types
//!
//! Two kinds of failure exist in this crate:
//!
//! - [`ConfigError`]: returned by the fallible constructors when the requested
//!   capacity or partition ratios cannot produce a working cache. Nothing is
//!   allocated when construction fails.
//! - [`InvariantError`]: returned by `check_invariants()` when the internal
//!   queue bookkeeping is inconsistent. This indicates a bug in the cache, not
//!   a caller mistake, and is only expected to surface in tests.
//!
//! Lookup misses are never errors; they are reported as `None`.
//!
//! ```
//! use twoq_cache::error::ConfigError;
//! use twoq_cache::TwoQCache;
//!
//! let err = TwoQCache::<u32, u32>::new(0).unwrap_err();
//! assert_eq!(err, ConfigError::InvalidCapacity);
//! ```

extern crate alloc;

use alloc::string::String;

/// Error returned when cache configuration parameters are invalid.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The total capacity was zero.
    #[error("invalid capacity: cache capacity must be greater than zero")]
    InvalidCapacity,

    /// The probationary ratio was outside `[0.0, 1.0]` or not finite.
    #[error("invalid recent ratio {0}: must be within [0.0, 1.0]")]
    InvalidRecentRatio(f64),

    /// The ghost ratio was outside `[0.0, 1.0]` or not finite.
    #[error("invalid ghost ratio {0}: must be within [0.0, 1.0]")]
    InvalidGhostRatio(f64),
}

/// Error returned when the internal queue invariants are violated.
///
/// Carries a description of the first invariant found broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("2Q invariant violated: {0}")]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}
