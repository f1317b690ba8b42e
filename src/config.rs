//! Cache Configuration Module
//!
//! Configuration for the 2Q cache. The struct has public fields for simple
//! instantiation, plus a [`TwoQCacheConfig::new`] shortcut that fills in the
//! default partition ratios.
//!
//! # Partitioning
//!
//! A 2Q cache of capacity `C` splits its budget between three queues:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  resident budget C                                           │
//! │  ┌──────────────────────────┐ ┌───────────────────────────┐  │
//! │  │ probationary (A1-in)     │ │ protected (Am)            │  │
//! │  │ floor(C × recent_ratio)  │ │ C - |probationary|        │  │
//! │  └──────────────────────────┘ └───────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!   ghost (A1-out): floor(C × ghost_ratio) keys, no values
//! ```
//!
//! The defaults (`recent_ratio = 0.25`, `ghost_ratio = 0.50`) follow the
//! recommendations of the original 2Q paper. Ghost entries hold only a key,
//! so they do not count against `C`.
//!
//! # Examples
//!
//! ```
//! use twoq_cache::config::TwoQCacheConfig;
//! use twoq_cache::TwoQCache;
//!
//! let config = TwoQCacheConfig::new(1000).with_recent_ratio(0.10);
//! assert_eq!(config.probationary_capacity(), 100);
//! assert_eq!(config.ghost_capacity(), 500);
//!
//! let cache: TwoQCache<String, Vec<u8>> = TwoQCache::init(config, None).unwrap();
//! assert_eq!(cache.cap(), 1000);
//! ```

use crate::error::ConfigError;
use core::fmt;

/// Default share of the capacity given to the probationary queue.
pub const DEFAULT_RECENT_RATIO: f64 = 0.25;

/// Default size of the ghost queue, as a share of the capacity.
pub const DEFAULT_GHOST_RATIO: f64 = 0.50;

/// Configuration for a 2Q cache.
///
/// # Fields
///
/// - `capacity`: maximum number of resident (value-holding) entries. Must be
///   greater than zero.
/// - `recent_ratio`: share of `capacity` reserved for probationary entries,
///   in `[0.0, 1.0]`.
/// - `ghost_ratio`: number of evicted probationary keys remembered, as a
///   share of `capacity`, in `[0.0, 1.0]`. `0.0` disables the ghost queue.
#[derive(Clone, Copy, PartialEq)]
pub struct TwoQCacheConfig {
    /// Maximum number of resident entries.
    pub capacity: usize,
    /// Fraction of `capacity` used by the probationary queue.
    pub recent_ratio: f64,
    /// Fraction of `capacity` used to size the ghost queue.
    pub ghost_ratio: f64,
}

impl TwoQCacheConfig {
    /// Creates a configuration with the default partition ratios.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            recent_ratio: DEFAULT_RECENT_RATIO,
            ghost_ratio: DEFAULT_GHOST_RATIO,
        }
    }

    /// Sets the probationary share of the capacity.
    pub fn with_recent_ratio(mut self, recent_ratio: f64) -> Self {
        self.recent_ratio = recent_ratio;
        self
    }

    /// Sets the ghost queue size as a share of the capacity.
    pub fn with_ghost_ratio(mut self, ghost_ratio: f64) -> Self {
        self.ghost_ratio = ghost_ratio;
        self
    }

    /// Checks that the configuration describes a usable cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }
        if !is_ratio(self.recent_ratio) {
            return Err(ConfigError::InvalidRecentRatio(self.recent_ratio));
        }
        if !is_ratio(self.ghost_ratio) {
            return Err(ConfigError::InvalidGhostRatio(self.ghost_ratio));
        }
        Ok(())
    }

    /// Number of entries the probationary queue may hold before it becomes
    /// the preferred eviction source.
    pub fn probationary_capacity(&self) -> usize {
        scaled(self.capacity, self.recent_ratio)
    }

    /// Number of evicted keys the ghost queue remembers.
    pub fn ghost_capacity(&self) -> usize {
        scaled(self.capacity, self.ghost_ratio)
    }
}

impl Default for TwoQCacheConfig {
    fn default() -> Self {
        Self::new(128)
    }
}

impl fmt::Debug for TwoQCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwoQCacheConfig")
            .field("capacity", &self.capacity)
            .field("recent_ratio", &self.recent_ratio)
            .field("ghost_ratio", &self.ghost_ratio)
            .finish()
    }
}

#[inline]
fn is_ratio(r: f64) -> bool {
    r.is_finite() && (0.0..=1.0).contains(&r)
}

// Truncates toward zero so a ratio of 1.0 never exceeds the capacity.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn scaled(capacity: usize, ratio: f64) -> usize {
    ((capacity as f64) * ratio) as usize
}
