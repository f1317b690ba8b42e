//! Cache Metrics System
//!
//! Provides BTreeMap-based metrics reporting for the 2Q cache. Counters are
//! kept in plain structs updated under `&mut self` (or under the concurrent
//! cache's lock) and exported through the [`CacheMetrics`] trait.
//!
//! # Why BTreeMap over HashMap?
//!
//! - **Deterministic ordering**: Metrics always appear in consistent order
//! - **Reproducible output**: Essential for testing and simulation comparisons
//! - **Stable serialization**: CSV exports have predictable key ordering
//!
//! The performance difference is negligible with ~25 metric keys.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod twoq;

pub use twoq::TwoQCacheMetrics;

/// Counters common to any bounded cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups (`get` / `get_mut`) made to the cache
    pub requests: u64,

    /// Number of lookups that found a resident value
    pub cache_hits: u64,

    /// Number of new keys written into the cache
    pub insertions: u64,

    /// Number of writes that replaced the value of a resident key
    pub updates: u64,

    /// Number of resident entries dropped due to capacity pressure
    pub evictions: u64,

    /// Number of entries dropped by explicit `remove`
    pub removals: u64,

    /// Capacity limit, in entries
    pub capacity: u64,
}

impl CoreCacheMetrics {
    /// Creates a new CoreCacheMetrics instance for a cache of `capacity` entries
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Records a lookup that found a resident value
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that found no resident value
    ///
    /// Misses are derived as `requests - cache_hits`.
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records the admission of a key that was not resident
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an in-place value replacement
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records a capacity eviction of a resident entry
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records an explicit removal of a resident entry
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Number of lookups that missed
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Calculates the cache hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the cache miss rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("removals".to_string(), self.removals as f64);
        metrics.insert("capacity".to_string(), self.capacity as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform interface for retrieving metrics from a cache
///
/// Implemented by the cache types and by the metrics structs themselves, so a
/// simulation harness can collect and compare results without knowing the
/// concrete type.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "2Q")
    fn algorithm_name(&self) -> &'static str;
}
