//! 2Q Cache Metrics
//!
//! Metrics specific to the 2Q replacement policy: queue occupancy, where
//! hits land, how often keys earn promotion, and how useful the ghost queue
//! is at spotting returning keys.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// 2Q-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoQCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,

    /// Number of entries currently in the probationary queue
    pub probationary_size: u64,

    /// Number of entries currently in the protected queue
    pub protected_size: u64,

    /// Number of keys currently in the ghost queue
    pub ghost_size: u64,

    /// Ghost keys looked up since eviction, waiting for a write
    pub pending_size: u64,

    /// Soft limit of the probationary queue
    pub probationary_capacity: u64,

    /// Hard limit of the ghost queue
    pub ghost_capacity: u64,

    /// Promotions from probationary to protected (second touch while resident)
    pub promotions: u64,

    /// Ghost keys written again and admitted straight into protected
    pub ghost_readmissions: u64,

    /// Lookups that missed but found the key in the ghost queue
    pub ghost_hits: u64,

    /// Lookups served from the probationary queue
    pub probationary_hits: u64,

    /// Lookups served from the protected queue
    pub protected_hits: u64,

    /// Probationary entries moved to the ghost queue (value dropped)
    pub probationary_evictions: u64,

    /// Protected entries dropped outright
    pub protected_evictions: u64,

    /// Ghost keys forgotten because the ghost queue overflowed
    pub ghost_evictions: u64,
}

impl TwoQCacheMetrics {
    /// Creates a new TwoQCacheMetrics instance
    ///
    /// # Arguments
    /// * `capacity` - Resident entry limit of the cache
    /// * `probationary_capacity` - Soft limit of the probationary queue
    /// * `ghost_capacity` - Limit of the ghost queue
    pub fn new(capacity: u64, probationary_capacity: u64, ghost_capacity: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(capacity),
            probationary_size: 0,
            protected_size: 0,
            ghost_size: 0,
            pending_size: 0,
            probationary_capacity,
            ghost_capacity,
            promotions: 0,
            ghost_readmissions: 0,
            ghost_hits: 0,
            probationary_hits: 0,
            protected_hits: 0,
            probationary_evictions: 0,
            protected_evictions: 0,
            ghost_evictions: 0,
        }
    }

    /// Records a promotion from probationary to protected
    pub fn record_promotion(&mut self) {
        self.promotions += 1;
    }

    /// Records a ghost key re-admitted into protected
    pub fn record_ghost_readmission(&mut self) {
        self.ghost_readmissions += 1;
        self.core.record_insertion();
    }

    /// Records a lookup that missed on a ghost key
    pub fn record_ghost_hit(&mut self) {
        self.ghost_hits += 1;
        self.core.record_miss();
    }

    /// Records a lookup hit in the probationary queue
    pub fn record_probationary_hit(&mut self) {
        self.core.record_hit();
        self.probationary_hits += 1;
    }

    /// Records a lookup hit in the protected queue
    pub fn record_protected_hit(&mut self) {
        self.core.record_hit();
        self.protected_hits += 1;
    }

    /// Records a probationary entry pushed out into the ghost queue
    pub fn record_probationary_eviction(&mut self) {
        self.core.record_eviction();
        self.probationary_evictions += 1;
    }

    /// Records a protected entry dropped for capacity
    pub fn record_protected_eviction(&mut self) {
        self.core.record_eviction();
        self.protected_evictions += 1;
    }

    /// Records a ghost key forgotten on ghost overflow
    pub fn record_ghost_eviction(&mut self) {
        self.ghost_evictions += 1;
    }

    /// Updates the queue occupancy gauges
    pub fn update_queue_sizes(
        &mut self,
        probationary: u64,
        protected: u64,
        ghost: u64,
        pending: u64,
    ) {
        self.probationary_size = probationary;
        self.protected_size = protected;
        self.ghost_size = ghost;
        self.pending_size = pending;
    }

    /// Share of hits served by the protected queue
    ///
    /// # Returns
    /// protected hits / total hits, or 0.0 if no hits
    pub fn protection_ratio(&self) -> f64 {
        if self.core.cache_hits > 0 {
            self.protected_hits as f64 / self.core.cache_hits as f64
        } else {
            0.0
        }
    }

    /// Share of ghost hits that turned into a re-admission
    ///
    /// # Returns
    /// readmissions / ghost hits, or 0.0 if the ghost queue was never hit
    pub fn ghost_effectiveness(&self) -> f64 {
        if self.ghost_hits > 0 {
            self.ghost_readmissions as f64 / self.ghost_hits as f64
        } else {
            0.0
        }
    }

    /// Converts 2Q metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        // Queue occupancy
        metrics.insert(
            "probationary_size".to_string(),
            self.probationary_size as f64,
        );
        metrics.insert("protected_size".to_string(), self.protected_size as f64);
        metrics.insert("ghost_size".to_string(), self.ghost_size as f64);
        metrics.insert("pending_size".to_string(), self.pending_size as f64);
        metrics.insert(
            "probationary_capacity".to_string(),
            self.probationary_capacity as f64,
        );
        metrics.insert("ghost_capacity".to_string(), self.ghost_capacity as f64);

        // Movement
        metrics.insert("promotions".to_string(), self.promotions as f64);
        metrics.insert(
            "ghost_readmissions".to_string(),
            self.ghost_readmissions as f64,
        );

        // Hits
        metrics.insert(
            "probationary_hits".to_string(),
            self.probationary_hits as f64,
        );
        metrics.insert("protected_hits".to_string(), self.protected_hits as f64);
        metrics.insert("ghost_hits".to_string(), self.ghost_hits as f64);
        metrics.insert("protection_ratio".to_string(), self.protection_ratio());
        metrics.insert(
            "ghost_effectiveness".to_string(),
            self.ghost_effectiveness(),
        );

        // Evictions per queue
        metrics.insert(
            "probationary_evictions".to_string(),
            self.probationary_evictions as f64,
        );
        metrics.insert(
            "protected_evictions".to_string(),
            self.protected_evictions as f64,
        );
        metrics.insert("ghost_evictions".to_string(), self.ghost_evictions as f64);

        metrics
    }
}

impl CacheMetrics for TwoQCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "2Q"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twoq_metrics_counters() {
        let mut m = TwoQCacheMetrics::new(10, 2, 5);
        m.record_probationary_hit();
        m.record_protected_hit();
        m.record_protected_hit();
        m.record_ghost_hit();
        m.record_ghost_readmission();
        m.record_promotion();
        m.record_probationary_eviction();
        m.record_protected_eviction();
        m.record_ghost_eviction();

        assert_eq!(m.core.requests, 4);
        assert_eq!(m.core.cache_hits, 3);
        assert_eq!(m.core.evictions, 2);
        assert_eq!(m.core.insertions, 1);
        assert!((m.protection_ratio() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(m.ghost_effectiveness(), 1.0);
    }

    #[test]
    fn test_twoq_metrics_map() {
        let mut m = TwoQCacheMetrics::new(10, 2, 5);
        m.update_queue_sizes(2, 7, 4, 1);
        let map = m.metrics();
        assert_eq!(map["probationary_size"], 2.0);
        assert_eq!(map["protected_size"], 7.0);
        assert_eq!(map["ghost_size"], 4.0);
        assert_eq!(map["pending_size"], 1.0);
        assert_eq!(map["ghost_capacity"], 5.0);
        assert_eq!(m.algorithm_name(), "2Q");
    }
}
