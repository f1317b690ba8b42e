//! Simulation runner for cache algorithms
//!
//! Replays one request stream through every selected algorithm and mode.
//! Each request is a read-through: `get`, and on a miss `put` the key with a
//! value derived from it. Only time spent inside cache calls is recorded as
//! latency.
//!
//! Concurrent runs split the stream into contiguous chunks, one per worker
//! thread, all sharing a single `ConcurrentTwoQCache`.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Instant;

use lru::LruCache;
use tracing::{debug, info, warn};
use twoq_cache::metrics::CacheMetrics;
use twoq_cache::{ConcurrentTwoQCache, ConfigError, TwoQCache, TwoQCacheConfig};

use crate::models::{
    CacheAlgorithm, CacheMode, LatencyPercentiles, LatencyStats, OpLatencyStats,
    SimulationConfig, SimulationKey, SimulationResult,
};
use crate::stats::SimulationStats;

/// Samples kept per operation type for percentile estimates
const MAX_SAMPLES: usize = 5000;

/// Wrapper enum for the sequential cache implementations
enum SequentialCache {
    TwoQ(TwoQCache<u64, u64>),
    Lru(LruCache<u64, u64>),
}

impl SequentialCache {
    fn get(&mut self, key: u64) -> bool {
        match self {
            SequentialCache::TwoQ(c) => c.get(&key).is_some(),
            SequentialCache::Lru(c) => c.get(&key).is_some(),
        }
    }

    fn put(&mut self, key: u64, value: u64) {
        match self {
            SequentialCache::TwoQ(c) => {
                c.put(key, value);
            }
            SequentialCache::Lru(c) => {
                c.put(key, value);
            }
        }
    }

    fn len(&self) -> usize {
        match self {
            SequentialCache::TwoQ(c) => c.len(),
            SequentialCache::Lru(c) => c.len(),
        }
    }

    fn metrics(&self) -> Option<std::collections::BTreeMap<String, f64>> {
        match self {
            SequentialCache::TwoQ(c) => Some(c.metrics()),
            SequentialCache::Lru(_) => None,
        }
    }
}

/// Tracks latency for a single operation type
#[derive(Debug)]
struct OpLatencyTracker {
    total_ns: u64,
    count: u64,
    min_ns: u64,
    max_ns: u64,
    /// Every n-th sample, for percentile calculation
    samples: Vec<u64>,
    stride: u64,
}

impl OpLatencyTracker {
    fn new(expected_ops: usize) -> Self {
        let stride = (expected_ops / MAX_SAMPLES).max(1) as u64;
        Self {
            total_ns: 0,
            count: 0,
            min_ns: u64::MAX,
            max_ns: 0,
            samples: Vec::with_capacity(MAX_SAMPLES.min(expected_ops)),
            stride,
        }
    }

    #[inline]
    fn record(&mut self, latency_ns: u64) {
        self.total_ns += latency_ns;
        self.count += 1;
        self.min_ns = self.min_ns.min(latency_ns);
        self.max_ns = self.max_ns.max(latency_ns);
        if self.count % self.stride == 0 {
            self.samples.push(latency_ns);
        }
    }

    fn merge(&mut self, other: OpLatencyTracker) {
        self.total_ns += other.total_ns;
        self.count += other.count;
        self.min_ns = self.min_ns.min(other.min_ns);
        self.max_ns = self.max_ns.max(other.max_ns);
        self.samples.extend(other.samples);
    }

    fn finalize(mut self) -> OpLatencyStats {
        let percentiles = if self.samples.is_empty() {
            None
        } else {
            self.samples.sort_unstable();
            let len = self.samples.len();
            Some(LatencyPercentiles {
                p50_ns: self.samples[len * 50 / 100],
                p90_ns: self.samples[len * 90 / 100],
                p99_ns: self.samples[len * 99 / 100],
            })
        };

        OpLatencyStats {
            total_ns: self.total_ns,
            count: self.count,
            min_ns: if self.min_ns == u64::MAX { 0 } else { self.min_ns },
            max_ns: self.max_ns,
            percentiles,
        }
    }
}

/// Get/put latency for one run
#[derive(Debug)]
struct LatencyTracker {
    get_tracker: OpLatencyTracker,
    put_tracker: OpLatencyTracker,
}

impl LatencyTracker {
    fn new(expected_ops: usize) -> Self {
        Self {
            get_tracker: OpLatencyTracker::new(expected_ops),
            put_tracker: OpLatencyTracker::new(expected_ops),
        }
    }

    fn merge(&mut self, other: LatencyTracker) {
        self.get_tracker.merge(other.get_tracker);
        self.put_tracker.merge(other.put_tracker);
    }

    fn finalize(self) -> LatencyStats {
        let get_stats = self.get_tracker.finalize();
        let put_stats = self.put_tracker.finalize();
        LatencyStats {
            total_ns: get_stats.total_ns + put_stats.total_ns,
            count: get_stats.count + put_stats.count,
            get_stats,
            put_stats,
        }
    }
}

/// Outcome of replaying one stream through one cache
#[derive(Debug)]
struct RunOutcome {
    hits: usize,
    misses: usize,
    final_len: usize,
    metrics: Option<std::collections::BTreeMap<String, f64>>,
    latency: LatencyStats,
}

/// Runs every configured algorithm/mode pair over the same request stream
#[derive(Debug)]
pub struct SimulationRunner {
    config: SimulationConfig,
    threads: usize,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig, threads: usize) -> Self {
        Self {
            config,
            threads: threads.max(1),
        }
    }

    fn twoq_config(&self) -> TwoQCacheConfig {
        TwoQCacheConfig::new(self.config.capacity)
            .with_recent_ratio(self.config.recent_ratio)
            .with_ghost_ratio(self.config.ghost_ratio)
    }

    pub fn run(&self, requests: &[u64]) -> Result<SimulationResult, ConfigError> {
        let start = Instant::now();
        let mut stats = SimulationStats::new();

        for &algorithm in &self.config.algorithms {
            for &mode in &self.config.modes {
                let key = SimulationKey::new(algorithm, mode);
                let outcome = match (algorithm, mode) {
                    (CacheAlgorithm::Lru, CacheMode::Concurrent) => {
                        warn!("{key}: lru::LruCache is not thread-safe, skipping");
                        continue;
                    }
                    (_, CacheMode::Sequential) => {
                        let cache = self.sequential_cache(algorithm)?;
                        Self::replay_sequential(cache, requests)
                    }
                    (CacheAlgorithm::TwoQ, CacheMode::Concurrent) => {
                        let cache = ConcurrentTwoQCache::init(self.twoq_config(), None)?;
                        self.replay_concurrent(&cache, requests)
                    }
                };

                info!(
                    run = %key,
                    hits = outcome.hits,
                    misses = outcome.misses,
                    "run finished"
                );
                stats.record(
                    key,
                    outcome.hits,
                    outcome.misses,
                    outcome.final_len,
                    outcome.metrics,
                    outcome.latency,
                );
            }
        }

        let unique_keys = requests.iter().collect::<HashSet<_>>().len();

        Ok(stats.result(start.elapsed(), requests.len(), unique_keys))
    }

    fn sequential_cache(&self, algorithm: CacheAlgorithm) -> Result<SequentialCache, ConfigError> {
        Ok(match algorithm {
            CacheAlgorithm::TwoQ => SequentialCache::TwoQ(TwoQCache::init(self.twoq_config(), None)?),
            CacheAlgorithm::Lru => {
                let cap = NonZeroUsize::new(self.config.capacity).ok_or(ConfigError::InvalidCapacity)?;
                SequentialCache::Lru(LruCache::new(cap))
            }
        })
    }

    fn replay_sequential(mut cache: SequentialCache, requests: &[u64]) -> RunOutcome {
        let mut latency = LatencyTracker::new(requests.len());
        let mut hits = 0;
        let mut misses = 0;

        for &key in requests {
            let t = Instant::now();
            let hit = cache.get(key);
            latency.get_tracker.record(t.elapsed().as_nanos() as u64);

            if hit {
                hits += 1;
            } else {
                misses += 1;
                let t = Instant::now();
                cache.put(key, key);
                latency.put_tracker.record(t.elapsed().as_nanos() as u64);
            }
        }

        RunOutcome {
            hits,
            misses,
            final_len: cache.len(),
            metrics: cache.metrics(),
            latency: latency.finalize(),
        }
    }

    fn replay_concurrent(
        &self,
        cache: &ConcurrentTwoQCache<u64, u64>,
        requests: &[u64],
    ) -> RunOutcome {
        let hits = AtomicUsize::new(0);
        let misses = AtomicUsize::new(0);
        let chunk = requests.len().div_ceil(self.threads).max(1);
        debug!(threads = self.threads, chunk, "replaying concurrently");

        let mut latency = LatencyTracker::new(requests.len());
        thread::scope(|s| {
            let handles: Vec<_> = requests
                .chunks(chunk)
                .map(|part| {
                    let hits = &hits;
                    let misses = &misses;
                    s.spawn(move || {
                        let mut local = LatencyTracker::new(part.len());
                        for &key in part {
                            let t = Instant::now();
                            let hit = cache.get_with(&key, |_| ()).is_some();
                            local.get_tracker.record(t.elapsed().as_nanos() as u64);

                            if hit {
                                hits.fetch_add(1, Ordering::Relaxed);
                            } else {
                                misses.fetch_add(1, Ordering::Relaxed);
                                let t = Instant::now();
                                cache.put(key, key);
                                local.put_tracker.record(t.elapsed().as_nanos() as u64);
                            }
                        }
                        local
                    })
                })
                .collect();

            for handle in handles {
                match handle.join() {
                    Ok(local) => latency.merge(local),
                    Err(_) => warn!("replay worker panicked"),
                }
            }
        });

        RunOutcome {
            hits: hits.into_inner(),
            misses: misses.into_inner(),
            final_len: cache.len(),
            metrics: Some(cache.metrics()),
            latency: latency.finalize(),
        }
    }
}
