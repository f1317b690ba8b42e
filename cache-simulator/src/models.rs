// Data models for cache simulation

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Cache algorithm types supported for simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheAlgorithm {
    /// `twoq_cache::TwoQCache` / `ConcurrentTwoQCache`
    TwoQ,
    /// `lru::LruCache` baseline (external crate for comparison)
    Lru,
}

impl CacheAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheAlgorithm::TwoQ => "2Q",
            CacheAlgorithm::Lru => "LRU",
        }
    }

    /// Parse a command-line name (`2q`, `lru`)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "2q" | "twoq" => Some(CacheAlgorithm::TwoQ),
            "lru" => Some(CacheAlgorithm::Lru),
            _ => None,
        }
    }

    /// Get all available algorithms
    pub fn all() -> Vec<CacheAlgorithm> {
        vec![CacheAlgorithm::TwoQ, CacheAlgorithm::Lru]
    }
}

impl fmt::Display for CacheAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cache execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheMode {
    /// Single-threaded cache (e.g., TwoQCache)
    Sequential,
    /// Thread-safe cache behind one lock (e.g., ConcurrentTwoQCache)
    Concurrent,
}

impl CacheMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheMode::Sequential => "Sequential",
            CacheMode::Concurrent => "Concurrent",
        }
    }

    pub fn parse(mode: &str) -> Option<Vec<CacheMode>> {
        match mode.to_lowercase().as_str() {
            "sequential" | "seq" => Some(vec![CacheMode::Sequential]),
            "concurrent" | "conc" => Some(vec![CacheMode::Concurrent]),
            "both" | "all" => Some(vec![CacheMode::Sequential, CacheMode::Concurrent]),
            _ => None,
        }
    }
}

impl fmt::Display for CacheMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unique identifier for a simulation run combining algorithm and mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimulationKey {
    pub algorithm: CacheAlgorithm,
    pub mode: CacheMode,
}

impl SimulationKey {
    pub fn new(algorithm: CacheAlgorithm, mode: CacheMode) -> Self {
        Self { algorithm, mode }
    }
}

impl fmt::Display for SimulationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.algorithm.as_str(), self.mode.as_str())
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Cache capacity in number of entries
    pub capacity: usize,
    /// Fraction of capacity given to the 2Q probationary queue
    pub recent_ratio: f64,
    /// Ghost list size as a fraction of capacity
    pub ghost_ratio: f64,
    /// Algorithms to simulate
    pub algorithms: Vec<CacheAlgorithm>,
    /// Modes to simulate
    pub modes: Vec<CacheMode>,
}

/// Results of a simulation run
#[derive(Debug)]
pub struct SimulationResult {
    /// Statistics for each algorithm+mode combination
    pub stats: HashMap<SimulationKey, AlgorithmStats>,
    /// Total number of requests processed
    pub total_requests: usize,
    /// Number of unique keys in the workload
    pub unique_keys: usize,
    /// Duration of the simulation
    pub duration: Duration,
}

/// Statistics for a single algorithm
#[derive(Debug, Default, Clone)]
pub struct AlgorithmStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Entries resident when the run finished
    pub final_len: usize,
    /// Extra counters reported by the cache itself (2Q only)
    pub cache_metrics: Option<std::collections::BTreeMap<String, f64>>,
    /// Latency statistics for cache operations
    pub latency: LatencyStats,
}

impl AlgorithmStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculate hit rate as percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Look up one of the cache-reported counters, 0 when absent
    pub fn cache_metric(&self, name: &str) -> f64 {
        self.cache_metrics
            .as_ref()
            .and_then(|m| m.get(name).copied())
            .unwrap_or(0.0)
    }
}

/// Latency statistics for a single operation type (get, put)
#[derive(Debug, Clone, Default)]
pub struct OpLatencyStats {
    /// Total time spent (nanoseconds)
    pub total_ns: u64,
    /// Number of operations
    pub count: u64,
    /// Minimum latency (nanoseconds)
    pub min_ns: u64,
    /// Maximum latency (nanoseconds)
    pub max_ns: u64,
    /// Latency percentiles
    pub percentiles: Option<LatencyPercentiles>,
}

impl OpLatencyStats {
    /// Calculate average latency in nanoseconds
    pub fn avg_ns(&self) -> f64 {
        if self.count > 0 {
            self.total_ns as f64 / self.count as f64
        } else {
            0.0
        }
    }

    /// Calculate throughput in operations per second
    pub fn ops_per_sec(&self) -> f64 {
        if self.total_ns > 0 {
            (self.count as f64 * 1_000_000_000.0) / self.total_ns as f64
        } else {
            0.0
        }
    }

    pub fn p50_ns(&self) -> u64 {
        self.percentiles.as_ref().map_or(0, |p| p.p50_ns)
    }

    pub fn p99_ns(&self) -> u64 {
        self.percentiles.as_ref().map_or(0, |p| p.p99_ns)
    }
}

/// Latency statistics for all cache operations
#[derive(Debug, Clone, Default)]
pub struct LatencyStats {
    /// Total time spent in all cache operations (nanoseconds)
    pub total_ns: u64,
    /// Total number of operations
    pub count: u64,
    pub get_stats: OpLatencyStats,
    pub put_stats: OpLatencyStats,
}

/// Latency percentiles
#[derive(Debug, Clone, Default)]
pub struct LatencyPercentiles {
    pub p50_ns: u64,
    pub p90_ns: u64,
    pub p99_ns: u64,
}

impl LatencyStats {
    /// Calculate throughput in operations per second (all operations)
    pub fn ops_per_sec(&self) -> f64 {
        if self.total_ns > 0 {
            (self.count as f64 * 1_000_000_000.0) / self.total_ns as f64
        } else {
            0.0
        }
    }
}

/// CSV export row for simulation results
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub algorithm: String,
    pub mode: String,
    pub pattern: String,
    pub capacity: usize,
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub final_len: usize,
    pub promotions: f64,
    pub ghost_readmissions: f64,
    pub ghost_hits: f64,
    pub total_ops: u64,
    pub ops_per_sec: f64,
    pub get_avg_ns: f64,
    pub get_p50_ns: u64,
    pub get_p99_ns: u64,
    pub put_avg_ns: f64,
    pub put_p50_ns: u64,
    pub put_p99_ns: u64,
}
