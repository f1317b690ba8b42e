//! Synthetic workload generation
//!
//! Every pattern is driven by a seeded `StdRng`, so a given
//! `(pattern, keys, requests, seed)` always yields the same request stream and
//! every algorithm in a run sees identical traffic.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

/// Shape of the generated key stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkloadPattern {
    /// A small hot set hammered by reads, interleaved with long one-pass scans
    /// over cold keys. This is the case 2Q is built for.
    HotScan,
    /// Every key equally likely
    Uniform,
    /// Zipf-like popularity (exponent 1.0)
    Zipf,
    /// Keys requested in order, over and over
    Loop,
}

impl WorkloadPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkloadPattern::HotScan => "hot-scan",
            WorkloadPattern::Uniform => "uniform",
            WorkloadPattern::Zipf => "zipf",
            WorkloadPattern::Loop => "loop",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "hot-scan" | "hotscan" | "scan" => Some(WorkloadPattern::HotScan),
            "uniform" => Some(WorkloadPattern::Uniform),
            "zipf" => Some(WorkloadPattern::Zipf),
            "loop" => Some(WorkloadPattern::Loop),
            _ => None,
        }
    }
}

impl fmt::Display for WorkloadPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for generating a request stream
#[derive(Debug, Clone)]
pub struct WorkloadConfig {
    /// Number of requests to generate
    pub requests: usize,
    /// Size of the key space
    pub unique_keys: u64,
    pub pattern: WorkloadPattern,
    pub seed: u64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            requests: 100_000,
            unique_keys: 10_000,
            pattern: WorkloadPattern::HotScan,
            seed: 42,
        }
    }
}

/// Fraction of the key space that forms the hot set in `HotScan`
const HOT_FRACTION: f64 = 0.05;
/// Probability that a `HotScan` request belongs to the running scan
const SCAN_SHARE: f64 = 0.35;

/// Generator for synthetic request streams
#[derive(Debug)]
pub struct WorkloadGenerator {
    config: WorkloadConfig,
    rng: StdRng,
}

impl WorkloadGenerator {
    pub fn new(config: WorkloadConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    /// Produce the full request stream as a list of key ids
    pub fn generate(&mut self) -> Vec<u64> {
        let keys = self.config.unique_keys.max(1);
        let requests = self.config.requests;

        let stream = match self.config.pattern {
            WorkloadPattern::Uniform => (0..requests)
                .map(|_| self.rng.gen_range(0..keys))
                .collect(),
            WorkloadPattern::Loop => (0..requests as u64).map(|i| i % keys).collect(),
            WorkloadPattern::Zipf => self.zipf(keys, requests),
            WorkloadPattern::HotScan => self.hot_scan(keys, requests),
        };

        tracing::debug!(
            pattern = %self.config.pattern,
            requests,
            keys,
            "generated workload"
        );
        stream
    }

    fn hot_scan(&mut self, keys: u64, requests: usize) -> Vec<u64> {
        let hot = ((keys as f64 * HOT_FRACTION) as u64).max(1);
        let cold = keys.saturating_sub(hot).max(1);
        let mut cursor = 0u64;

        (0..requests)
            .map(|_| {
                if self.rng.gen_bool(SCAN_SHARE) {
                    let key = hot + cursor % cold;
                    cursor += 1;
                    key
                } else {
                    self.rng.gen_range(0..hot)
                }
            })
            .collect()
    }

    fn zipf(&mut self, keys: u64, requests: usize) -> Vec<u64> {
        // Cumulative weights for rank r ~ 1 / (r + 1)
        let mut cdf = Vec::with_capacity(keys as usize);
        let mut total = 0.0;
        for rank in 0..keys {
            total += 1.0 / (rank + 1) as f64;
            cdf.push(total);
        }

        (0..requests)
            .map(|_| {
                let target = self.rng.gen::<f64>() * total;
                let idx = cdf.partition_point(|&c| c < target);
                (idx as u64).min(keys - 1)
            })
            .collect()
    }
}
