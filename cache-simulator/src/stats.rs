// Statistics collection and reporting for cache simulation

use crate::models::{
    AlgorithmStats, CacheAlgorithm, CacheMode, CsvResultRow, LatencyStats, SimulationKey,
    SimulationResult,
};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

/// Collects and reports statistics from simulation runs
#[derive(Debug, Default)]
pub struct SimulationStats {
    /// Stats for each algorithm+mode combination
    stats: HashMap<SimulationKey, AlgorithmStats>,
}

impl SimulationStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one algorithm+mode run
    pub fn record(
        &mut self,
        key: SimulationKey,
        hits: usize,
        misses: usize,
        final_len: usize,
        cache_metrics: Option<BTreeMap<String, f64>>,
        latency: LatencyStats,
    ) {
        self.stats.insert(
            key,
            AlgorithmStats {
                hits,
                misses,
                final_len,
                cache_metrics,
                latency,
            },
        );
    }

    pub fn result(
        &self,
        duration: Duration,
        total_requests: usize,
        unique_keys: usize,
    ) -> SimulationResult {
        SimulationResult {
            stats: self.stats.clone(),
            total_requests,
            unique_keys,
            duration,
        }
    }

    /// Create SimulationStats from a SimulationResult (for reporting after a run)
    pub fn from_result(result: &SimulationResult) -> Self {
        Self {
            stats: result.stats.clone(),
        }
    }

    fn sorted_keys(&self) -> Vec<&SimulationKey> {
        let mut keys: Vec<_> = self.stats.keys().collect();
        keys.sort();
        keys
    }

    /// Print a summary report of the simulation results
    pub fn print_summary(&self) {
        println!("\nResults by Algorithm and Mode:");
        println!(
            "{:<5} {:<10} {:>8} {:>8} {:>11} {:>11} {:>9} {:>12} {:>9} {:>9} {:>9}",
            "Algo",
            "Mode",
            "HitRate",
            "Resident",
            "Promotions",
            "Readmitted",
            "GhostHit",
            "Ops/sec",
            "GetAvg",
            "PutAvg",
            "p99"
        );
        println!("{}", "-".repeat(112));

        for key in self.sorted_keys() {
            if let Some(stats) = self.stats.get(key) {
                println!(
                    "{:<5} {:<10} {:>7.2}% {:>8} {:>11} {:>11} {:>9} {:>12.0} {:>7.0}ns {:>7.0}ns {:>7}ns",
                    key.algorithm.as_str(),
                    key.mode.as_str(),
                    stats.hit_rate(),
                    stats.final_len,
                    stats.cache_metric("promotions"),
                    stats.cache_metric("ghost_readmissions"),
                    stats.cache_metric("ghost_hits"),
                    stats.latency.ops_per_sec(),
                    stats.latency.get_stats.avg_ns(),
                    stats.latency.put_stats.avg_ns(),
                    stats.latency.get_stats.p99_ns(),
                );
            }
        }
    }

    /// Print the 2Q hit-rate delta against the LRU baseline
    pub fn print_comparison(&self) {
        let baseline = self
            .stats
            .get(&SimulationKey::new(CacheAlgorithm::Lru, CacheMode::Sequential));
        let twoq = self
            .stats
            .get(&SimulationKey::new(CacheAlgorithm::TwoQ, CacheMode::Sequential));

        if let (Some(lru), Some(twoq)) = (baseline, twoq) {
            let delta = twoq.hit_rate() - lru.hit_rate();
            println!(
                "\n2Q vs LRU (sequential): {:.2}% vs {:.2}% ({:+.2} points)",
                twoq.hit_rate(),
                lru.hit_rate(),
                delta
            );
        }
    }

    /// Export results to a CSV file, one row per algorithm+mode
    pub fn export_csv(
        &self,
        path: &Path,
        pattern: &str,
        capacity: usize,
    ) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;

        for key in self.sorted_keys() {
            if let Some(stats) = self.stats.get(key) {
                let row = CsvResultRow {
                    algorithm: key.algorithm.as_str().to_string(),
                    mode: key.mode.as_str().to_string(),
                    pattern: pattern.to_string(),
                    capacity,
                    hits: stats.hits,
                    misses: stats.misses,
                    hit_rate: stats.hit_rate(),
                    final_len: stats.final_len,
                    promotions: stats.cache_metric("promotions"),
                    ghost_readmissions: stats.cache_metric("ghost_readmissions"),
                    ghost_hits: stats.cache_metric("ghost_hits"),
                    total_ops: stats.latency.count,
                    ops_per_sec: stats.latency.ops_per_sec(),
                    get_avg_ns: stats.latency.get_stats.avg_ns(),
                    get_p50_ns: stats.latency.get_stats.p50_ns(),
                    get_p99_ns: stats.latency.get_stats.p99_ns(),
                    put_avg_ns: stats.latency.put_stats.avg_ns(),
                    put_p50_ns: stats.latency.put_stats.p50_ns(),
                    put_p99_ns: stats.latency.put_stats.p99_ns(),
                };
                writer.serialize(row)?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}
