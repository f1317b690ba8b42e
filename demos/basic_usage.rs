//! Basic 2Q Usage
//!
//! Fills a capacity-10 cache with twenty sequential keys, then looks every
//! key up. The ten newest keys are served; the ten oldest miss. A short
//! second part shows a hot key surviving a scan and a ghost key coming back.
//!
//! Run with: cargo run --example basic_usage

use std::process::ExitCode;
use twoq_cache::metrics::CacheMetrics;
use twoq_cache::{QueueKind, TwoQCache};

fn main() -> ExitCode {
    let mut cache = match TwoQCache::new(10) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("failed to build cache: {err}");
            return ExitCode::FAILURE;
        }
    };

    for i in 0..20 {
        cache.put(i, i);
    }

    if cache.len() != 10 {
        eprintln!("bad len: {}", cache.len());
        return ExitCode::FAILURE;
    }

    for i in 0..20 {
        match cache.get(&i) {
            Some(v) => println!("{i:>2} -> hit  {v}"),
            None => println!("{i:>2} -> miss"),
        }
    }

    println!();
    println!("=== scan resistance ===");
    let scan: Vec<String> = (0..32).map(|i| format!("scan-{i}")).collect();
    let mut cache = match TwoQCache::new(8) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("failed to build cache: {err}");
            return ExitCode::FAILURE;
        }
    };

    cache.put("hot", 1);
    cache.get(&"hot");
    for key in &scan {
        cache.put(key.as_str(), 0);
    }
    println!("after 32-key scan, 'hot' is {:?}", cache.queue_of(&"hot"));

    let returning = scan[22].as_str();
    println!("'{returning}' is {:?}", cache.queue_of(&returning));
    if cache.queue_of(&returning) == Some(QueueKind::Ghost) {
        cache.put(returning, 1);
        println!("re-admitted '{returning}' into {:?}", cache.queue_of(&returning));
    }

    println!();
    for (name, value) in cache.metrics() {
        println!("{name:>24}: {value}");
    }

    ExitCode::SUCCESS
}
