//! Concurrent Cache Usage Examples
//!
//! This example demonstrates multi-threaded usage of `ConcurrentTwoQCache`.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent

use std::sync::Arc;
use std::thread;
use std::time::Instant;
use twoq_cache::metrics::CacheMetrics;
use twoq_cache::{ConcurrentTwoQCache, ConfigError, TwoQCacheConfig};

fn main() -> Result<(), ConfigError> {
    println!("=== Concurrent 2Q Cache Examples ===\n");

    shared_cache_example()?;
    scan_while_serving_example()?;
    zero_copy_example()?;

    Ok(())
}

/// Several workers sharing one cache through an `Arc`.
fn shared_cache_example() -> Result<(), ConfigError> {
    println!("--- Shared cache ---");
    let cache: Arc<ConcurrentTwoQCache<String, u64>> = Arc::new(ConcurrentTwoQCache::new(1000)?);
    let start = Instant::now();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..10_000u64 {
                    let key = format!("key-{}", (t * 37 + i) % 2_000);
                    if cache.get(&key).is_none() {
                        cache.put(key, i);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            eprintln!("worker panicked");
        }
    }

    let metrics = cache.metrics();
    println!(
        "80k ops in {:?}: len={} hit_rate={:.3} promotions={}",
        start.elapsed(),
        cache.len(),
        metrics["hit_rate"],
        metrics["promotions"]
    );
    println!();
    Ok(())
}

/// A hot working set stays resident while another thread streams a scan.
fn scan_while_serving_example() -> Result<(), ConfigError> {
    println!("--- Scan while serving ---");
    let config = TwoQCacheConfig::new(200).with_recent_ratio(0.25);
    let cache: Arc<ConcurrentTwoQCache<u64, u64>> =
        Arc::new(ConcurrentTwoQCache::init(config, None)?);

    for i in 0..50 {
        cache.put(i, i);
        cache.get(&i);
    }

    let scanner = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 1_000..100_000 {
                cache.put(i, i);
            }
        })
    };
    let server = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            let mut hits = 0;
            for round in 0..10_000u64 {
                if cache.get(&(round % 50)).is_some() {
                    hits += 1;
                }
            }
            hits
        })
    };

    let _ = scanner.join();
    let hits = server.join().unwrap_or(0);
    println!("hot-set hits during scan: {hits}/10000");
    println!("ghost queue holds {} keys", cache.ghost_len());
    println!();
    Ok(())
}

/// `get_with` reads values in place without cloning them out.
fn zero_copy_example() -> Result<(), ConfigError> {
    println!("--- Zero-copy reads ---");
    let cache: ConcurrentTwoQCache<&str, Vec<u8>> = ConcurrentTwoQCache::new(16)?;
    cache.put("blob", vec![7u8; 4096]);

    let len = cache.get_with(&"blob", |v| v.len());
    let first = cache.peek_with(&"blob", |v| v[0]);
    println!("blob len={len:?} first={first:?} keys={:?}", cache.keys());
    Ok(())
}
