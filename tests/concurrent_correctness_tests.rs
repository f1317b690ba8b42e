//! Concurrent Cache Correctness Tests
//!
//! These tests validate that `ConcurrentTwoQCache` keeps the 2Q semantics
//! while being accessed from multiple threads.
//!
//! ## Test Strategy
//!
//! Unlike stress tests that focus on throughput and lack of panics, these tests:
//! - Use small cache sizes for predictable behavior
//! - Establish state from one thread and observe it from others
//! - Verify that `keys()`, `len()` and `clear()` are consistent snapshots
//!
//! ## Segments
//!
//! 1. **Algorithm Correctness**: Promotion, ghost re-admission and scan resistance
//! 2. **Thread Safety Invariants**: Bound and bookkeeping under concurrency

#![cfg(feature = "concurrent")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use twoq_cache::metrics::CacheMetrics;
use twoq_cache::{ConcurrentTwoQCache, QueueKind, TwoQCacheConfig};

fn make_cache(capacity: usize) -> Arc<ConcurrentTwoQCache<u64, u64>> {
    Arc::new(ConcurrentTwoQCache::new(capacity).unwrap())
}

// ============================================================================
// SEGMENT 1: ALGORITHM CORRECTNESS UNDER CONCURRENCY
// ============================================================================

#[test]
fn test_concurrent_sequential_overfill() {
    let cache = make_cache(10);
    let writer = Arc::clone(&cache);
    thread::spawn(move || {
        for i in 0..20 {
            writer.put(i, i);
        }
    })
    .join()
    .unwrap();

    assert_eq!(cache.len(), 10);
    for i in 0..10 {
        assert!(!cache.contains(&i));
    }
    for i in 10..20 {
        assert_eq!(cache.peek(&i), Some(i));
    }
    assert_eq!(cache.ghost_len(), 5);
}

#[test]
fn test_concurrent_promotion_visible_to_other_threads() {
    let cache = make_cache(8);
    cache.put(1, 100);

    let reader = Arc::clone(&cache);
    let value = thread::spawn(move || reader.get(&1)).join().unwrap();
    assert_eq!(value, Some(100));
    assert_eq!(cache.queue_of(&1), Some(QueueKind::Protected));
}

#[test]
fn test_concurrent_ghost_read_then_write() {
    let cache = make_cache(4);
    for i in 0..5 {
        cache.put(i, i);
    }

    let reader = Arc::clone(&cache);
    let value = thread::spawn(move || reader.get(&0)).join().unwrap();
    assert_eq!(value, None);
    assert_eq!(cache.queue_of(&0), Some(QueueKind::Pending));
    assert_eq!(cache.pending_len(), 1);

    cache.put(0, 7);
    assert_eq!(cache.queue_of(&0), Some(QueueKind::Protected));
    assert_eq!(cache.pending_len(), 0);
    cache.check_invariants().unwrap();
}

#[test]
fn test_concurrent_ghost_readmission() {
    let cache = make_cache(4);
    for i in 0..5 {
        cache.put(i, i);
    }
    assert_eq!(cache.queue_of(&0), Some(QueueKind::Ghost));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || cache.put(0, 42))
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.queue_of(&0), Some(QueueKind::Protected));
    assert_eq!(cache.peek(&0), Some(42));
    assert!(cache.len() <= 4);
    cache.check_invariants().unwrap();
}

#[test]
fn test_concurrent_scan_keeps_hot_set() {
    let cache = make_cache(100);
    for i in 0..10 {
        cache.put(i, i);
        cache.get(&i);
    }

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2_000u64 {
                    cache.put(1_000_000 + t * 10_000 + i, i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for i in 0..10 {
        assert!(cache.contains(&i), "hot key {} evicted by scan", i);
    }
    cache.check_invariants().unwrap();
}

#[test]
fn test_concurrent_custom_config() {
    let config = TwoQCacheConfig::new(16)
        .with_recent_ratio(0.5)
        .with_ghost_ratio(0.0);
    let cache: ConcurrentTwoQCache<u32, u32> = ConcurrentTwoQCache::init(config, None).unwrap();
    assert_eq!(cache.capacity(), 16);
    for i in 0..64 {
        cache.put(i, i);
    }
    assert_eq!(cache.ghost_len(), 0);
    assert_eq!(cache.len(), 16);
}

// ============================================================================
// SEGMENT 2: THREAD SAFETY INVARIANTS
// ============================================================================

#[test]
fn test_concurrent_writes_maintain_capacity() {
    let cache = make_cache(50);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..1_000u64 {
                    cache.put(t * 1_000 + i, i);
                    assert!(cache.len() <= 50);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 50);
    cache.check_invariants().unwrap();
}

#[test]
fn test_concurrent_keys_snapshot_is_consistent() {
    let cache = make_cache(32);
    let stop = Arc::new(AtomicUsize::new(0));

    let writer = {
        let cache = Arc::clone(&cache);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut i = 0u64;
            while stop.load(Ordering::Relaxed) == 0 {
                cache.put(i % 100, i);
                let _ = cache.get(&((i * 7) % 100));
                i += 1;
            }
        })
    };

    for _ in 0..200 {
        let keys = cache.keys();
        assert!(keys.len() <= 32);
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), keys.len(), "duplicate key in snapshot");
    }

    stop.store(1, Ordering::Relaxed);
    writer.join().unwrap();
    cache.check_invariants().unwrap();
}

#[test]
fn test_concurrent_clear_while_writing() {
    let cache = make_cache(64);
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2_000u64 {
                    cache.put(t * 10_000 + i, i);
                    if i % 500 == 0 {
                        cache.clear();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 64);
    cache.check_invariants().unwrap();

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.ghost_len(), 0);
}

#[test]
fn test_concurrent_metrics_totals() {
    let cache = make_cache(1_000);
    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..100u64 {
                    cache.put(t * 1_000 + i, i);
                    let _ = cache.get(&(t * 1_000 + i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = cache.metrics();
    assert_eq!(metrics["requests"], 400.0);
    assert_eq!(metrics["cache_hits"], 400.0);
    assert_eq!(metrics["promotions"], 400.0);
    assert_eq!(metrics["protected_size"], 400.0);
}
