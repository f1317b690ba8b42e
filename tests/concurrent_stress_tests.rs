//! Stress Tests for the Concurrent 2Q Cache
//!
//! These tests verify thread safety and correctness under high contention.

#![cfg(feature = "concurrent")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use twoq_cache::ConcurrentTwoQCache;

const NUM_THREADS: usize = 16;
const OPS_PER_THREAD: usize = 10_000;

fn make_cache(capacity: usize) -> Arc<ConcurrentTwoQCache<usize, usize>> {
    Arc::new(ConcurrentTwoQCache::new(capacity).unwrap())
}

/// Many threads hammering a small key range
#[test]
fn stress_high_contention() {
    let cache = make_cache(100);

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = (t + i) % 300;
                cache.put(key, i);
                let _ = cache.get(&key);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 100);
    cache.check_invariants().unwrap();
}

/// Test edge case: empty cache operations
#[test]
fn stress_empty_cache() {
    let cache = make_cache(100);

    let mut handles = Vec::new();
    for _ in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                assert!(cache.get(&i).is_none());
                assert!(cache.remove(&i).is_none());
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.is_empty());
}

/// Test edge case: single item cache
#[test]
fn stress_single_item_cache() {
    let cache = make_cache(1);

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                cache.put(t, i);
                let _ = cache.get(&t);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), 1);
    cache.check_invariants().unwrap();
}

/// Concurrent removes never return a value twice
#[test]
fn stress_concurrent_removes() {
    let cache = make_cache(1000);
    for i in 0..1000 {
        cache.put(i, i);
    }

    let removed_count = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();
    for _ in 0..8 {
        let cache = Arc::clone(&cache);
        let removed_count = Arc::clone(&removed_count);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                if cache.remove(&i).is_some() {
                    removed_count.fetch_add(1, Ordering::SeqCst);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(removed_count.load(Ordering::SeqCst), 1000);
    assert!(cache.is_empty());
}

/// Mixed operations from a scoped thread pool
#[test]
fn stress_scoped_pool_mixed_operations() {
    let cache: ConcurrentTwoQCache<usize, usize> = ConcurrentTwoQCache::new(128).unwrap();
    let mut pool = scoped_threadpool::Pool::new(8);

    pool.scoped(|scope| {
        for t in 0..8usize {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (i * 13 + t) % 512;
                    match i % 7 {
                        0 => {
                            let _ = cache.remove(&key);
                        }
                        1 => {
                            let _ = cache.peek(&key);
                        }
                        2 => {
                            let _ = cache.get_with(&key, |v| *v + 1);
                        }
                        3 => {
                            let _ = cache.keys();
                        }
                        _ => {
                            cache.put(key, i);
                        }
                    }
                }
            });
        }
    });

    assert!(cache.len() <= 128);
    assert!(cache.ghost_len() <= 64);
    cache.check_invariants().unwrap();
}

/// get_with reads values in place
#[test]
fn stress_get_with() {
    let cache = make_cache(1000);
    for i in 0..1000 {
        cache.put(i, i);
    }

    let sum = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();
    for _ in 0..4 {
        let cache = Arc::clone(&cache);
        let sum = Arc::clone(&sum);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                if let Some(v) = cache.get_with(&i, |v| *v) {
                    sum.fetch_add(v, Ordering::Relaxed);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(sum.load(Ordering::Relaxed), 4 * (0..1000).sum::<usize>());
}
