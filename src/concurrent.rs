//! Concurrent Cache Implementation
//!
//! This module provides a thread-safe 2Q cache for shared, multi-threaded
//! access.
//!
//! # Architecture
//!
//! [`ConcurrentTwoQCache`] wraps a single `TwoQSegment` in one
//! `parking_lot::Mutex`. Every public operation holds the lock for its whole
//! duration, so each call is linearizable and the three-queue invariants
//! (capacity bound, one queue per key, ghost bound) are observed atomically.
//!
//! ## Why Mutex Instead of RwLock?
//!
//! 2Q requires **mutable access even for read operations**. A `get()` may
//! promote a probationary entry or move a protected entry to the MRU end.
//! Since `get()` is inherently a write, an `RwLock` would still need the
//! exclusive side for every lookup. `Mutex` is preferred because:
//!
//! 1. **Lower overhead**: `Mutex` has less bookkeeping than `RwLock`
//! 2. **No false promises**: Makes it clear that all operations are mutually exclusive
//! 3. **Better performance**: `parking_lot::Mutex` is highly optimized for this use case
//!
//! ## Why a Single Lock?
//!
//! Hash sharding would split the probationary, protected and ghost queues
//! per shard. A key evicted in one shard could then never be recognised as
//! a returning ghost by another, and `keys()`, `len()` and `clear()` would
//! stop being atomic snapshots.
//!
//! # Example
//!
//! ```rust
//! use twoq_cache::concurrent::ConcurrentTwoQCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentTwoQCache::new(1000).unwrap());
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..100 {
//!             let key = format!("key_{}_{}", t, i);
//!             cache.put(key.clone(), i);
//!             let _ = cache.get(&key);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```
//!
//! # Zero-Copy Access
//!
//! `get()` clones the value so the lock is released before the caller uses
//! it. Use `get_with()` or `peek_with()` to read the value in place while
//! the lock is held:
//!
//! ```rust,ignore
//! let len = cache.get_with(&key, |value| value.len());
//! ```

mod twoq;

pub use self::twoq::ConcurrentTwoQCache;
