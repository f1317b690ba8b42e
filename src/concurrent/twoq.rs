//! Concurrent 2Q Cache Implementation
//!
//! The multi-threaded counterpart to [`TwoQCache`](crate::TwoQCache): one
//! `TwoQSegment` behind one `parking_lot::Mutex`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   ConcurrentTwoQCache                        │
//! │                                                              │
//! │   thread A ─┐                                                │
//! │   thread B ─┼──▶ ┌─────────┐   ┌──────────────────────────┐  │
//! │   thread C ─┘    │  Mutex  │──▶│ TwoQSegment              │  │
//! │                  └─────────┘   │ probationary│protected│  │  │
//! │                                │ ghost                    │  │
//! │                                └──────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Thread Safety
//!
//! `ConcurrentTwoQCache` is `Send + Sync` whenever its keys, values and
//! hasher are `Send`, and can be shared via `Arc`. Guards are released on
//! every exit path, including panics inside `get_with` closures.
//!
//! # Example
//!
//! ```rust
//! use twoq_cache::concurrent::ConcurrentTwoQCache;
//! use twoq_cache::TwoQCacheConfig;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let config = TwoQCacheConfig::new(100);
//! let cache = Arc::new(ConcurrentTwoQCache::init(config, None).unwrap());
//!
//! // Establish hot items: the second access promotes them.
//! for i in 0..10 {
//!     cache.put(format!("hot-{}", i), i);
//!     let _ = cache.get(&format!("hot-{}", i));
//! }
//!
//! // A scan from another thread only churns the probationary queue.
//! let scanner = Arc::clone(&cache);
//! thread::spawn(move || {
//!     for i in 0..10_000 {
//!         scanner.put(format!("scan-{}", i), i);
//!     }
//! })
//! .join()
//! .unwrap();
//!
//! for i in 0..10 {
//!     assert!(cache.contains(&format!("hot-{}", i)));
//! }
//! ```

extern crate alloc;

use crate::config::TwoQCacheConfig;
use crate::error::{ConfigError, InvariantError};
use crate::meta::QueueKind;
use crate::metrics::CacheMetrics;
use crate::twoq::TwoQSegment;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe 2Q cache guarded by a single lock.
pub struct ConcurrentTwoQCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<TwoQSegment<K, V, S>>,
}

impl<K, V> ConcurrentTwoQCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    /// Creates a concurrent 2Q cache of `capacity` entries with the default
    /// ratios.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::init(TwoQCacheConfig::new(capacity), None)
    }

    /// Creates a concurrent 2Q cache from a configuration.
    ///
    /// # Arguments
    /// * `config` - The cache configuration
    /// * `hasher` - Optional custom hasher. If `None`, uses the default hasher.
    pub fn init(
        config: TwoQCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        Self::with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K, V, S> ConcurrentTwoQCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    /// Creates a concurrent 2Q cache with an explicit hash builder.
    pub fn with_hasher(config: TwoQCacheConfig, hash_builder: S) -> Result<Self, ConfigError> {
        Ok(Self {
            segment: Mutex::new(TwoQSegment::init(config, hash_builder)?),
        })
    }

    /// Returns the maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.segment.lock().cap()
    }

    /// Returns the number of resident entries.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if no value is resident.
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Returns the number of keys in the ghost queue.
    pub fn ghost_len(&self) -> usize {
        self.segment.lock().ghost_len()
    }

    /// Returns the number of ghost keys read since eviction and awaiting a
    /// write.
    pub fn pending_len(&self) -> usize {
        self.segment.lock().pending_len()
    }

    /// Gets a value from the cache.
    ///
    /// This clones the value to avoid holding the lock. For zero-copy access,
    /// use `get_with()` instead.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Gets a value and applies a function to it while holding the lock.
    ///
    /// Has the same promotion effect as `get()`.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Returns a clone of the value without promoting or reordering.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().peek(key).cloned()
    }

    /// Applies a function to the value without promoting or reordering.
    pub fn peek_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().peek(key).map(f)
    }

    /// Inserts a key-value pair, returning the previous value if the key
    /// was resident.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        self.segment.lock().put(key, value)
    }

    /// Removes a key, returning its value if it was resident.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().remove(key)
    }

    /// Returns `true` if `key` is resident. Does not reorder.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains(key)
    }

    /// Returns the queue currently tracking `key`.
    pub fn queue_of<Q>(&self, key: &Q) -> Option<QueueKind>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().queue_of(key)
    }

    /// Snapshot of the resident keys, protected MRU→LRU then probationary
    /// newest→oldest.
    pub fn keys(&self) -> Vec<K> {
        self.segment.lock().keys()
    }

    /// Clears all entries, including the ghost queue.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Counts a miss the caller resolved without a lookup here.
    pub fn record_miss(&self) {
        self.segment.lock().record_miss();
    }

    /// Verifies the internal queue bookkeeping under the lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.lock().check_invariants()
    }
}

impl<K, V, S> CacheMetrics for ConcurrentTwoQCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "Concurrent2Q"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentTwoQCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ConcurrentTwoQCache")
            .field("segment", &*self.segment.lock())
            .finish()
    }
}
