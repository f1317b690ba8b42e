#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Where Each Key Lives
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────────┐
//! │                          Key lifecycle in 2Q                             │
//! ├──────────────────────────────────────────────────────────────────────────┤
//! │                                                                          │
//! │   Unknown ──put──▶ Probationary ──get/put──▶ Protected ──evict──▶ gone   │
//! │                        │                        ▲                        │
//! │                     overflow                    │                        │
//! │                        ▼                        │                        │
//! │                      Ghost ────────put──────────┘                        │
//! │                        │                                                 │
//! │                     overflow ──▶ gone                                    │
//! │                                                                          │
//! └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Description | Best Use Case |
//! |------|-------------|---------------|
//! | [`TwoQCache`] | Single-threaded 2Q cache | Owned by one thread or wrapped by the caller |
//! | [`ConcurrentTwoQCache`] | 2Q behind one `parking_lot::Mutex` | Shared via `Arc` across threads |
//!
//! ## Performance Characteristics
//!
//! | Operation | Time | Notes |
//! |-----------|------|-------|
//! | `put` | O(1) | at most one resident eviction, ghost trimming amortized O(1) |
//! | `get` | O(1) | may promote probationary → protected |
//! | `remove` | O(1) | |
//! | `peek` / `contains` | O(1) | never reorders |
//! | `keys` | O(n) | cloned snapshot |
//!
//! Memory: one arena slot per tracked key (resident or ghost) plus one index
//! bucket. Ghost slots keep the key only.
//!
//! ## Code Examples
//!
//! ### Basic usage
//!
//! ```rust
//! use twoq_cache::TwoQCache;
//!
//! let mut cache = TwoQCache::new(2).unwrap();
//! cache.put("apple", 1);
//! cache.put("banana", 2);
//! assert_eq!(cache.get(&"apple"), Some(&1));
//!
//! cache.put("cherry", 3);
//! assert_eq!(cache.get(&"banana"), None);
//! assert_eq!(cache.get(&"apple"), Some(&1));
//! ```
//!
//! ### Custom partitioning
//!
//! ```rust
//! use twoq_cache::{TwoQCache, TwoQCacheConfig};
//!
//! let config = TwoQCacheConfig::new(1000)
//!     .with_recent_ratio(0.10)
//!     .with_ghost_ratio(1.0);
//! let mut cache: TwoQCache<u64, Vec<u8>> = TwoQCache::init(config, None).unwrap();
//! cache.put(1, vec![0u8; 16]);
//! assert_eq!(cache.probationary_capacity(), 100);
//! assert_eq!(cache.ghost_capacity(), 1000);
//! ```
//!
//! ### Metrics
//!
//! ```rust
//! use twoq_cache::metrics::CacheMetrics;
//! use twoq_cache::TwoQCache;
//!
//! let mut cache = TwoQCache::new(10).unwrap();
//! cache.put(1, "one");
//! cache.get(&1);
//! cache.get(&2);
//!
//! let metrics = cache.metrics();
//! assert_eq!(metrics["cache_hits"], 1.0);
//! assert_eq!(metrics["promotions"], 1.0);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `hashbrown` | ✓ | Use hashbrown for the key index (required for `no_std`) |
//! | `concurrent` | ✓ | Enable [`ConcurrentTwoQCache`] (pulls in `parking_lot`) |
//! | `std` | | Link the standard library |
//! | `nightly` | | Enable nightly-only hashbrown optimizations |
//!
//! ## Modules
//!
//! - [`twoq`]: the 2Q cache
//! - [`config`]: configuration of capacity and partition ratios
//! - [`error`]: configuration and invariant errors
//! - [`meta`]: queue membership tags
//! - [`metrics`]: metrics collection for cache performance monitoring
//! - [`concurrent`]: thread-safe wrapper (requires `concurrent` feature)

#![no_std]

#[cfg(any(feature = "std", not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Error types for construction and invariant checking.
pub mod error;

/// Queue membership tags.
///
/// `QueueKind` tells which of the three 2Q queues tracks a key.
pub mod meta;

/// Arena entry type carrying key, optional value, queue tag and links.
pub(crate) mod entry;

/// Slot arena owning every tracked entry.
pub(crate) mod store;

/// Intrusive doubly linked list of arena handles.
///
/// **Note**: This module is internal infrastructure and should not be used
/// directly by library consumers.
pub(crate) mod list;

/// Probationary, protected and ghost queues over the shared arena.
pub(crate) mod queue;

/// Cache configuration.
pub mod config;

/// 2Q cache implementation.
///
/// Provides a fixed-size cache that only keeps keys in its long-lived
/// protected queue once they have been seen twice, which keeps one-time
/// scans from flushing the working set.
pub mod twoq;

/// Cache metrics system.
///
/// Provides counters and a uniform BTreeMap-based reporting interface.
pub mod metrics;

/// Concurrent cache implementation.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use config::TwoQCacheConfig;
pub use error::{ConfigError, InvariantError};
pub use meta::QueueKind;
pub use twoq::TwoQCache;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentTwoQCache;
