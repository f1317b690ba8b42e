//! 2Q Cache Implementation
//!
//! 2Q is a scan-resistant replacement policy that only lets a key into the
//! long-lived part of the cache once it has proven to recur. New keys are
//! parked in a small **probationary** FIFO; keys touched again while there
//! (or returning shortly after being pushed out) move into a **protected**
//! LRU. A **ghost** queue remembers the keys recently pushed out of
//! probationary, without their values, so a returning key can skip
//! probation. Looking up a ghost key is still a miss, but it moves the key
//! to a **pending** list: the next `put` of that key goes straight to
//! protected even if later churn would have pushed it out of the ghost
//! queue.
//!
//! # How the Algorithm Works
//!
//! ## Queue Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                                2Q Cache                                     │
//! │                                                                             │
//! │   put(new key)                                                              │
//! │        │                                                                    │
//! │        ▼                                                                    │
//! │  ┌──────────────────────────────┐   overflow    ┌────────────────────────┐  │
//! │  │ PROBATIONARY (A1-in) FIFO    │──────────────▶│ GHOST (A1-out) FIFO    │  │
//! │  │ newest ◀──▶ ... ◀──▶ oldest  │  value dropped│ keys only              │  │
//! │  └──────────────┬───────────────┘               └──────┬─────┬───────────┘  │
//! │                 │                                   get  │     │ put        │
//! │                 │                                        ▼     │            │
//! │                 │                        ┌──────────────────┐  │            │
//! │                 │                        │ PENDING keys     │  │            │
//! │                 │                        └────────┬─────────┘  │            │
//! │                 │ get / put (second touch)        │ put        │            │
//! │                 ▼                                 ▼            ▼            │
//! │  ┌────────────────────────────────────────────────────────────────────────┐ │
//! │  │ PROTECTED (Am) LRU                                                     │ │
//! │  │ MRU ◀──▶ [hot_1] ◀──▶ [hot_2] ◀──▶ ... ◀──▶ [evict] LRU                │ │
//! │  └────────────────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All queues thread through a single arena of entries; the key index
//! maps each tracked key to its arena handle, and the entry's queue tag says
//! which queue links it.
//!
//! ## Making Space
//!
//! Before a key becomes resident while `|probationary| + |protected| ≥ C`:
//!
//! 1. If probationary holds more than its share `Kin`, or exactly `Kin` and
//!    the incoming key is brand new, its oldest entry moves to the ghost
//!    queue (the ghost queue then forgets its oldest keys beyond `Kout`).
//! 2. Otherwise the least recently used protected entry is dropped.
//! 3. If protected is empty, probationary is used after all.
//!
//! ## Scan Resistance Example
//!
//! ```text
//! C = 4, Kin = 1
//! put(A) get(A) put(B) get(B)    Protected=[B, A]   Probationary=[]
//! put(X) put(Y) put(Z)           Protected=[B, A]   Probationary=[Z, Y] → [Z]
//!                                Ghost=[Y, X]
//! A and B survive the scan; the scan only churns probationary.
//! ```
//!
//! ## Operations
//!
//! | Operation | Action | Time |
//! |-----------|--------|------|
//! | `get(key)` | Promote probationary hits; refresh protected hits; mark ghost keys pending | O(1) |
//! | `put(key, value)` | Admit, update, promote or re-admit a ghost or pending key | O(1) |
//! | `remove(key)` | Unlink from whichever queue holds the key | O(1) |
//! | `peek(key)` | Read without reordering | O(1) |
//! | `keys()` | Protected MRU→LRU, then probationary newest→oldest | O(n) |
//!
//! # Thread Safety
//!
//! `TwoQCache` is **not thread-safe**. For concurrent access, either wrap it
//! in a `Mutex` or use `ConcurrentTwoQCache` (requires the `concurrent`
//! feature).
//!
//! # Examples
//!
//! ```
//! use twoq_cache::TwoQCache;
//!
//! let mut cache = TwoQCache::new(10).unwrap();
//! for i in 0..20 {
//!     cache.put(i, i * 10);
//! }
//!
//! assert_eq!(cache.len(), 10);
//! assert_eq!(cache.get(&0), None);
//! assert_eq!(cache.get(&19), Some(&190));
//! ```

extern crate alloc;

use crate::config::TwoQCacheConfig;
use crate::entry::Entry;
use crate::error::{ConfigError, InvariantError};
use crate::meta::QueueKind;
use crate::metrics::{CacheMetrics, TwoQCacheMetrics};
use crate::queue::{GhostQueue, ProbationaryQueue, ProtectedQueue};
use crate::store::{EntryStore, Handle};
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use tracing::{debug, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

// Upper bound on slots reserved up front; larger caches grow on demand.
const MAX_PREALLOCATED_SLOTS: usize = 1 << 12;

/// Internal 2Q segment containing the actual cache algorithm.
///
/// Shared between `TwoQCache` (single-threaded) and `ConcurrentTwoQCache`
/// (multi-threaded, behind one lock).
pub(crate) struct TwoQSegment<K, V, S = DefaultHashBuilder> {
    config: TwoQCacheConfig,

    /// Arena holding every tracked entry, resident or ghost
    store: EntryStore<K, V>,

    /// Key index: every tracked key maps to its arena handle
    map: HashMap<K, Handle, S>,

    probationary: ProbationaryQueue,
    protected: ProtectedQueue,
    ghost: GhostQueue,

    /// Ghost keys looked up since eviction; bounded like `ghost`
    pending: GhostQueue,

    metrics: TwoQCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> TwoQSegment<K, V, S> {
    /// Validates `config` and builds an empty segment.
    pub(crate) fn init(config: TwoQCacheConfig, hash_builder: S) -> Result<Self, ConfigError> {
        config.validate()?;

        let probationary_capacity = config.probationary_capacity();
        let ghost_capacity = config.ghost_capacity();
        let slots = config
            .capacity
            .saturating_add(ghost_capacity)
            .min(MAX_PREALLOCATED_SLOTS);

        debug!(
            capacity = config.capacity,
            probationary_capacity, ghost_capacity, "initialized 2Q cache"
        );

        Ok(Self {
            config,
            store: EntryStore::with_capacity(slots),
            map: HashMap::with_capacity_and_hasher(slots, hash_builder),
            probationary: ProbationaryQueue::new(probationary_capacity),
            protected: ProtectedQueue::new(),
            ghost: GhostQueue::new(ghost_capacity),
            pending: GhostQueue::new(ghost_capacity),
            metrics: TwoQCacheMetrics::new(
                config.capacity as u64,
                probationary_capacity as u64,
                ghost_capacity as u64,
            ),
        })
    }

    #[inline]
    pub(crate) fn cap(&self) -> usize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn probationary_capacity(&self) -> usize {
        self.probationary.capacity()
    }

    #[inline]
    pub(crate) fn ghost_capacity(&self) -> usize {
        self.ghost.capacity()
    }

    /// Number of resident entries.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.probationary.len() + self.protected.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub(crate) fn probationary_len(&self) -> usize {
        self.probationary.len()
    }

    #[inline]
    pub(crate) fn protected_len(&self) -> usize {
        self.protected.len()
    }

    #[inline]
    pub(crate) fn ghost_len(&self) -> usize {
        self.ghost.len()
    }

    #[inline]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &TwoQCacheMetrics {
        &self.metrics
    }

    pub(crate) fn record_miss(&mut self) {
        self.metrics.core.record_miss();
    }

    /// Which queue currently tracks `key`, if any.
    pub(crate) fn queue_of<Q>(&self, key: &Q) -> Option<QueueKind>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = *self.map.get(key)?;
        self.store.get(handle).map(|entry| entry.queue)
    }

    /// Reads a resident value without reordering or promoting.
    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = *self.map.get(key)?;
        self.store.get(handle)?.value.as_ref()
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.peek(key).is_some()
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.access(key)?;
        self.store.get(handle)?.value.as_ref()
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = self.access(key)?;
        self.store.get_mut(handle)?.value.as_mut()
    }

    /// Applies the read transition for `key` and returns its handle if the
    /// key is resident.
    ///
    /// A probationary hit is promoted to protected; the resident count is
    /// unchanged, so nothing is evicted. A ghost hit is a miss that moves the
    /// key out of the ghost queue into the pending list, so the next write
    /// admits it into protected.
    fn access<Q>(&mut self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(&handle) = self.map.get(key) else {
            self.metrics.core.record_miss();
            return None;
        };

        match self.store.get(handle).map(|entry| entry.queue) {
            Some(QueueKind::Protected) => {
                self.protected.touch(&mut self.store, handle);
                self.metrics.record_protected_hit();
            }
            Some(QueueKind::Probationary) => {
                self.probationary.detach(&mut self.store, handle);
                if let Some(entry) = self.store.get_mut(handle) {
                    entry.queue = QueueKind::Protected;
                }
                self.protected.insert_mru(&mut self.store, handle);
                self.metrics.record_probationary_hit();
                self.metrics.record_promotion();
                self.sync_queue_sizes();
                trace!(slot = handle.index(), "promoted probationary entry on read");
            }
            Some(QueueKind::Ghost) => {
                self.ghost.detach(&mut self.store, handle);
                if let Some(entry) = self.store.get_mut(handle) {
                    entry.queue = QueueKind::Pending;
                }
                self.pending.remember(&mut self.store, handle);
                while let Some(forgotten) = self.pending.pop_overflow(&mut self.store) {
                    self.forget(forgotten);
                }
                self.metrics.record_ghost_hit();
                self.sync_queue_sizes();
                trace!(slot = handle.index(), "ghost key marked for protected admission");
                return None;
            }
            Some(QueueKind::Pending) => {
                self.metrics.core.record_miss();
                return None;
            }
            None => {
                debug_assert!(false, "index points at a dead slot");
                self.metrics.core.record_miss();
                return None;
            }
        }
        Some(handle)
    }

    /// Inserts or updates `key`, returning the previous value if the key
    /// was resident.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<V> {
        let tracked = self.map.get(&key).copied();
        let previous = match tracked {
            Some(handle) => self.put_tracked(handle, value),
            None => {
                self.ensure_space(false);
                let handle = self.store.insert(Entry::probationary(key.clone(), value));
                self.map.insert(key, handle);
                self.probationary.admit(&mut self.store, handle);
                self.metrics.core.record_insertion();
                None
            }
        };

        self.sync_queue_sizes();
        debug_assert!(self.len() <= self.config.capacity);
        previous
    }

    fn put_tracked(&mut self, handle: Handle, value: V) -> Option<V> {
        let queue = match self.store.get(handle) {
            Some(entry) => entry.queue,
            None => {
                debug_assert!(false, "index points at a dead slot");
                return None;
            }
        };

        match queue {
            QueueKind::Protected => {
                self.protected.touch(&mut self.store, handle);
                self.metrics.core.record_update();
                self.store.get_mut(handle)?.protect(value)
            }
            QueueKind::Probationary => {
                self.probationary.detach(&mut self.store, handle);
                let previous = self.store.get_mut(handle)?.protect(value);
                self.protected.insert_mru(&mut self.store, handle);
                self.metrics.core.record_update();
                self.metrics.record_promotion();
                trace!(slot = handle.index(), "promoted probationary entry on write");
                previous
            }
            QueueKind::Ghost | QueueKind::Pending => {
                // Unlink first so making space cannot forget this key.
                self.unlink(handle, queue);
                self.ensure_space(true);
                let previous = self.store.get_mut(handle)?.protect(value);
                debug_assert!(previous.is_none());
                self.protected.insert_mru(&mut self.store, handle);
                self.metrics.record_ghost_readmission();
                trace!(slot = handle.index(), "re-admitted ghost key into protected");
                None
            }
        }
    }

    /// Frees one resident slot if the cache is full.
    fn ensure_space(&mut self, ghost_readmission: bool) {
        if self.len() < self.config.capacity {
            return;
        }

        let probationary_len = self.probationary.len();
        let probationary_capacity = self.probationary.capacity();
        let prefer_probationary = !self.probationary.is_empty()
            && (probationary_len > probationary_capacity
                || (probationary_len == probationary_capacity && !ghost_readmission));

        if prefer_probationary || self.protected.is_empty() {
            self.evict_probationary();
        } else {
            self.evict_protected();
        }
    }

    /// Moves the oldest probationary entry into the ghost queue, dropping
    /// its value, then trims the ghost queue to its capacity.
    fn evict_probationary(&mut self) {
        let Some(handle) = self.probationary.pop_oldest(&mut self.store) else {
            return;
        };
        if let Some(entry) = self.store.get_mut(handle) {
            entry.demote_to_ghost();
        }
        self.ghost.remember(&mut self.store, handle);
        self.metrics.record_probationary_eviction();
        trace!(slot = handle.index(), "evicted probationary entry to ghost");

        while let Some(forgotten) = self.ghost.pop_overflow(&mut self.store) {
            self.forget(forgotten);
            self.metrics.record_ghost_eviction();
        }
    }

    /// Drops the least recently used protected entry outright.
    fn evict_protected(&mut self) {
        let Some(handle) = self.protected.pop_lru(&mut self.store) else {
            return;
        };
        self.forget(handle);
        self.metrics.record_protected_eviction();
        trace!(slot = handle.index(), "evicted protected entry");
    }

    /// Detaches `handle` from the queue named by `queue`.
    fn unlink(&mut self, handle: Handle, queue: QueueKind) {
        let linked = match queue {
            QueueKind::Probationary => self.probationary.detach(&mut self.store, handle),
            QueueKind::Protected => self.protected.detach(&mut self.store, handle),
            QueueKind::Ghost => self.ghost.detach(&mut self.store, handle),
            QueueKind::Pending => self.pending.detach(&mut self.store, handle),
        };
        debug_assert!(linked, "{queue} entry was not linked");
    }

    /// Frees an unlinked entry and removes its key from the index.
    fn forget(&mut self, handle: Handle) -> Option<V> {
        let entry = self.store.remove(handle)?;
        self.map.remove(&entry.key);
        entry.value
    }

    /// Removes `key` from whichever queue tracks it.
    ///
    /// Returns the value only if the key was resident; a ghost or pending
    /// key is simply forgotten.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let handle = *self.map.get(key)?;
        let Some(queue) = self.store.get(handle).map(|entry| entry.queue) else {
            debug_assert!(false, "index points at a dead slot");
            self.map.remove(key);
            return None;
        };
        self.unlink(handle, queue);

        let value = self.forget(handle);
        if value.is_some() {
            self.metrics.core.record_removal();
        }
        self.sync_queue_sizes();
        value
    }

    /// Resident keys: protected MRU→LRU, then probationary newest→oldest.
    pub(crate) fn keys(&self) -> Vec<K> {
        self.protected
            .iter(&self.store)
            .chain(self.probationary.iter(&self.store))
            .filter_map(|handle| self.store.get(handle))
            .map(|entry| entry.key.clone())
            .collect()
    }

    pub(crate) fn clear(&mut self) {
        self.map.clear();
        self.store.clear();
        self.probationary.reset();
        self.protected.reset();
        self.ghost.reset();
        self.pending.reset();
        self.sync_queue_sizes();
        debug!(capacity = self.config.capacity, "cleared 2Q cache");
    }

    fn sync_queue_sizes(&mut self) {
        self.metrics.update_queue_sizes(
            self.probationary.len() as u64,
            self.protected.len() as u64,
            self.ghost.len() as u64,
            self.pending.len() as u64,
        );
    }

    /// Walks every queue and checks the bookkeeping against the index.
    pub(crate) fn check_invariants(&self) -> Result<(), InvariantError> {
        if self.len() > self.config.capacity {
            return Err(InvariantError::new(format!(
                "{} resident entries exceed capacity {}",
                self.len(),
                self.config.capacity
            )));
        }
        if self.ghost.len() > self.ghost.capacity() {
            return Err(InvariantError::new(format!(
                "ghost queue holds {} keys, capacity {}",
                self.ghost.len(),
                self.ghost.capacity()
            )));
        }

        if self.pending.len() > self.pending.capacity() {
            return Err(InvariantError::new(format!(
                "pending list holds {} keys, capacity {}",
                self.pending.len(),
                self.pending.capacity()
            )));
        }

        let tracked = self.len() + self.ghost.len() + self.pending.len();
        if tracked != self.map.len() || tracked != self.store.len() {
            return Err(InvariantError::new(format!(
                "queues link {} entries, index has {}, store has {}",
                tracked,
                self.map.len(),
                self.store.len()
            )));
        }

        self.check_queue(
            QueueKind::Probationary,
            self.probationary.iter(&self.store),
            self.probationary.len(),
        )?;
        self.check_queue(
            QueueKind::Protected,
            self.protected.iter(&self.store),
            self.protected.len(),
        )?;
        self.check_queue(QueueKind::Ghost, self.ghost.iter(&self.store), self.ghost.len())?;
        self.check_queue(
            QueueKind::Pending,
            self.pending.iter(&self.store),
            self.pending.len(),
        )
    }

    fn check_queue(
        &self,
        kind: QueueKind,
        handles: impl Iterator<Item = Handle>,
        expected: usize,
    ) -> Result<(), InvariantError> {
        let mut seen = 0;
        for handle in handles {
            seen += 1;
            let entry = self.store.get(handle).ok_or_else(|| {
                InvariantError::new(format!("{kind} queue links dead slot {}", handle.index()))
            })?;
            if entry.queue != kind {
                return Err(InvariantError::new(format!(
                    "slot {} linked in {kind} queue but tagged {}",
                    handle.index(),
                    entry.queue
                )));
            }
            if entry.value.is_some() != kind.is_resident() {
                return Err(InvariantError::new(format!(
                    "slot {} in {kind} queue has wrong value presence",
                    handle.index()
                )));
            }
            if self.map.get(&entry.key) != Some(&handle) {
                return Err(InvariantError::new(format!(
                    "key of slot {} in {kind} queue is not indexed to it",
                    handle.index()
                )));
            }
        }
        if seen != expected {
            return Err(InvariantError::new(format!(
                "{kind} queue reports {expected} entries but links {seen}"
            )));
        }
        Ok(())
    }
}

impl<K, V, S> core::fmt::Debug for TwoQSegment<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TwoQSegment")
            .field("capacity", &self.config.capacity)
            .field("probationary_len", &self.probationary.len())
            .field("protected_len", &self.protected.len())
            .field("ghost_len", &self.ghost.len())
            .field("pending_len", &self.pending.len())
            .field("probationary_capacity", &self.probationary.capacity())
            .field("ghost_capacity", &self.ghost.capacity())
            .finish()
    }
}

/// A scan-resistant 2Q cache.
///
/// New keys enter a probationary FIFO; a second touch promotes them to a
/// protected LRU. Keys pushed out of probationary are remembered (without
/// values) in a ghost queue, and a `put` of a remembered key admits it
/// directly into protected.
///
/// # Examples
///
/// ```
/// use twoq_cache::{QueueKind, TwoQCache};
///
/// let mut cache = TwoQCache::new(4).unwrap();
/// cache.put("a", 1);
/// assert_eq!(cache.queue_of(&"a"), Some(QueueKind::Probationary));
///
/// cache.get(&"a");
/// assert_eq!(cache.queue_of(&"a"), Some(QueueKind::Protected));
/// ```
pub struct TwoQCache<K, V, S = DefaultHashBuilder> {
    segment: TwoQSegment<K, V, S>,
}

impl<K, V, S> core::fmt::Debug for TwoQCache<K, V, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TwoQCache")
            .field("segment", &self.segment)
            .finish()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> TwoQCache<K, V, S> {
    /// Creates a 2Q cache from a configuration and an explicit hash builder.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the capacity is zero or a ratio lies
    /// outside `[0.0, 1.0]`.
    pub fn with_hasher(config: TwoQCacheConfig, hash_builder: S) -> Result<Self, ConfigError> {
        Ok(Self {
            segment: TwoQSegment::init(config, hash_builder)?,
        })
    }

    /// Maximum number of resident entries.
    #[inline]
    pub fn cap(&self) -> usize {
        self.segment.cap()
    }

    /// Soft limit of the probationary queue.
    #[inline]
    pub fn probationary_capacity(&self) -> usize {
        self.segment.probationary_capacity()
    }

    /// Maximum number of keys the ghost queue remembers.
    #[inline]
    pub fn ghost_capacity(&self) -> usize {
        self.segment.ghost_capacity()
    }

    /// Returns the number of resident entries (probationary + protected).
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if no value is resident.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Number of entries in the probationary queue.
    #[inline]
    pub fn probationary_len(&self) -> usize {
        self.segment.probationary_len()
    }

    /// Number of entries in the protected queue.
    #[inline]
    pub fn protected_len(&self) -> usize {
        self.segment.protected_len()
    }

    /// Number of keys in the ghost queue.
    #[inline]
    pub fn ghost_len(&self) -> usize {
        self.segment.ghost_len()
    }

    /// Number of ghost keys that were looked up and now wait for a write.
    #[inline]
    pub fn pending_len(&self) -> usize {
        self.segment.pending_len()
    }

    /// Returns a reference to the value of `key`, if resident.
    ///
    /// A probationary hit promotes the key to protected; a protected hit
    /// refreshes it. A key only remembered by the ghost queue is a miss, and
    /// is marked so that its next `put` lands in protected.
    #[inline]
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get(key)
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.get_mut(key)
    }

    /// Returns the value of `key` without promoting or reordering it.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` is resident. Does not reorder.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Returns the queue tracking `key`, including ghost and pending keys.
    #[inline]
    pub fn queue_of<Q>(&self, key: &Q) -> Option<QueueKind>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.queue_of(key)
    }

    /// Inserts a key-value pair.
    ///
    /// - A protected key has its value replaced and becomes most recent.
    /// - A probationary key has its value replaced and is promoted.
    /// - A ghost or pending key is re-admitted straight into protected.
    /// - A new key enters probationary.
    ///
    /// Returns the previous value if the key was resident.
    #[inline]
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        self.segment.put(key, value)
    }

    /// Removes `key`, returning its value if it was resident.
    ///
    /// A ghost or pending key is forgotten and `None` is returned.
    #[inline]
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.remove(key)
    }

    /// Resident keys, protected MRU→LRU followed by probationary
    /// newest→oldest.
    #[inline]
    pub fn keys(&self) -> Vec<K> {
        self.segment.keys()
    }

    /// Clears the cache, including ghost and pending keys.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Counts a miss the caller resolved without a lookup here, so hit rates
    /// cover every request the caller saw.
    #[inline]
    pub fn record_miss(&mut self) {
        self.segment.record_miss();
    }

    /// Verifies the internal queue bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns an [`InvariantError`] describing the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.segment.check_invariants()
    }
}

impl<K: Hash + Eq + Clone, V> TwoQCache<K, V, DefaultHashBuilder> {
    /// Creates a 2Q cache of `capacity` entries with the default ratios.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use twoq_cache::TwoQCache;
    ///
    /// let cache: TwoQCache<u64, String> = TwoQCache::new(100).unwrap();
    /// assert_eq!(cache.probationary_capacity(), 25);
    /// assert_eq!(cache.ghost_capacity(), 50);
    /// ```
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        Self::init(TwoQCacheConfig::new(capacity), None)
    }

    /// Creates a 2Q cache from a configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacity and partition ratios
    /// * `hasher` - Optional custom hasher. If `None`, uses the default hasher.
    pub fn init(
        config: TwoQCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, ConfigError> {
        Self::with_hasher(config, hasher.unwrap_or_default())
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher> CacheMetrics for TwoQCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::*;
    use alloc::vec;
    use std::string::ToString;

    fn make_cache(capacity: usize) -> TwoQCache<u32, u32> {
        TwoQCache::new(capacity).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        assert_eq!(
            TwoQCache::<u32, u32>::new(0).unwrap_err(),
            ConfigError::InvalidCapacity
        );
        let bad = TwoQCacheConfig::new(8).with_ghost_ratio(2.0);
        assert_eq!(
            TwoQCache::<u32, u32>::init(bad, None).unwrap_err(),
            ConfigError::InvalidGhostRatio(2.0)
        );
    }

    #[test]
    fn test_partition_sizes() {
        let cache = make_cache(10);
        assert_eq!(cache.cap(), 10);
        assert_eq!(cache.probationary_capacity(), 2);
        assert_eq!(cache.ghost_capacity(), 5);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_new_keys_enter_probationary() {
        let mut cache = make_cache(4);
        assert_eq!(cache.put(1, 10), None);
        assert_eq!(cache.queue_of(&1), Some(QueueKind::Probationary));
        assert_eq!(cache.probationary_len(), 1);
        assert_eq!(cache.protected_len(), 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_get_promotes_probationary() {
        let mut cache = make_cache(4);
        cache.put(1, 10);
        assert_eq!(cache.get(&1), Some(&10));
        assert_eq!(cache.queue_of(&1), Some(QueueKind::Protected));
        assert_eq!(cache.len(), 1);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_put_promotes_probationary() {
        let mut cache = make_cache(4);
        cache.put(1, 10);
        assert_eq!(cache.put(1, 11), Some(10));
        assert_eq!(cache.queue_of(&1), Some(QueueKind::Protected));
        assert_eq!(cache.peek(&1), Some(&11));
    }

    #[test]
    fn test_put_updates_protected_in_place() {
        let mut cache = make_cache(4);
        cache.put(1, 10);
        cache.put(2, 20);
        cache.get(&1);
        cache.get(&2);
        assert_eq!(cache.keys(), vec![2, 1]);

        assert_eq!(cache.put(1, 12), Some(10));
        assert_eq!(cache.keys(), vec![1, 2]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_sequential_overfill_keeps_newest() {
        let mut cache = make_cache(10);
        for i in 0..20 {
            cache.put(i, i);
            assert!(cache.len() <= 10);
        }
        assert_eq!(cache.len(), 10);
        for i in 0..10 {
            assert!(!cache.contains(&i));
        }
        for i in 10..20 {
            assert_eq!(cache.peek(&i), Some(&i));
        }
        assert_eq!(cache.ghost_len(), 5);
        for i in 5..10 {
            assert_eq!(cache.queue_of(&i), Some(QueueKind::Ghost));
        }
        assert_eq!(cache.queue_of(&4), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_ghost_readmission_goes_to_protected() {
        let mut cache = make_cache(4);
        cache.put(1, 1);
        for i in 2..6 {
            cache.put(i, i);
        }
        assert_eq!(cache.queue_of(&1), Some(QueueKind::Ghost));

        assert_eq!(cache.put(1, 100), None);
        assert_eq!(cache.queue_of(&1), Some(QueueKind::Protected));
        assert_eq!(cache.peek(&1), Some(&100));
        assert!(cache.len() <= 4);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_get_on_ghost_is_a_miss_and_marks_pending() {
        let mut cache = make_cache(4);
        for i in 0..5 {
            cache.put(i, i);
        }
        assert_eq!(cache.queue_of(&0), Some(QueueKind::Ghost));
        assert_eq!(cache.get(&0), None);
        assert_eq!(cache.queue_of(&0), Some(QueueKind::Pending));
        assert_eq!(cache.ghost_len(), 0);
        assert_eq!(cache.pending_len(), 1);
        assert_eq!(cache.metrics()["ghost_hits"], 1.0);

        // A second read is a plain miss and leaves the key pending.
        assert_eq!(cache.get(&0), None);
        assert_eq!(cache.queue_of(&0), Some(QueueKind::Pending));
        assert_eq!(cache.metrics()["ghost_hits"], 1.0);
        assert_eq!(cache.metrics()["cache_misses"], 2.0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_pending_key_outlives_ghost_churn() {
        let mut cache = make_cache(4);
        for i in 0..5 {
            cache.put(i, i);
        }
        assert_eq!(cache.get(&0), None);

        // Enough new keys to cycle the ghost queue several times.
        for i in 10..14 {
            cache.put(i, i);
        }
        assert_eq!(cache.queue_of(&0), Some(QueueKind::Pending));

        assert_eq!(cache.put(0, 100), None);
        assert_eq!(cache.queue_of(&0), Some(QueueKind::Protected));
        assert_eq!(cache.peek(&0), Some(&100));
        assert_eq!(cache.pending_len(), 0);
        assert_eq!(cache.metrics()["ghost_readmissions"], 1.0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_pending_list_is_bounded_by_ghost_capacity() {
        // capacity 4 keeps at most two ghost keys, so at most two pending.
        let mut cache = make_cache(4);
        for i in 0..6 {
            cache.put(i, i);
        }
        let ghosts: Vec<_> = (0..6)
            .filter(|k| cache.queue_of(k) == Some(QueueKind::Ghost))
            .collect();
        assert_eq!(ghosts.len(), 2);
        for k in &ghosts {
            cache.get(k);
        }
        assert_eq!(cache.pending_len(), 2);

        for i in 20..30 {
            cache.put(i, i);
            let ghost = (20..=i).find(|k| cache.queue_of(k) == Some(QueueKind::Ghost));
            if let Some(k) = ghost {
                cache.get(&k);
            }
            assert!(cache.pending_len() <= 2);
            cache.check_invariants().unwrap();
        }
        // The oldest pending keys were forgotten to make room.
        assert!(ghosts.iter().all(|k| cache.queue_of(k).is_none()));
    }

    #[test]
    fn test_remove_and_clear_forget_pending_keys() {
        let mut cache = make_cache(4);
        for i in 0..6 {
            cache.put(i, i);
        }
        cache.get(&0);
        cache.get(&1);
        assert_eq!(cache.pending_len(), 2);

        assert_eq!(cache.remove(&0), None);
        assert_eq!(cache.queue_of(&0), None);
        assert_eq!(cache.pending_len(), 1);
        cache.check_invariants().unwrap();

        cache.clear();
        assert_eq!(cache.queue_of(&1), None);
        assert_eq!(cache.pending_len(), 0);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_protected_survives_scan() {
        let mut cache = make_cache(4);
        cache.put(100, 0);
        cache.get(&100);
        for i in 0..4 {
            cache.put(i, i);
        }
        assert!(cache.contains(&100));
        assert_eq!(cache.queue_of(&100), Some(QueueKind::Protected));
    }

    #[test]
    fn test_protected_lru_evicted_when_probationary_small() {
        let mut cache = make_cache(4);
        for i in 0..4 {
            cache.put(i, i);
            cache.get(&i);
        }
        assert_eq!(cache.protected_len(), 4);

        cache.put(9, 9);
        assert!(!cache.contains(&0));
        assert_eq!(cache.queue_of(&0), None);
        assert_eq!(cache.queue_of(&9), Some(QueueKind::Probationary));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_semantics() {
        let mut cache = make_cache(4);
        cache.put(1, 10);
        cache.put(2, 20);
        cache.get(&2);
        assert_eq!(cache.remove(&1), Some(10));
        assert_eq!(cache.remove(&2), Some(20));
        assert_eq!(cache.remove(&3), None);
        assert!(cache.is_empty());

        for i in 0..5 {
            cache.put(i, i);
        }
        assert_eq!(cache.queue_of(&0), Some(QueueKind::Ghost));
        assert_eq!(cache.remove(&0), None);
        assert_eq!(cache.queue_of(&0), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_peek_does_not_reorder() {
        let mut cache = make_cache(4);
        cache.put(1, 1);
        cache.put(2, 2);
        let before = cache.keys();
        assert_eq!(cache.peek(&1), Some(&1));
        assert!(cache.contains(&2));
        assert_eq!(cache.keys(), before);
        assert_eq!(cache.queue_of(&1), Some(QueueKind::Probationary));
    }

    #[test]
    fn test_keys_order() {
        let mut cache = make_cache(8);
        for i in 0..4 {
            cache.put(i, i);
        }
        cache.get(&1);
        cache.get(&3);
        assert_eq!(cache.keys(), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_get_mut_updates_value() {
        let mut cache = make_cache(4);
        cache.put(1, 1);
        if let Some(v) = cache.get_mut(&1) {
            *v = 42;
        }
        assert_eq!(cache.peek(&1), Some(&42));
        assert_eq!(cache.queue_of(&1), Some(QueueKind::Protected));
    }

    #[test]
    fn test_clear() {
        let mut cache = make_cache(4);
        for i in 0..6 {
            cache.put(i, i);
        }
        cache.clear();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.ghost_len(), 0);
        for i in 0..6 {
            assert_eq!(cache.queue_of(&i), None);
        }
        cache.check_invariants().unwrap();

        cache.put(7, 7);
        assert_eq!(cache.get(&7), Some(&7));
    }

    #[test]
    fn test_zero_ghost_ratio_disables_ghosts() {
        let config = TwoQCacheConfig::new(4).with_ghost_ratio(0.0);
        let mut cache: TwoQCache<u32, u32> = TwoQCache::init(config, None).unwrap();
        for i in 0..10 {
            cache.put(i, i);
        }
        assert_eq!(cache.ghost_len(), 0);
        assert_eq!(cache.queue_of(&0), None);
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_capacity_one() {
        let mut cache = make_cache(1);
        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&2));
        cache.get(&2);
        cache.put(3, 3);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(&3));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn test_borrowed_key_lookup() {
        let mut cache: TwoQCache<std::string::String, u32> = TwoQCache::new(2).unwrap();
        cache.put("apple".to_string(), 1);
        assert_eq!(cache.get("apple"), Some(&1));
        assert!(cache.contains("apple"));
        assert_eq!(cache.remove("apple"), Some(1));
    }

    #[test]
    fn test_metrics_counts() {
        let mut cache = make_cache(4);
        cache.put(1, 1);
        cache.get(&1);
        cache.get(&1);
        cache.get(&2);
        cache.record_miss();

        let m = cache.metrics();
        assert_eq!(m["requests"], 4.0);
        assert_eq!(m["cache_hits"], 2.0);
        assert_eq!(m["probationary_hits"], 1.0);
        assert_eq!(m["protected_hits"], 1.0);
        assert_eq!(m["promotions"], 1.0);
        assert_eq!(m["protected_size"], 1.0);
        assert_eq!(cache.algorithm_name(), "2Q");
    }
}
