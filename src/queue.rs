//! The three 2Q queues.
//!
//! Each queue is a thin, typed wrapper over an [`IndexList`] threading
//! through the shared [`EntryStore`]. The wrappers exist so the controller
//! reads in terms of the algorithm (admit, evict oldest, touch, remember)
//! instead of raw list surgery, and so each queue's ordering discipline is
//! stated in one place:
//!
//! - [`ProbationaryQueue`] (A1-in): FIFO. Entries never move once admitted;
//!   a second access takes them out entirely.
//! - [`ProtectedQueue`] (Am): LRU. Every hit moves the entry to the front.
//! - [`GhostQueue`] (A1-out): bounded FIFO of value-less keys. The
//!   controller keeps a second one for ghost keys that were looked up and
//!   are waiting for a write.
//!
//! None of the queues frees store slots; that stays with the controller,
//! which also owns the key index.

use crate::list::{IndexList, Iter};
use crate::store::{EntryStore, Handle};

/// A1-in: first-in first-out queue of keys seen once.
#[derive(Debug, Clone)]
pub(crate) struct ProbationaryQueue {
    list: IndexList,
    capacity: usize,
}

impl ProbationaryQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            list: IndexList::new(),
            capacity,
        }
    }

    /// Soft limit: above it the queue is always the eviction source.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Links a newly admitted entry as the newest.
    #[inline]
    pub(crate) fn admit<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) {
        self.list.push_front(store, handle);
    }

    /// Detaches and returns the oldest entry.
    #[inline]
    pub(crate) fn pop_oldest<K, V>(&mut self, store: &mut EntryStore<K, V>) -> Option<Handle> {
        self.list.pop_back(store)
    }

    /// Detaches an entry, e.g. on promotion or removal.
    #[inline]
    pub(crate) fn detach<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) -> bool {
        self.list.unlink(store, handle)
    }

    /// Newest to oldest.
    #[inline]
    pub(crate) fn iter<'a, K, V>(&self, store: &'a EntryStore<K, V>) -> Iter<'a, K, V> {
        self.list.iter(store)
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.list.reset();
    }
}

/// Am: least-recently-used queue of keys that proved to recur.
///
/// It has no hard limit of its own; it may use whatever part of the
/// resident budget the probationary queue leaves free.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProtectedQueue {
    list: IndexList,
}

impl ProtectedQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Links an entry as the most recently used.
    #[inline]
    pub(crate) fn insert_mru<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) {
        self.list.push_front(store, handle);
    }

    /// Refreshes a linked entry to the most recently used position.
    #[inline]
    pub(crate) fn touch<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) {
        self.list.move_to_front(store, handle);
    }

    /// Detaches and returns the least recently used entry.
    #[inline]
    pub(crate) fn pop_lru<K, V>(&mut self, store: &mut EntryStore<K, V>) -> Option<Handle> {
        self.list.pop_back(store)
    }

    #[inline]
    pub(crate) fn detach<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) -> bool {
        self.list.unlink(store, handle)
    }

    /// Most to least recently used.
    #[inline]
    pub(crate) fn iter<'a, K, V>(&self, store: &'a EntryStore<K, V>) -> Iter<'a, K, V> {
        self.list.iter(store)
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.list.reset();
    }
}

/// Bounded FIFO of value-less keys: A1-out, and the pending list.
#[derive(Debug, Clone)]
pub(crate) struct GhostQueue {
    list: IndexList,
    capacity: usize,
}

impl GhostQueue {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            list: IndexList::new(),
            capacity,
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    /// Links a freshly ghosted entry as the newest.
    #[inline]
    pub(crate) fn remember<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) {
        self.list.push_front(store, handle);
    }

    /// Detaches the oldest ghost while the queue is over capacity.
    ///
    /// Call repeatedly until it returns `None`.
    #[inline]
    pub(crate) fn pop_overflow<K, V>(&mut self, store: &mut EntryStore<K, V>) -> Option<Handle> {
        if self.list.len() > self.capacity {
            self.list.pop_back(store)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn detach<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) -> bool {
        self.list.unlink(store, handle)
    }

    /// Newest to oldest.
    #[inline]
    pub(crate) fn iter<'a, K, V>(&self, store: &'a EntryStore<K, V>) -> Iter<'a, K, V> {
        self.list.iter(store)
    }

    #[inline]
    pub(crate) fn reset(&mut self) {
        self.list.reset();
    }
}
