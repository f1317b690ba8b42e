//! Entry Store
//!
//! A slot arena that owns every [`Entry`](crate::entry::Entry) and hands out
//! integer [`Handle`]s. Queues refer to entries only through handles, so
//! there are no ownership cycles and no raw pointers.
//!
//! ```text
//!   slots: Vec<Option<Entry<K, V>>>          free: Vec<usize>
//!   ┌─────┬──────────────────────────┐       ┌───┐
//!   │  0  │ Some(key_a, Probationary)│       │ 1 │ ◀── next insert reuses slot 1
//!   │  1  │ None                     │       └───┘
//!   │  2  │ Some(key_b, Ghost)       │
//!   └─────┴──────────────────────────┘
//! ```
//!
//! Freed slots are recycled before the vector grows, so a cache at steady
//! state never reallocates its arena.

extern crate alloc;

use crate::entry::Entry;
use alloc::vec::Vec;

/// Stable index of an entry inside the [`EntryStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Handle(usize);

impl Handle {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Slot arena holding the payload of every tracked key.
pub(crate) struct EntryStore<K, V> {
    slots: Vec<Option<Entry<K, V>>>,
    free: Vec<usize>,
    len: usize,
}

impl<K, V> EntryStore<K, V> {
    /// Creates a store with room for `capacity` entries before growing.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entries.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Number of slots ever allocated (live + free).
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Stores an entry and returns its handle.
    pub(crate) fn insert(&mut self, entry: Entry<K, V>) -> Handle {
        self.len += 1;
        match self.free.pop() {
            Some(idx) => {
                debug_assert!(self.slots[idx].is_none(), "free slot {idx} is occupied");
                self.slots[idx] = Some(entry);
                Handle(idx)
            }
            None => {
                self.slots.push(Some(entry));
                Handle(self.slots.len() - 1)
            }
        }
    }

    /// Removes an entry, returning it if the handle was live.
    pub(crate) fn remove(&mut self, handle: Handle) -> Option<Entry<K, V>> {
        let entry = self.slots.get_mut(handle.0)?.take()?;
        self.free.push(handle.0);
        self.len -= 1;
        Some(entry)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> Option<&Entry<K, V>> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<&mut Entry<K, V>> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Drops every entry. Allocated slot memory is kept for reuse.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}
