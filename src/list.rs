//! Intrusive doubly linked list of arena handles.
//!
//! The list owns no nodes. It only records `head`, `tail` and `len`; the
//! `prev`/`next` links live inside each [`Entry`](crate::entry::Entry) in the
//! [`EntryStore`]. Several lists can therefore thread through one arena, and
//! moving an entry from one list to another is an O(1) unlink plus an O(1)
//! push without copying the payload.
//!
//! ```text
//!   head ─► [h3] ◄──► [h0] ◄──► [h7] ◄── tail
//!           newest              oldest
//! ```
//!
//! **Note**: This module is internal infrastructure. The caller is
//! responsible for never linking one handle into two lists at once; the
//! controller guarantees this through the per-entry queue tag.

use crate::entry::Link;
use crate::store::{EntryStore, Handle};

/// Doubly linked list of handles into an [`EntryStore`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct IndexList {
    head: Option<Handle>,
    tail: Option<Handle>,
    len: usize,
}

impl IndexList {
    /// Creates an empty list.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the current number of linked handles.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list links no handles.
    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first (newest / most recently used) handle.
    #[cfg(test)]
    pub(crate) fn front(&self) -> Option<Handle> {
        self.head
    }

    /// The last (oldest / least recently used) handle.
    #[cfg(test)]
    pub(crate) fn back(&self) -> Option<Handle> {
        self.tail
    }

    /// Links an unlinked entry at the front of the list.
    pub(crate) fn push_front<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) {
        let old_head = self.head;
        if let Some(link) = link_mut(store, handle) {
            *link = Link {
                prev: None,
                next: old_head,
            };
        } else {
            debug_assert!(false, "push_front of dead handle {handle:?}");
            return;
        }
        match old_head {
            Some(old) => {
                if let Some(link) = link_mut(store, old) {
                    link.prev = Some(handle);
                }
            }
            None => self.tail = Some(handle),
        }
        self.head = Some(handle);
        self.len += 1;
    }

    /// Detaches an entry from the list and clears its links.
    ///
    /// The entry stays in the store. Returns false if the handle is dead.
    pub(crate) fn unlink<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) -> bool {
        let Link { prev, next } = match link_mut(store, handle) {
            Some(link) => core::mem::take(link),
            None => return false,
        };

        match prev {
            Some(p) => {
                if let Some(link) = link_mut(store, p) {
                    link.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(link) = link_mut(store, n) {
                    link.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        self.len -= 1;
        true
    }

    /// Detaches and returns the last handle, if any.
    pub(crate) fn pop_back<K, V>(&mut self, store: &mut EntryStore<K, V>) -> Option<Handle> {
        let tail = self.tail?;
        self.unlink(store, tail);
        Some(tail)
    }

    /// Moves a linked entry to the front of the list.
    pub(crate) fn move_to_front<K, V>(&mut self, store: &mut EntryStore<K, V>, handle: Handle) {
        if self.head == Some(handle) {
            return;
        }
        if self.unlink(store, handle) {
            self.push_front(store, handle);
        }
    }

    /// Forgets all links without touching the store.
    ///
    /// Only valid when the store is cleared at the same time.
    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// Iterates handles from front to back.
    pub(crate) fn iter<'a, K, V>(&self, store: &'a EntryStore<K, V>) -> Iter<'a, K, V> {
        Iter {
            store,
            current: self.head,
            remaining: self.len,
        }
    }
}

#[inline]
fn link_mut<K, V>(store: &mut EntryStore<K, V>, handle: Handle) -> Option<&mut Link> {
    store.get_mut(handle).map(|entry| &mut entry.link)
}

/// Front-to-back iterator over the handles of an [`IndexList`].
pub(crate) struct Iter<'a, K, V> {
    store: &'a EntryStore<K, V>,
    current: Option<Handle>,
    remaining: usize,
}

impl<K, V> Iterator for Iter<'_, K, V> {
    type Item = Handle;

    fn next(&mut self) -> Option<Handle> {
        if self.remaining == 0 {
            return None;
        }
        let handle = self.current?;
        self.current = self.store.get(handle).and_then(|entry| entry.link.next);
        self.remaining -= 1;
        Some(handle)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
