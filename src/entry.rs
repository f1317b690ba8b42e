//! Arena Entry Type
//!
//! One `Entry` exists per key the cache tracks, whether the key is resident
//! (probationary or protected) or only remembered (ghost). The entry carries
//! the queue links inline, so moving a key between queues never touches the
//! payload and never reallocates.
//!
//! # Memory Layout
//!
//! - `key: K` - user's key type, duplicated in the key index
//! - `value: Option<V>` - `None` exactly when the entry is a ghost
//! - `queue: QueueKind` - 1 byte (+ padding)
//! - `link: Link` - two optional handles
//!
//! Base overhead: ~40 bytes + key + value.

use crate::meta::QueueKind;
use crate::store::Handle;
use core::fmt;

/// Intrusive list links stored inside each entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Link {
    /// Neighbour towards the front (newest / most recently used).
    pub(crate) prev: Option<Handle>,
    /// Neighbour towards the back (oldest / least recently used).
    pub(crate) next: Option<Handle>,
}

/// A tracked key, its payload (if resident), and its queue placement.
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: Option<V>,
    pub(crate) queue: QueueKind,
    pub(crate) link: Link,
}

impl<K, V> Entry<K, V> {
    /// Creates an unlinked resident entry for a probationary admission.
    #[inline]
    pub(crate) fn probationary(key: K, value: V) -> Self {
        Self {
            key,
            value: Some(value),
            queue: QueueKind::Probationary,
            link: Link::default(),
        }
    }

    /// Drops the payload and retags the entry as a ghost.
    ///
    /// Returns the discarded value.
    #[inline]
    pub(crate) fn demote_to_ghost(&mut self) -> Option<V> {
        self.queue = QueueKind::Ghost;
        self.value.take()
    }

    /// Installs a payload and retags the entry as protected.
    ///
    /// Returns the previous value, if the entry was resident.
    #[inline]
    pub(crate) fn protect(&mut self, value: V) -> Option<V> {
        self.queue = QueueKind::Protected;
        self.value.replace(value)
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Entry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("key", &self.key)
            .field("value", &self.value)
            .field("queue", &self.queue)
            .finish()
    }
}
