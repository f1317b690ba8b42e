//! Queue Membership Metadata
//!
//! Every key tracked by a 2Q cache lives in exactly one queue. The queue tag is stored next to the entry in the arena so the controller can
//! decide the transition for a key with a single index lookup.
//!
//! | Queue          | Holds value | Order | Eviction target           |
//! |----------------|-------------|-------|---------------------------|
//! | `Probationary` | yes         | FIFO  | oldest → `Ghost`          |
//! | `Protected`    | yes         | LRU   | least recent → forgotten  |
//! | `Ghost`        | no          | FIFO  | oldest → forgotten        |
//! | `Pending`      | no          | FIFO  | oldest → forgotten        |
//!
//! A lookup that finds a ghost key moves it to `Pending`: still a miss, but
//! the next write admits the key straight into `Protected`.
//!
//! ```
//! use twoq_cache::meta::QueueKind;
//!
//! assert!(QueueKind::Protected.is_resident());
//! assert!(!QueueKind::Ghost.is_resident());
//! ```

use core::fmt;

/// The queue an entry currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueKind {
    /// A1-in: keys seen once recently, first-in first-out.
    Probationary,
    /// Am: keys proven to recur, least recently used at the back.
    Protected,
    /// A1-out: keys recently evicted from probationary, value discarded.
    Ghost,
    /// Ghost keys read since eviction; the next write goes to `Protected`.
    Pending,
}

impl QueueKind {
    /// Returns `true` if entries in this queue hold a value.
    #[inline]
    pub fn is_resident(self) -> bool {
        matches!(self, QueueKind::Probationary | QueueKind::Protected)
    }

    /// Short name used in logs and metrics keys.
    #[inline]
    pub fn as_str(self) -> &'static str {
        match self {
            QueueKind::Probationary => "probationary",
            QueueKind::Protected => "protected",
            QueueKind::Ghost => "ghost",
            QueueKind::Pending => "pending",
        }
    }
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
