//! Stores that keep the most recently recorded tokens.
//!
//! [`RecentStore`] is the capability the producer writes to and the service
//! reads from. [`MemoryStore`] is the in-process implementation; other
//! backends can be plugged into [`ValuesService`](crate::ValuesService)
//! without touching it.

mod memory;

pub use memory::{HistoryLimit, MemoryStore};

use crate::{error::Result, token::Token};

/// A concurrency-safe store of (key, token) entries that tracks the two most
/// recent insertions.
pub trait RecentStore: Send + Sync {
    /// Record `value` under `key`.
    ///
    /// Re-using a key overwrites the stored token and still counts as the
    /// newest insertion.
    fn insert(&self, key: String, value: Token) -> Result<()>;

    /// The two most recent tokens as `[older, newer]`.
    ///
    /// # Errors
    ///
    /// - [`Error::InsufficientEntries`](crate::Error::InsufficientEntries)
    ///   before the second insertion.
    /// - [`Error::MissingReference`](crate::Error::MissingReference) if a
    ///   tracked key no longer resolves.
    fn latest_two(&self) -> Result<[Token; 2]>;

    /// Number of entries currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
