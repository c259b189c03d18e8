//! In-memory [`RecentStore`].

use super::RecentStore;
use crate::{
    error::{Error, Result},
    token::Token,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// How much insertion history a [`MemoryStore`] keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HistoryLimit {
    /// Keep every entry for the life of the store.
    #[default]
    Unbounded,
    /// Keep at most this many distinct keys, evicting the oldest first.
    /// Must be at least 2.
    Bounded(usize),
}

impl HistoryLimit {
    /// Reject a bounded limit below 2, which could evict a tracked entry.
    pub fn validate(self) -> Result<Self> {
        match self {
            Self::Bounded(max) if max < 2 => Err(Error::invalid_config(format!(
                "history limit must be at least 2, got {max}"
            ))),
            limit => Ok(limit),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<String, Token>,
    // Insertion order of keys, only maintained for bounded stores.
    order: VecDeque<String>,
    oldest_of_two: Option<String>,
    newest_of_two: Option<String>,
}

/// A [`RecentStore`] backed by a `HashMap` behind a single mutex.
///
/// Every insert and read runs inside one lock acquisition, so readers never
/// see the two tracked keys half-shifted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    limit: HistoryLimit,
}

impl MemoryStore {
    /// A store that retains its full history.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the given history limit.
    ///
    /// Returns [`Error::InvalidConfig`] for a bounded limit below 2, which
    /// could evict a tracked entry.
    pub fn with_limit(limit: HistoryLimit) -> Result<Self> {
        Ok(Self {
            inner: Mutex::default(),
            limit: limit.validate()?,
        })
    }

    pub fn limit(&self) -> HistoryLimit {
        self.limit
    }
}

impl RecentStore for MemoryStore {
    fn insert(&self, key: String, value: Token) -> Result<()> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let replaced = inner.entries.insert(key.clone(), value).is_some();

        if let HistoryLimit::Bounded(max) = self.limit {
            if replaced {
                if let Some(pos) = inner.order.iter().position(|k| *k == key) {
                    inner.order.remove(pos);
                }
            }
            inner.order.push_back(key.clone());
            while inner.order.len() > max {
                if let Some(evicted) = inner.order.pop_front() {
                    inner.entries.remove(&evicted);
                }
            }
        }

        if let Some(previous) = inner.newest_of_two.replace(key) {
            inner.oldest_of_two = Some(previous);
        }

        Ok(())
    }

    fn latest_two(&self) -> Result<[Token; 2]> {
        let inner = self.inner.lock();

        let (Some(oldest), Some(newest)) = (&inner.oldest_of_two, &inner.newest_of_two) else {
            return Err(Error::InsufficientEntries);
        };

        let resolve = |key: &String| {
            inner.entries.get(key).cloned().ok_or_else(|| {
                tracing::error!(key = %key, "tracked key missing from store");
                Error::MissingReference { key: key.clone() }
            })
        };

        Ok([resolve(oldest)?, resolve(newest)?])
    }

    fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }
}
