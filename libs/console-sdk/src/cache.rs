//! Process-wide query cache.
//!
//! Entries are content-addressed by [`CacheKey`] (logical list name plus the
//! canonical query string) and hold type-erased values, so one cache serves
//! every list in the console.
//!
//! Each key has a single writer at a time: [`QueryCache::begin_fetch`] hands
//! out a [`FetchTicket`], and only the most recent ticket for a key may store
//! a result. Responses for superseded tickets are dropped.

use parking_lot::RwLock;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::broadcast;

const INVALIDATION_CAPACITY: usize = 64;

/// Identity of a cached list query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    list: Arc<str>,
    query: String,
}

impl CacheKey {
    pub fn new(list: impl Into<Arc<str>>, query: impl Into<String>) -> Self {
        Self {
            list: list.into(),
            query: query.into(),
        }
    }

    #[must_use]
    pub fn list(&self) -> &str {
        &self.list
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}?{}", self.list, self.query)
    }
}

/// Permission to write the result of one fetch for one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    key: CacheKey,
    seq: u64,
}

impl FetchTicket {
    #[must_use]
    pub fn key(&self) -> &CacheKey {
        &self.key
    }
}

/// A cached value together with its freshness.
#[derive(Debug)]
pub struct Cached<V> {
    pub value: Arc<V>,
    pub updated_at: Instant,
    pub stale: bool,
}

#[derive(Default)]
struct CacheEntry {
    value: Option<Arc<dyn Any + Send + Sync>>,
    updated_at: Option<Instant>,
    stale: bool,
    in_flight: Option<u64>,
}

pub struct QueryCache {
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
    next_seq: AtomicU64,
    invalidations: broadcast::Sender<Arc<str>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    #[must_use]
    pub fn new() -> Self {
        let (invalidations, _) = broadcast::channel(INVALIDATION_CAPACITY);
        Self {
            entries: RwLock::new(HashMap::new()),
            next_seq: AtomicU64::new(1),
            invalidations,
        }
    }

    /// Look up a value. Returns `None` if absent or stored with another type.
    #[must_use]
    pub fn get<V>(&self, key: &CacheKey) -> Option<Cached<V>>
    where
        V: Send + Sync + 'static,
    {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        let value = Arc::clone(entry.value.as_ref()?).downcast::<V>().ok()?;
        Some(Cached {
            value,
            updated_at: entry.updated_at?,
            stale: entry.stale,
        })
    }

    /// Register a new fetch for `key`, superseding any fetch still in flight.
    pub fn begin_fetch(&self, key: &CacheKey) -> FetchTicket {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.entries.write().entry(key.clone()).or_default().in_flight = Some(seq);
        FetchTicket {
            key: key.clone(),
            seq,
        }
    }

    #[must_use]
    pub fn is_in_flight(&self, key: &CacheKey) -> bool {
        self.entries
            .read()
            .get(key)
            .is_some_and(|e| e.in_flight.is_some())
    }

    /// Store a successful result. Returns `false` if the ticket was superseded.
    pub fn complete<V>(&self, ticket: &FetchTicket, value: Arc<V>) -> bool
    where
        V: Send + Sync + 'static,
    {
        let mut entries = self.entries.write();
        let Some(entry) = entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.in_flight != Some(ticket.seq) {
            tracing::debug!(key = %ticket.key, "dropping result of superseded fetch");
            return false;
        }
        entry.value = Some(value);
        entry.updated_at = Some(Instant::now());
        entry.stale = false;
        entry.in_flight = None;
        true
    }

    /// Record a failed fetch. Any previous value stays in place.
    pub fn fail(&self, ticket: &FetchTicket) -> bool {
        let mut entries = self.entries.write();
        match entries.get_mut(&ticket.key) {
            Some(entry) if entry.in_flight == Some(ticket.seq) => {
                entry.in_flight = None;
                true
            }
            _ => false,
        }
    }

    /// Mark every entry of `list` stale and notify subscribers.
    ///
    /// Fetches in flight at this point can no longer write: their data
    /// predates the change that caused the invalidation.
    pub fn invalidate(&self, list: &str) -> usize {
        let mut marked = 0;
        for (key, entry) in self.entries.write().iter_mut() {
            if key.list() == list {
                entry.stale = true;
                entry.in_flight = None;
                marked += 1;
            }
        }
        // No subscribers is fine: nothing is mounted.
        let _ = self.invalidations.send(Arc::from(list));
        tracing::debug!(list, entries = marked, "invalidated list queries");
        marked
    }

    /// Receive the names of invalidated lists.
    #[must_use]
    pub fn subscribe_invalidations(&self) -> broadcast::Receiver<Arc<str>> {
        self.invalidations.subscribe()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
