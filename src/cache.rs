//! Keyed query cache shared by every resource of one `DataContext`.
//!
//! Reads consult [`QueryCache::lookup`]; on a miss they call
//! [`QueryCache::begin_fetch`]. The first miss for a key leads the fetch and
//! holds a [`FetchTicket`]; misses that arrive while it is outstanding follow
//! it through an [`InFlight`] handle instead of issuing their own request.
//! Invalidation removes matching entries and revokes outstanding tickets for
//! matching keys, so a read that was already in flight when a mutation landed
//! cannot write its now-stale response back into the cache. Followers of a
//! revoked or failed fetch are woken empty and retry.
//!
//! Entries older than the cache time are dropped whenever a fetch completes.

use crate::query::{KeyFilter, QueryKey};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

#[derive(Clone, Debug)]
pub struct QueryCache {
    inner: Arc<RwLock<Inner>>,
    stale_time: Duration,
    cache_time: Duration,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    /// The outstanding fetch per key, if any.
    in_flight: HashMap<QueryKey, Flight>,
    next_ticket: u64,
}

#[derive(Debug)]
struct Entry {
    value: Value,
    fetched_at: Instant,
}

#[derive(Debug)]
struct Flight {
    ticket: u64,
    done: watch::Sender<Option<Value>>,
}

/// Outcome of a cache miss.
#[derive(Debug)]
pub enum Fetch {
    /// No fetch is outstanding: issue the request and settle the ticket.
    Lead(FetchTicket),
    /// Another caller is already fetching this key.
    Follow(InFlight),
}

/// Proof that a fetch for `key` started after the last invalidation touching it.
/// Dropping an unsettled ticket abandons the fetch.
#[derive(Debug)]
#[must_use = "a ticket must be completed or abandoned"]
pub struct FetchTicket {
    key: QueryKey,
    id: u64,
    inner: Arc<RwLock<Inner>>,
    settled: bool,
}

impl FetchTicket {
    pub fn key(&self) -> &QueryKey {
        &self.key
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        if !self.settled {
            let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            take_flight(&mut inner, &self.key, self.id);
        }
    }
}

/// Handle on someone else's fetch.
#[derive(Debug)]
pub struct InFlight {
    rx: watch::Receiver<Option<Value>>,
}

impl InFlight {
    /// The leader's response, or `None` when its fetch failed or was revoked.
    pub async fn wait(mut self) -> Option<Value> {
        loop {
            let current = self.rx.borrow().clone();
            if current.is_some() {
                return current;
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}

impl QueryCache {
    /// `cache_time` is how long an entry is kept at all; it never drops below
    /// `stale_time`.
    pub fn new(stale_time: Duration, cache_time: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            stale_time,
            cache_time: cache_time.max(stale_time),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.stale_time
    }

    pub fn cache_time(&self) -> Duration {
        self.cache_time
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached value for `key` if it is still inside the freshness window.
    pub fn lookup(&self, key: &QueryKey) -> Option<Value> {
        let inner = self.read();
        let entry = inner.entries.get(key)?;
        if entry.fetched_at.elapsed() < self.stale_time {
            tracing::debug!(key = %key, "cache hit");
            Some(entry.value.clone())
        } else {
            tracing::debug!(key = %key, "cache entry stale");
            None
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.read().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Lead a new fetch for `key`, or follow the one already outstanding.
    pub fn begin_fetch(&self, key: &QueryKey) -> Fetch {
        let mut inner = self.write();
        if let Some(flight) = inner.in_flight.get(key) {
            return Fetch::Follow(InFlight {
                rx: flight.done.subscribe(),
            });
        }
        inner.next_ticket += 1;
        let id = inner.next_ticket;
        let (done, _) = watch::channel(None);
        inner.in_flight.insert(key.clone(), Flight { ticket: id, done });
        Fetch::Lead(FetchTicket {
            key: key.clone(),
            id,
            inner: Arc::clone(&self.inner),
            settled: false,
        })
    }

    /// Store the response of a fetch and hand it to its followers. Returns
    /// false, without writing, when an invalidation revoked the ticket while
    /// the request was in flight.
    pub fn complete_fetch(&self, mut ticket: FetchTicket, value: Value) -> bool {
        ticket.settled = true;
        let mut inner = self.write();
        let Some(flight) = take_flight(&mut inner, &ticket.key, ticket.id) else {
            tracing::warn!(key = %ticket.key, "discarding response invalidated while in flight");
            return false;
        };
        let _ = flight.done.send(Some(value.clone()));
        self.collect_expired(&mut inner);
        inner.entries.insert(
            ticket.key.clone(),
            Entry {
                value,
                fetched_at: Instant::now(),
            },
        );
        true
    }

    /// Release a ticket whose fetch failed. Followers are woken empty.
    pub fn abandon(&self, ticket: FetchTicket) {
        drop(ticket);
    }

    /// Remove every entry under `prefix` matched by `filter` and revoke matching
    /// in-flight tickets. Returns the number of evicted entries.
    pub fn invalidate(&self, prefix: &str, filter: &KeyFilter) -> usize {
        let mut inner = self.write();
        let hit = |k: &QueryKey| k.prefix == prefix && filter.matches(k);
        let before = inner.entries.len();
        inner.entries.retain(|k, _| !hit(k));
        let evicted = before - inner.entries.len();
        inner.in_flight.retain(|k, _| !hit(k));
        tracing::info!(prefix = %prefix, filter = ?filter, evicted, "cache invalidated");
        evicted
    }

    /// Drop entries older than the cache time. Returns how many were dropped.
    pub fn collect_garbage(&self) -> usize {
        let mut inner = self.write();
        self.collect_expired(&mut inner)
    }

    fn collect_expired(&self, inner: &mut Inner) -> usize {
        let before = inner.entries.len();
        let cache_time = self.cache_time;
        inner
            .entries
            .retain(|_, entry| entry.fetched_at.elapsed() < cache_time);
        let collected = before - inner.entries.len();
        if collected > 0 {
            tracing::debug!(collected, "expired cache entries dropped");
        }
        collected
    }

    pub fn clear(&self) {
        let mut inner = self.write();
        inner.entries.clear();
        inner.in_flight.clear();
    }
}

/// Remove the flight for `key` if it still belongs to ticket `id`.
fn take_flight(inner: &mut Inner, key: &QueryKey, id: u64) -> Option<Flight> {
    let owned = inner.in_flight.get(key).is_some_and(|f| f.ticket == id);
    if owned {
        inner.in_flight.remove(key)
    } else {
        None
    }
}
