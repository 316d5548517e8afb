use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::YieldbookResult;

/// Freshness window of the local-storage feed cache.
pub const LOCAL_STORAGE_TTL: Duration = Duration::from_secs(2 * 60);

/// Freshness window of the Cache-API feed cache.
pub const CACHE_API_TTL: Duration = Duration::from_secs(5 * 60);

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A cached feed payload and when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    pub fn is_fresh(&self, clock: &impl Clock, ttl: Duration) -> bool {
        self.is_fresh_at(clock.now(), ttl)
    }

    /// An entry stamped in the future (clock skew) counts as fresh.
    pub fn is_fresh_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.fetched_at).to_std() {
            Ok(age) => age < ttl,
            Err(_) => true,
        }
    }
}

/// Feed payloads keyed by storage key, served while younger than `ttl`.
///
/// Stale entries are not returned but stay in place until refreshed.
#[derive(Debug, Clone)]
pub struct FeedCache<T> {
    ttl: Duration,
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T> FeedCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get_fresh(&self, key: &str, clock: &impl Clock) -> Option<&T> {
        let now = clock.now();
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh_at(now, self.ttl))
            .map(|entry| &entry.value)
    }

    pub fn insert(&mut self, key: &str, value: T, clock: &impl Clock) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                fetched_at: clock.now(),
            },
        );
    }

    /// Return the cached value for `key` if fresh, otherwise call `fetch`
    /// and cache its result. A failed fetch leaves any stale entry untouched.
    pub fn get_or_fetch<F>(&mut self, key: &str, clock: &impl Clock, fetch: F) -> YieldbookResult<&T>
    where
        F: FnOnce() -> YieldbookResult<T>,
    {
        let now = clock.now();
        let ttl = self.ttl;

        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().is_fresh_at(now, ttl) {
                    debug!(key, "feed cache hit");
                } else {
                    debug!(key, "feed cache stale, refetching");
                    occupied.insert(CacheEntry {
                        value: fetch()?,
                        fetched_at: now,
                    });
                }
                Ok(&occupied.into_mut().value)
            }
            Entry::Vacant(vacant) => {
                debug!(key, "feed cache miss");
                let entry = vacant.insert(CacheEntry {
                    value: fetch()?,
                    fetched_at: now,
                });
                Ok(&entry.value)
            }
        }
    }
}
