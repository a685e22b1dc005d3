use async_trait::async_trait;
use dashmap::DashMap;
use jiff::{SignedDuration, Timestamp};
use portal_core::store::{Result, Store};
use portal_core::{Clock, StoreError, SystemClock};
use std::time::Duration;
use tracing::trace;

/// In-memory storage entry.
#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expire_at: Option<Timestamp>,
}

impl Entry {
    fn is_expired(&self, now: Timestamp) -> bool {
        self.expire_at.is_some_and(|expire_at| now >= expire_at)
    }
}

/// In-memory implementation of the [`Store`] trait using DashMap.
///
/// Expired entries are evicted lazily when read. Time comes from the
/// injected [`Clock`], so tests can expire entries without sleeping.
#[derive(Debug)]
pub struct InMemoryStore<C = SystemClock> {
    storage: DashMap<String, Entry>,
    clock: C,
}

impl InMemoryStore<SystemClock> {
    /// Creates a new in-memory store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for InMemoryStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            storage: DashMap::new(),
            clock,
        }
    }

    /// Number of entries currently held, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn expire_at(&self, ttl: Duration) -> Result<Option<Timestamp>> {
        if ttl.is_zero() {
            return Ok(None);
        }
        let ttl = SignedDuration::try_from(ttl)
            .map_err(|e| StoreError::Operation(format!("invalid ttl {ttl:?}: {e}")))?;
        self.clock
            .now()
            .checked_add(ttl)
            .map(Some)
            .map_err(|e| StoreError::Operation(format!("ttl out of range: {e}")))
    }

    /// Returns the live value for `key`, evicting it if it has expired.
    fn live_value(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        if self
            .storage
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            trace!(key = %key, "Evicted expired entry");
            return None;
        }
        self.storage.get(key).map(|entry| entry.value.clone())
    }
}

#[async_trait]
impl<C: Clock> Store for InMemoryStore<C> {
    async fn incr(&self, key: &str) -> Result<i64> {
        let now = self.clock.now();
        // The entry guard holds the shard lock, making read-modify-write atomic.
        let mut entry = self.storage.entry(key.to_owned()).or_insert_with(|| Entry {
            value: "0".to_string(),
            expire_at: None,
        });
        if entry.is_expired(now) {
            *entry = Entry {
                value: "0".to_string(),
                expire_at: None,
            };
        }

        let current = entry.value.parse::<i64>().map_err(|_| {
            StoreError::InvalidData(format!("value at '{key}' is not an integer"))
        })?;
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidData(format!("increment of '{key}' overflows")))?;
        entry.value = next.to_string();
        Ok(next)
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.live_value(key))
    }

    async fn get_int(&self, key: &str) -> Result<i64> {
        match self.live_value(key) {
            Some(value) => value.parse::<i64>().map_err(|_| {
                StoreError::InvalidData(format!("value at '{key}' is not an integer"))
            }),
            None => Ok(0),
        }
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expire_at = self.expire_at(ttl)?;
        self.storage.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expire_at,
            },
        );
        Ok(())
    }
}
