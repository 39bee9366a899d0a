//! Bounded, time-expiring response cache.
//!
//! - capacity bound: least-recently-used entry is evicted first, where a hit
//!   counts as a use
//! - TTL bound: an entry expires `ttl` after it was written; expired entries
//!   are never returned and are dropped when touched or when space is needed
//!
//! Thread-safe via a single `Mutex` guarding both the entry map and the
//! recency index, so every operation updates them as one unit.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::interface::ResolvedInterface;

/// Cache sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of resident entries.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Time-to-live per entry, in seconds.
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
}

fn default_capacity() -> usize { 500 }
fn default_ttl_secs() -> u64 { 600 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            ttl_secs: default_ttl_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

struct Slot<V> {
    value: Arc<V>,
    expires_at: Instant,
    last_used: u64,
}

struct Inner<V> {
    entries: HashMap<String, Slot<V>>,
    /// last_used tick → key; the first entry is the LRU candidate.
    recency: BTreeMap<u64, String>,
    tick: u64,
}

impl<V> Inner<V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, key: &str) -> Option<Slot<V>> {
        let slot = self.entries.remove(key)?;
        self.recency.remove(&slot.last_used);
        Some(slot)
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, slot)| slot.expires_at <= now)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    fn evict_lru(&mut self) -> Option<String> {
        let (_, key) = self.recency.pop_first()?;
        self.entries.remove(&key);
        Some(key)
    }
}

/// LRU + TTL cache keyed by `chainId:address`.
pub struct ResponseCache<V = ResolvedInterface> {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner<V>>,
}

impl<V> ResponseCache<V> {
    pub fn new(config: &CacheConfig) -> Self {
        Self::with_limits(config.capacity, config.ttl())
    }

    pub fn with_limits(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                recency: BTreeMap::new(),
                tick: 0,
            }),
        }
    }

    /// Live entry for `key`, marking it as most recently used.
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.get_at(key, Instant::now())
    }

    /// Insert or replace, restarting the entry's TTL.
    pub fn set(&self, key: impl Into<String>, value: V) -> Arc<V> {
        self.set_at(key.into(), value, Instant::now())
    }

    /// Number of resident entries, including expired ones not yet dropped.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get_at(&self, key: &str, now: Instant) -> Option<Arc<V>> {
        let mut inner = self.inner.lock().unwrap();
        let expired = inner.entries.get(key)?.expires_at <= now;
        if expired {
            inner.remove(key);
            return None;
        }
        let tick = inner.next_tick();
        let slot = inner.entries.get_mut(key)?;
        let previous = std::mem::replace(&mut slot.last_used, tick);
        let value = Arc::clone(&slot.value);
        inner.recency.remove(&previous);
        inner.recency.insert(tick, key.to_string());
        Some(value)
    }

    fn set_at(&self, key: String, value: V, now: Instant) -> Arc<V> {
        let value = Arc::new(value);
        let mut inner = self.inner.lock().unwrap();
        inner.remove(&key);
        let tick = inner.next_tick();
        inner.recency.insert(tick, key.clone());
        inner.entries.insert(
            key,
            Slot {
                value: Arc::clone(&value),
                expires_at: now + self.ttl,
                last_used: tick,
            },
        );

        if inner.entries.len() > self.capacity {
            inner.purge_expired(now);
        }
        while inner.entries.len() > self.capacity {
            match inner.evict_lru() {
                Some(evicted) => tracing::debug!(key = %evicted, "cache entry evicted"),
                None => break,
            }
        }
        value
    }
}
