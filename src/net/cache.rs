//! Time-bounded response cache.
//!
//! Entries are keyed by the exact endpoint string and hold the parsed JSON
//! payload behind an `Arc`, so a cache hit hands back the very same payload
//! object the miss stored. Entries are never evicted; a read simply ignores
//! anything older than the TTL and the next successful fetch supersedes it.
//!
//! Timestamps come from `tokio::time::Instant`, which lets tests drive expiry
//! with a paused clock.

use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct CacheEntry {
    payload: Arc<Value>,
    stored_at: Instant,
}

/// Endpoint → payload cache owned by one [`HttpClient`](super::HttpClient).
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    /// Creates an empty cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Freshness window of every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the payload for `key` if it was stored less than one TTL ago.
    pub fn get(&self, key: &str) -> Option<Arc<Value>> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.payload))
    }

    /// Stores `payload` under `key`, replacing whatever was there.
    pub fn insert(&self, key: impl Into<String>, payload: Arc<Value>) {
        self.entries.lock().insert(
            key.into(),
            CacheEntry {
                payload,
                stored_at: Instant::now(),
            },
        );
    }

    /// Finds a cached upstream record satisfying `predicate`.
    ///
    /// Looks at the `data` member of every cached payload, whether it is a
    /// single record (`/manga/{id}/full`) or a list of them (`/manga?...`).
    /// Age is not checked: a stale record is still a better cover source than
    /// a placeholder.
    pub fn find_record<F>(&self, predicate: F) -> Option<Value>
    where
        F: Fn(&Value) -> bool,
    {
        let entries = self.entries.lock();
        entries.values().find_map(|entry| match entry.payload.get("data") {
            Some(Value::Array(records)) => records.iter().find(|r| predicate(*r)).cloned(),
            Some(record @ Value::Object(_)) if predicate(record) => Some(record.clone()),
            _ => None,
        })
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
