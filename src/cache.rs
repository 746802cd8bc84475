use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

struct StoredEntry<T> {
    value: T,
    expires_at: Instant,
}

/// In-memory key/value store with per-entry expiry.
///
/// Each resolver owns its own cache; nothing is shared between components or
/// persisted across restarts.
pub struct TtlCache<T> {
    name: &'static str,
    ttl: Duration,
    entries: Mutex<HashMap<String, StoredEntry<T>>>,
}

impl<T: Clone + Debug> TtlCache<T> {
    #[must_use]
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        Self {
            name,
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, StoredEntry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores a value with the cache's default time-to-live.
    pub fn put(&self, key: &str, value: T) {
        self.put_with_ttl(key, value, self.ttl);
    }

    #[tracing::instrument(name = "put_cache", level = "debug", skip(self, value), fields(cache = self.name))]
    pub fn put_with_ttl(&self, key: &str, value: T, ttl: Duration) {
        let entry = StoredEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.lock().insert(key.to_string(), entry);
    }

    /// Retrieves a value if it exists and has not expired.
    /// Returns `None` for cache misses or expired entries.
    #[tracing::instrument(name = "query_cache", level = "debug", skip(self), fields(cache = self.name))]
    pub fn get(&self, key: &str) -> Option<T> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some(entry) if Instant::now() < entry.expires_at => {
                tracing::debug!("Key found and still fresh");
                Some(entry.value.clone())
            }
            Some(_) => {
                tracing::debug!("Key found but expired");
                entries.remove(key);
                None
            }
            None => {
                tracing::debug!("Key not found");
                None
            }
        }
    }

    /// Manually removes a key from the cache.
    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Number of stored entries, expired ones included until they are next read
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
