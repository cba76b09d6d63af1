//! Time-to-live response cache.
//!
//! Entries are keyed by string and expire lazily: an entry is only evicted
//! when a read finds it stale. There is no size bound and no background
//! sweeper. Time comes from an injected [`mockable::Clock`] so expiry is
//! testable without sleeping.
//!
//! ```text
//!   cached_call(key, fetch, force)
//!          │
//!          ├── !force && fresh entry ──▶ return clone          (no fetch)
//!          │
//!          └── fetch().await
//!                 ├── Ok(v)  ──▶ store (v, now) ──▶ return v
//!                 └── Err(e) ──▶ return e                      (nothing stored)
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

/// In-memory cache whose entries expire after a fixed time-to-live.
///
/// The cache is internally synchronised; the lock is never held across an
/// `.await`, so concurrent misses for the same key may both fetch. The last
/// writer wins.
pub struct ResponseCache<V> {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V> std::fmt::Debug for ResponseCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("len", &self.lock().len())
            .finish_non_exhaustive()
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Creates an empty cache.
    ///
    /// A `ttl` too large to represent is treated as "never expires".
    #[must_use]
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl: TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX),
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Stores `value` under `key`, replacing any previous entry.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            stored_at: self.clock.utc(),
        };
        self.lock().insert(key.into(), entry);
    }

    /// Returns a fresh value for `key`, evicting it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.utc();
        let mut entries = self.lock();
        let entry = entries.get(key)?;
        if self.is_expired(entry, now) {
            entries.remove(key);
            tracing::debug!(key, "cache entry expired");
            return None;
        }
        Some(entry.value.clone())
    }

    /// Removes the entry for `key`, if any.
    pub fn delete(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// success.
    ///
    /// With `force_refresh` the cache is bypassed for the read but the fresh
    /// result still replaces the entry. Failures are returned unchanged and
    /// never cached.
    ///
    /// # Errors
    ///
    /// Returns whatever error `fetch` produced.
    pub async fn cached_call<F, Fut, E>(&self, key: &str, fetch: F, force_refresh: bool) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if !force_refresh {
            if let Some(value) = self.get(key) {
                tracing::debug!(key, "cache hit");
                return Ok(value);
            }
        }

        tracing::debug!(key, force_refresh, "cache miss");
        let value = fetch().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    fn is_expired(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(entry.stored_at) > self.ttl
    }
}

impl<V> ResponseCache<V> {
    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // A poisoned map holds only fully inserted entries.
        self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn cache_with_clock(ttl_ms: u64) -> (ResponseCache<Vec<u32>>, Arc<MutableClock>) {
        let clock = Arc::new(MutableClock::epoch());
        let cache = ResponseCache::new(Duration::from_millis(ttl_ms), clock.clone());
        (cache, clock)
    }

    #[test]
    fn entry_is_fresh_until_ttl_passes() {
        let (cache, clock) = cache_with_clock(1000);
        cache.set("products", vec![1, 2]);

        clock.advance_millis(999);
        assert_eq!(cache.get("products"), Some(vec![1, 2]));

        clock.advance_millis(1);
        assert_eq!(cache.get("products"), Some(vec![1, 2]), "age equal to ttl is still fresh");

        clock.advance_millis(1);
        assert_eq!(cache.get("products"), None);
        assert!(cache.is_empty(), "stale read evicts the entry");
    }

    #[test]
    fn missing_key_is_none() {
        let (cache, _clock) = cache_with_clock(1000);
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn clear_removes_everything() {
        let (cache, _clock) = cache_with_clock(1000);
        cache.set("a", vec![1]);
        cache.set("b", vec![2]);
        cache.clear();
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn cached_call_fetches_once_while_fresh() {
        let (cache, clock) = cache_with_clock(1000);
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(vec![7])
        };

        assert_eq!(cache.cached_call("k", fetch, false).await, Ok(vec![7]));
        assert_eq!(cache.cached_call("k", fetch, false).await, Ok(vec![7]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        clock.advance_millis(1001);
        assert_eq!(cache.cached_call("k", fetch, false).await, Ok(vec![7]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_and_replaces() {
        let (cache, _clock) = cache_with_clock(1000);
        cache.set("k", vec![1]);

        let result = cache
            .cached_call("k", || async { Ok::<_, String>(vec![2]) }, true)
            .await;
        assert_eq!(result, Ok(vec![2]));
        assert_eq!(cache.get("k"), Some(vec![2]));
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let (cache, _clock) = cache_with_clock(1000);
        let result = cache
            .cached_call("k", || async { Err::<Vec<u32>, _>("boom".to_string()) }, false)
            .await;
        assert_eq!(result, Err("boom".to_string()));
        assert!(cache.is_empty());
    }
}
