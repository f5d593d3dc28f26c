//! Cache-Aside Module
//!
//! Read-through facade over a [`FastStore`] with explicit write-side
//! invalidation. Values are stored as JSON so any conforming store works.

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::entry::expiry_from_now;
use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheStats, FastStore, MemoryStore, MAX_KEY_LENGTH};
use crate::error::CacheError;

// == Lookup ==
/// Outcome of a loader call against the authoritative store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    /// The record exists; its value will be cached
    Found(V),
    /// The record does not exist; nothing is cached
    NotFound,
}

impl<V> From<Option<V>> for Lookup<V> {
    fn from(value: Option<V>) -> Self {
        match value {
            Some(v) => Lookup::Found(v),
            None => Lookup::NotFound,
        }
    }
}

// == Cache-Aside Store ==
/// Serves reads from the fast store, falling back to a loader on miss.
///
/// There is no single-flight: concurrent misses on the same key each call
/// their loader, and no lock is held while a loader runs.
#[derive(Debug)]
pub struct CacheAsideStore<S = MemoryStore> {
    store: S,
    stats: StatsRecorder,
}

impl<S: FastStore> CacheAsideStore<S> {
    // == Constructor ==
    pub fn new(store: S) -> Self {
        Self {
            store,
            stats: StatsRecorder::default(),
        }
    }

    /// The underlying fast store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // == Get ==
    /// Returns the value under `key`, loading and caching it on a miss.
    ///
    /// `Lookup::NotFound` from the loader yields `Ok(None)` and is never
    /// cached, so a record created later is seen on the next call. Any loader
    /// error is returned unchanged and nothing is cached.
    pub async fn get<V, E, F, Fut>(&self, key: &str, loader: F, ttl: Duration) -> Result<Option<V>, E>
    where
        V: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Lookup<V>, E>>,
    {
        validate_key(key)?;
        if ttl.is_zero() {
            return Err(CacheError::InvalidTtl(format!("TTL for '{}' must be positive", key)).into());
        }
        expiry_from_now(ttl)?;

        if let Some(raw) = self.store.get(key).await? {
            match serde_json::from_str::<V>(&raw) {
                Ok(value) => {
                    self.stats.record_hit();
                    debug!(key, "Cache hit");
                    return Ok(Some(value));
                }
                Err(err) => {
                    warn!(key, error = %err, "Discarding undecodable cache entry");
                    self.store.delete(key).await?;
                }
            }
        }

        self.stats.record_miss();
        debug!(key, "Cache miss, calling loader");

        match loader().await? {
            Lookup::Found(value) => {
                let raw = serde_json::to_string(&value)
                    .map_err(|e| CacheError::Serialization(format!("{}: {}", key, e)))?;
                self.store.set(key, raw, ttl).await?;
                self.stats.record_load();
                Ok(Some(value))
            }
            Lookup::NotFound => {
                self.stats.record_not_found();
                debug!(key, "Loader reported record not found");
                Ok(None)
            }
        }
    }

    // == Invalidate ==
    /// Drops any cached entry for `key`. Absent keys are not an error.
    pub async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let removed = self.store.delete(key).await?;
        self.stats.record_invalidation();
        debug!(key, removed, "Cache invalidated");
        Ok(())
    }

    // == Stats ==
    pub async fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.store.len().await)
    }
}

impl CacheAsideStore<MemoryStore> {
    /// Facade over a fresh in-process store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl Default for CacheAsideStore<MemoryStore> {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn validate_key(key: &str) -> Result<(), CacheError> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::future::{ready, Ready};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Barrier;

    const TTL: Duration = Duration::from_secs(300);

    #[derive(Debug, PartialEq)]
    enum TestError {
        Cache(CacheError),
        Backend(&'static str),
    }

    impl From<CacheError> for TestError {
        fn from(err: CacheError) -> Self {
            TestError::Cache(err)
        }
    }

    type Loaded<V> = Result<Lookup<V>, TestError>;

    /// Loader that counts its invocations and returns a fixed outcome.
    fn loader<'a, V: 'a>(calls: &'a AtomicUsize, result: Loaded<V>) -> impl FnOnce() -> Ready<Loaded<V>> + 'a {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            ready(result)
        }
    }

    fn ada() -> Value {
        json!({"id": 42, "name": "Ada"})
    }

    #[tokio::test]
    async fn test_miss_then_populate() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get("user:42", loader(&calls, Ok(Lookup::Found(ada()))), TTL)
            .await
            .unwrap();
        let second = cache
            .get("user:42", loader(&calls, Ok(Lookup::Found(json!("other")))), TTL)
            .await
            .unwrap();

        assert_eq!(first, Some(ada()));
        assert_eq!(second, Some(ada()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_triggers_reload() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        cache
            .get("problem:two-sum", loader(&calls, Ok(Lookup::Found(1u32))), TTL)
            .await
            .unwrap();

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        let hit = cache
            .get("problem:two-sum", loader(&calls, Ok(Lookup::Found(2u32))), TTL)
            .await
            .unwrap();
        assert_eq!(hit, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        let reloaded = cache
            .get("problem:two-sum", loader(&calls, Ok(Lookup::Found(2u32))), TTL)
            .await
            .unwrap();
        assert_eq!(reloaded, Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_user_42_scenario() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get("user:42", loader(&calls, Ok(Lookup::Found(ada()))), TTL)
            .await
            .unwrap();
        assert_eq!(first, Some(ada()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let second = cache
            .get("user:42", loader(&calls, Ok(Lookup::Found(ada()))), TTL)
            .await
            .unwrap();
        assert_eq!(second, Some(ada()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate("user:42").await.unwrap();
        let renamed = json!({"id": 42, "name": "Ada Lovelace"});
        let third = cache
            .get("user:42", loader(&calls, Ok(Lookup::Found(renamed.clone()))), TTL)
            .await
            .unwrap();
        assert_eq!(third, Some(renamed));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_never_cached() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        let missing: Option<Value> = cache
            .get("user:7", loader(&calls, Ok(Lookup::NotFound)), TTL)
            .await
            .unwrap();
        assert_eq!(missing, None);

        // Record created after the failed lookup is visible immediately
        let created = cache
            .get("user:7", loader(&calls, Ok(Lookup::Found(json!({"id": 7})))), TTL)
            .await
            .unwrap();
        assert_eq!(created, Some(json!({"id": 7})));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.stats().await.not_found, 1);
    }

    #[tokio::test]
    async fn test_loader_error_propagates_and_is_not_cached() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        let result: Result<Option<u32>, TestError> = cache
            .get("user:1", loader(&calls, Err(TestError::Backend("db down"))), TTL)
            .await;
        assert_eq!(result, Err(TestError::Backend("db down")));
        assert_eq!(cache.store().len().await, 0);

        let recovered = cache
            .get("user:1", loader(&calls, Ok(Lookup::Found(5u32))), TTL)
            .await
            .unwrap();
        assert_eq!(recovered, Some(5));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_falsy_values_are_hits() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        cache
            .get("zero", loader(&calls, Ok(Lookup::Found(0i64))), TTL)
            .await
            .unwrap();
        cache
            .get("empty", loader(&calls, Ok(Lookup::Found(String::new()))), TTL)
            .await
            .unwrap();
        cache
            .get("none", loader(&calls, Ok(Lookup::Found(None::<u8>))), TTL)
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let zero = cache
            .get("zero", loader(&calls, Ok(Lookup::Found(9i64))), TTL)
            .await
            .unwrap();
        let empty = cache
            .get("empty", loader(&calls, Ok(Lookup::Found("x".to_string()))), TTL)
            .await
            .unwrap();
        let none = cache
            .get("none", loader(&calls, Ok(Lookup::Found(Some(1u8)))), TTL)
            .await
            .unwrap();

        assert_eq!(zero, Some(0));
        assert_eq!(empty, Some(String::new()));
        assert_eq!(none, Some(None));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_non_interference() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        cache
            .get("a", loader(&calls, Ok(Lookup::Found("a1".to_string()))), TTL)
            .await
            .unwrap();
        cache
            .get("b", loader(&calls, Ok(Lookup::Found("b1".to_string()))), TTL)
            .await
            .unwrap();

        cache.invalidate("a").await.unwrap();

        let b = cache
            .get("b", loader(&calls, Ok(Lookup::Found("b2".to_string()))), TTL)
            .await
            .unwrap();
        assert_eq!(b, Some("b1".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidate_absent_key() {
        let cache = CacheAsideStore::in_memory();

        cache.invalidate("never-set").await.unwrap();
        assert_eq!(cache.stats().await.invalidations, 1);
    }

    #[tokio::test]
    async fn test_invalid_key_and_ttl() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        let empty: Result<Option<u8>, TestError> = cache
            .get("", loader(&calls, Ok(Lookup::Found(1u8))), TTL)
            .await;
        assert!(matches!(empty, Err(TestError::Cache(CacheError::InvalidKey(_)))));

        let long_key = "k".repeat(MAX_KEY_LENGTH + 1);
        let too_long: Result<Option<u8>, TestError> = cache
            .get(&long_key, loader(&calls, Ok(Lookup::Found(1u8))), TTL)
            .await;
        assert!(matches!(too_long, Err(TestError::Cache(CacheError::InvalidKey(_)))));

        let zero_ttl: Result<Option<u8>, TestError> = cache
            .get("k", loader(&calls, Ok(Lookup::Found(1u8))), Duration::ZERO)
            .await;
        assert!(matches!(zero_ttl, Err(TestError::Cache(CacheError::InvalidTtl(_)))));

        let huge_ttl: Result<Option<u8>, TestError> = cache
            .get("user:1", loader(&calls, Ok(Lookup::Found(1u8))), Duration::MAX)
            .await;
        assert!(matches!(huge_ttl, Err(TestError::Cache(CacheError::InvalidTtl(_)))));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.stats().await, CacheStats::default());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_reloaded() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        cache
            .store()
            .set("user:3", "not json".to_string(), TTL)
            .await
            .unwrap();

        let value = cache
            .get("user:3", loader(&calls, Ok(Lookup::Found(3u32))), TTL)
            .await
            .unwrap();
        assert_eq!(value, Some(3));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.store().get("user:3").await.unwrap(), Some("3".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_misses_each_call_loader() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);
        // Both loaders must be in flight together to pass the barrier
        let barrier = Arc::new(Barrier::new(2));

        let fetch = |n: u32| {
            let barrier = barrier.clone();
            let calls = &calls;
            move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                barrier.wait().await;
                Ok::<_, TestError>(Lookup::Found(n))
            }
        };

        let (a, b) = tokio::join!(
            cache.get("hot", fetch(1), TTL),
            cache.get("hot", fetch(2), TTL),
        );

        assert!(a.unwrap().is_some());
        assert!(b.unwrap().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stats_track_reads() {
        let cache = CacheAsideStore::in_memory();
        let calls = AtomicUsize::new(0);

        cache
            .get("k", loader(&calls, Ok(Lookup::Found(1u8))), TTL)
            .await
            .unwrap();
        cache
            .get("k", loader(&calls, Ok(Lookup::Found(1u8))), TTL)
            .await
            .unwrap();

        let stats = cache.stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.loads, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_lookup_from_option() {
        assert_eq!(Lookup::from(Some(1)), Lookup::Found(1));
        assert_eq!(Lookup::<u8>::from(None), Lookup::NotFound);
    }
}
