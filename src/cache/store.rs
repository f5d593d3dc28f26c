//! Fast Store Module
//!
//! The key/value contract the cache facade reads from and writes to, plus the
//! in-process implementation used by the server.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::CacheEntry;
use crate::error::CacheError;

// == Fast Store Trait ==
/// A key/value store with per-entry TTL.
///
/// `get` must be expiry-aware: an entry whose TTL has elapsed is absent.
/// Implementations need no transactions; last write wins per key.
#[async_trait]
pub trait FastStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous entry.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Returns the value under `key` if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Removes `key`. Returns whether an entry was removed.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Number of stored entries, including expired ones not yet observed.
    async fn len(&self) -> usize;
}

// == Memory Store ==
/// In-process fast store backed by a `HashMap` behind an async `RwLock`.
///
/// Expiry is lazy: there is no sweeper, an expired entry is dropped by the
/// first read that observes it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FastStore for MemoryStore {
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry::new(value, ttl)?;
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if !entry.is_expired() => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Observed expiry: re-check under the write lock, a concurrent
        // populate may have replaced the entry in between.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(CacheEntry::is_expired) {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
