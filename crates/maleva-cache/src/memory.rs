//! Process-local revocation store.
//!
//! Entries live in a map guarded by an async lock. An expired entry is
//! dropped when its key is read, and every write sweeps out all expired
//! entries, so keys that are never read again do not accumulate.
//! Revocations made here are invisible to other processes, so this backend
//! only suits single-instance deployments and tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::store::{CacheError, RevocationStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones not yet evicted included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops every expired entry.
    pub async fn purge_expired(&self) {
        Self::evict_expired(&mut *self.entries.write().await);
    }

    fn evict_expired(map: &mut HashMap<String, Entry>) {
        let now = Instant::now();
        map.retain(|_, entry| entry.expires_at > now);
    }

    fn insert(map: &mut HashMap<String, Entry>, key: &str, value: &str, ttl: Duration) {
        if ttl.is_zero() {
            map.remove(key);
            return;
        }
        map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

#[async_trait]
impl RevocationStore for MemoryCache {
    #[instrument(skip(self, value), fields(cache.operation = "SET"))]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut map = self.entries.write().await;
        Self::evict_expired(&mut map);
        Self::insert(&mut map, key, value, ttl);
        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Cache set");
        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        {
            let map = self.entries.read().await;
            match map.get(key) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    debug!(cache.key = %key, "Cache hit");
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => {
                    debug!(cache.key = %key, "Cache miss");
                    return Ok(None);
                }
            }
        }

        // Expired: evict unless a concurrent writer refreshed it meanwhile.
        let mut map = self.entries.write().await;
        if map
            .get(key)
            .is_some_and(|entry| entry.expires_at <= Instant::now())
        {
            map.remove(key);
        }
        debug!(cache.key = %key, "Cache miss (expired)");
        Ok(None)
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        debug!(cache.key = %key, "Cache invalidated");
        Ok(())
    }

    /// Writes all entries under a single lock acquisition.
    async fn set_all(&self, entries: &[(String, String)], ttl: Duration) -> Result<(), CacheError> {
        let mut map = self.entries.write().await;
        Self::evict_expired(&mut map);
        for (key, value) in entries {
            Self::insert(&mut map, key, value, ttl);
        }
        Ok(())
    }
}
