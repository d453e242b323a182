//! The revocation store contract.

use std::time::Duration;

use async_trait::async_trait;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    #[error("Cache operation {operation} timed out after {timeout:?}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

/// A shared key/value store with per-entry time-to-live.
///
/// Every operation can fail independently. Callers decide what a failure
/// means; the store never retries on their behalf.
#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value. A zero `ttl`
    /// means the entry is already expired and is removed instead.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Returns the live value under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Stores several entries with a shared `ttl`.
    ///
    /// The default writes the entries one after another and is NOT atomic:
    /// when a later write fails, earlier entries stay in place. Backends that
    /// can write all keys in one transaction override this.
    async fn set_all(&self, entries: &[(String, String)], ttl: Duration) -> Result<(), CacheError> {
        for (key, value) in entries {
            self.set(key, value, ttl).await?;
        }
        Ok(())
    }
}
