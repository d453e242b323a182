//! Redis-backed revocation store shared by every service instance.
//!
//! The connection is opened lazily on first use and every command, including
//! the connection attempt, is bounded by the configured operation timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use crate::config::CacheConfig;
use crate::store::{CacheError, RevocationStore};

/// Redis store client with a lazily established, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    client: Client,
    conn: Arc<OnceCell<ConnectionManager>>,
    config: CacheConfig,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("key_prefix", &self.config.key_prefix)
            .field("operation_timeout", &self.config.operation_timeout)
            .finish_non_exhaustive()
    }
}

/// Redis `SETEX` takes whole seconds; round up so an entry never outlives
/// its TTL by less than it was asked to live.
fn ttl_secs(ttl: Duration) -> u64 {
    ttl.as_secs() + u64::from(ttl.subsec_nanos() > 0)
}

impl RedisCache {
    /// Creates a new Redis store client.
    ///
    /// No connection is made here, so a Redis outage at startup does not
    /// keep the service from booting.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if `redis_url` cannot be parsed.
    pub fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.redis_url.as_str())?;

        Ok(Self {
            client,
            conn: Arc::new(OnceCell::new()),
            config: config.clone(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await?;
        Ok(conn.clone())
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, CacheError>
    where
        F: Future<Output = Result<T, CacheError>>,
    {
        let timeout = self.config.operation_timeout;
        tokio::time::timeout(timeout, fut)
            .await
            .map_err(|_| CacheError::Timeout { operation, timeout })?
    }
}

#[async_trait]
impl RevocationStore for RedisCache {
    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            return self.remove(key).await;
        }

        let full_key = self.config.prefixed_key(key);
        self.bounded("SETEX", async {
            let mut conn = self.connection().await?;
            conn.set_ex::<_, _, ()>(&full_key, value, ttl_secs(ttl))
                .await?;
            Ok::<_, CacheError>(())
        })
        .await?;

        debug!(cache.key = %full_key, cache.ttl_secs = %ttl_secs(ttl), "Cache set");

        Ok(())
    }

    #[instrument(skip(self), fields(cache.operation = "GET"))]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let full_key = self.config.prefixed_key(key);
        let value = self
            .bounded("GET", async {
                let mut conn = self.connection().await?;
                let value: Option<String> = conn.get(&full_key).await?;
                Ok::<_, CacheError>(value)
            })
            .await?;

        if value.is_some() {
            debug!(cache.key = %full_key, "Cache hit");
        } else {
            debug!(cache.key = %full_key, "Cache miss");
        }

        Ok(value)
    }

    #[instrument(skip(self), fields(cache.operation = "DEL"))]
    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        let full_key = self.config.prefixed_key(key);
        self.bounded("DEL", async {
            let mut conn = self.connection().await?;
            conn.del::<_, ()>(&full_key).await?;
            Ok::<_, CacheError>(())
        })
        .await?;

        debug!(cache.key = %full_key, "Cache invalidated");

        Ok(())
    }

    /// Writes every entry inside one `MULTI`/`EXEC` transaction, so either
    /// all keys land or none do.
    #[instrument(skip(self, entries), fields(cache.operation = "MULTI_SETEX", cache.keys = entries.len()))]
    async fn set_all(&self, entries: &[(String, String)], ttl: Duration) -> Result<(), CacheError> {
        if ttl.is_zero() {
            for (key, _) in entries {
                self.remove(key).await?;
            }
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for (key, value) in entries {
            pipe.set_ex(self.config.prefixed_key(key), value, ttl_secs(ttl))
                .ignore();
        }

        self.bounded("MULTI_SETEX", async {
            let mut conn = self.connection().await?;
            let _: () = pipe.query_async(&mut conn).await?;
            Ok::<_, CacheError>(())
        })
        .await?;

        debug!(cache.keys = entries.len(), cache.ttl_secs = %ttl_secs(ttl), "Cache set (atomic)");

        Ok(())
    }
}
