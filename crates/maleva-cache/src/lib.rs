//! # Maleva Cache
//!
//! The shared key/value store that holds the authoritative record of every
//! live session token.
//!
//! This crate provides:
//! - [`RevocationStore`]: the `set` / `get` / `remove` contract with per-entry TTL
//! - [`RedisCache`]: the network-backed store shared by all service instances
//! - [`MemoryCache`]: a process-local store for single-instance runs and tests
//! - [`keys`]: the logical key layout (`tokens:{id}`, `user:{name}:token`)
//! - [`CacheConfig`]: backend selection and connection settings
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use maleva_cache::{CacheConfig, build_store, keys};
//!
//! let store = build_store(&CacheConfig::from_env())?;
//! store.set(&keys::tokens::by_id("abc"), "eyJ...", Duration::from_secs(3600)).await?;
//! let cached = store.get(&keys::tokens::by_id("abc")).await?;
//! ```

use std::sync::Arc;

use tracing::info;

pub mod config;
pub mod keys;
pub mod memory;
pub mod redis;
pub mod store;

pub use config::{CacheBackend, CacheConfig};
pub use memory::MemoryCache;
pub use self::redis::RedisCache;
pub use store::{CacheError, RevocationStore};

/// Builds the store selected by `config.backend`.
///
/// The Redis store connects lazily, so an unreachable server does not fail
/// here; only a malformed `REDIS_URL` does.
pub fn build_store(config: &CacheConfig) -> Result<Arc<dyn RevocationStore>, CacheError> {
    match config.backend {
        CacheBackend::Redis => {
            info!(cache.backend = "redis", cache.prefix = %config.key_prefix, "Using Redis revocation store");
            Ok(Arc::new(RedisCache::new(config)?))
        }
        CacheBackend::Memory => {
            info!(cache.backend = "memory", "Using in-memory revocation store");
            Ok(Arc::new(MemoryCache::new()))
        }
    }
}
