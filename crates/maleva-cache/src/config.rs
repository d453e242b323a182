//! Revocation store configuration.
//!
//! This module provides backend selection and Redis connection settings
//! loaded from environment variables.

use std::env;
use std::time::Duration;

/// Which [`RevocationStore`](crate::RevocationStore) implementation to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheBackend {
    /// Shared Redis server; required when running more than one instance.
    Redis,
    /// Process-local map; revocations are not shared between instances.
    Memory,
}

impl CacheBackend {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "memory" | "in-memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

/// Revocation store configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `CACHE_BACKEND`: `redis` or `memory` (default: `redis`)
/// - `REDIS_URL`: Redis connection URL (default: `redis://127.0.0.1:6379`)
/// - `CACHE_PREFIX`: Namespace prefix for all backend keys (default: `maleva`)
/// - `CACHE_OPERATION_TIMEOUT_MS`: Upper bound for a single store call (default: `500`)
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Selected backend.
    pub backend: CacheBackend,

    /// Redis connection URL.
    pub redis_url: String,

    /// Prefix for all cache keys to avoid collisions.
    pub key_prefix: String,

    /// Timeout applied to every store operation, connection setup included.
    pub operation_timeout: Duration,
}

impl CacheConfig {
    /// Load configuration from environment variables.
    ///
    /// An unknown `CACHE_BACKEND` value falls back to Redis.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| CacheBackend::parse(&v))
                .unwrap_or(defaults.backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or(defaults.key_prefix),
            operation_timeout: env::var("CACHE_OPERATION_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.operation_timeout),
        }
    }

    /// Build a prefixed cache key.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let key = config.prefixed_key("tokens:123");
    /// // Returns "maleva:tokens:123"
    /// ```
    pub fn prefixed_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            return key.to_string();
        }
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Redis,
            redis_url: "redis://127.0.0.1:6379".into(),
            key_prefix: "maleva".into(),
            operation_timeout: Duration::from_millis(500),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_key() {
        let config = CacheConfig::default();
        assert_eq!(config.prefixed_key("tokens:abc"), "maleva:tokens:abc");
    }

    #[test]
    fn test_empty_prefix_leaves_key_untouched() {
        let config = CacheConfig {
            key_prefix: String::new(),
            ..CacheConfig::default()
        };
        assert_eq!(config.prefixed_key("user:admin:token"), "user:admin:token");
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(CacheBackend::parse("Redis"), Some(CacheBackend::Redis));
        assert_eq!(CacheBackend::parse(" memory "), Some(CacheBackend::Memory));
        assert_eq!(CacheBackend::parse("memcached"), None);
    }
}
