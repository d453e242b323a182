use std::time::Duration;

use async_trait::async_trait;
use maleva_cache::{CacheError, RevocationStore};
use maleva_config::JwtConfig;

use crate::credentials::StaticCredentialVerifier;
use crate::jwt::TokenCodec;

/// A store whose every call fails, standing in for an unreachable Redis.
pub struct UnreachableStore;

#[async_trait]
impl RevocationStore for UnreachableStore {
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-at-least-32-characters-long".to_string(),
        issuer: Some("maleva-test".to_string()),
        audience: Some("maleva-test-clients".to_string()),
        expire_minutes: 60,
    }
}

pub fn test_codec() -> TokenCodec {
    TokenCodec::new(&test_jwt_config())
}

pub fn test_verifier() -> StaticCredentialVerifier {
    StaticCredentialVerifier::with_cost("admin", "password", 4).unwrap()
}
