//! Per-request token validation: signature first, then the revocation record.

use std::sync::Arc;

use tracing::{debug, error, instrument, warn};

use maleva_cache::{RevocationStore, keys};

use crate::claims::Identity;
use crate::errors::AuthError;
use crate::jwt::{TokenCodec, fingerprint};

#[derive(Clone)]
pub struct TokenValidator {
    codec: TokenCodec,
    store: Arc<dyn RevocationStore>,
}

impl TokenValidator {
    pub fn new(codec: TokenCodec, store: Arc<dyn RevocationStore>) -> Self {
        Self { codec, store }
    }

    /// Accepts `token` only if it is correctly signed, unexpired, carries a
    /// token id, and is byte-for-byte the token recorded under that id.
    ///
    /// # Errors
    ///
    /// Codec failures are returned as-is. After that:
    /// - [`AuthError::Missing`] when the token has no `jti`
    /// - [`AuthError::Revoked`] when the record is absent or differs
    /// - [`AuthError::StoreUnavailable`] when the store cannot answer
    #[instrument(skip_all, fields(token.fingerprint = %fingerprint(token)))]
    pub async fn validate(&self, token: &str) -> Result<Identity, AuthError> {
        let claims = self.codec.decode(token).inspect_err(|e| {
            debug!(reason = e.reason(), "Token rejected by codec");
        })?;

        let token_id = claims
            .jti
            .clone()
            .filter(|jti| !jti.is_empty())
            .ok_or_else(|| {
                warn!(auth.subject = %claims.sub, "Token does not contain jti");
                AuthError::Missing
            })?;

        self.check_record_fail_closed(&token_id, token).await?;

        Ok(Identity::from_claims(claims, token_id))
    }

    /// Fail-closed validation policy: anything short of a positive match in
    /// the store, including a store error or timeout, denies access.
    async fn check_record_fail_closed(&self, token_id: &str, presented: &str) -> Result<(), AuthError> {
        match self.store.get(&keys::tokens::by_id(token_id)).await {
            Ok(Some(cached)) if cached.as_bytes() == presented.as_bytes() => Ok(()),
            Ok(Some(_)) => {
                warn!(token.id = %token_id, "Presented token differs from recorded token");
                Err(AuthError::Revoked)
            }
            Ok(None) => {
                debug!(token.id = %token_id, "Token revoked or not found in cache");
                Err(AuthError::Revoked)
            }
            Err(e) => {
                error!(error = %e, token.id = %token_id, "Revocation store lookup failed; denying access");
                Err(AuthError::StoreUnavailable(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{UnreachableStore, test_codec};
    use chrono::{TimeDelta, Utc};
    use maleva_cache::MemoryCache;
    use std::time::Duration;

    async fn record(store: &MemoryCache, token_id: &str, token: &str) {
        store
            .set(&keys::tokens::by_id(token_id), token, Duration::from_secs(3600))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_recorded_token_is_accepted() {
        let store = Arc::new(MemoryCache::new());
        let codec = test_codec();
        let token = codec.encode("admin", "admin", "jti-ok", Utc::now()).unwrap().token;
        record(&store, "jti-ok", &token).await;

        let identity = TokenValidator::new(codec, store)
            .validate(&token)
            .await
            .unwrap();

        assert_eq!(identity.subject, "admin");
        assert_eq!(identity.token_id, "jti-ok");
    }

    #[tokio::test]
    async fn test_unrecorded_token_is_revoked() {
        let codec = test_codec();
        let token = codec.encode("admin", "admin", "jti-gone", Utc::now()).unwrap().token;

        let result = TokenValidator::new(codec, Arc::new(MemoryCache::new()))
            .validate(&token)
            .await;

        assert!(matches!(result, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn test_mismatched_record_is_revoked() {
        let store = Arc::new(MemoryCache::new());
        let codec = test_codec();
        let token = codec.encode("admin", "admin", "jti-x", Utc::now()).unwrap().token;
        record(&store, "jti-x", "some-other-token").await;

        let result = TokenValidator::new(codec, store).validate(&token).await;

        assert!(matches!(result, Err(AuthError::Revoked)));
    }

    #[tokio::test]
    async fn test_store_failure_denies_access() {
        let codec = test_codec();
        let token = codec.encode("admin", "admin", "jti-down", Utc::now()).unwrap().token;

        let result = TokenValidator::new(codec, Arc::new(UnreachableStore))
            .validate(&token)
            .await;

        assert!(matches!(result, Err(AuthError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_expired_token_rejected_even_when_recorded() {
        let store = Arc::new(MemoryCache::new());
        let codec = test_codec();
        let issued_at = Utc::now() - TimeDelta::hours(2);
        let token = codec.encode("admin", "admin", "jti-old", issued_at).unwrap().token;
        record(&store, "jti-old", &token).await;

        let result = TokenValidator::new(codec, store).validate(&token).await;

        assert!(matches!(result, Err(AuthError::Expired)));
    }

    #[tokio::test]
    async fn test_empty_token_id_is_missing() {
        let store = Arc::new(MemoryCache::new());
        let codec = test_codec();
        let token = codec.encode("admin", "admin", "", Utc::now()).unwrap().token;
        record(&store, "", &token).await;

        let result = TokenValidator::new(codec, store).validate(&token).await;

        assert!(matches!(result, Err(AuthError::Missing)));
    }
}
