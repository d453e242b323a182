//! Logout.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use maleva_cache::{RevocationStore, keys};

use crate::claims::Identity;
use crate::errors::AuthError;

/// What a logout managed to remove server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Termination {
    /// `false` if any removal failed; the record then lingers until its TTL.
    pub records_removed: bool,
}

#[derive(Clone)]
pub struct SessionTerminator {
    store: Arc<dyn RevocationStore>,
}

impl SessionTerminator {
    pub fn new(store: Arc<dyn RevocationStore>) -> Self {
        Self { store }
    }

    /// Removes the revocation record of an already validated session.
    ///
    /// The user's current-token pointer is removed unconditionally, even when
    /// it already points at a newer session of the same user.
    ///
    /// # Errors
    ///
    /// Only [`AuthError::Missing`] when the identity has no token id. Store
    /// failures are logged and reported through [`Termination`].
    #[instrument(skip_all, fields(auth.subject = %identity.subject, token.id = %identity.token_id))]
    pub async fn terminate(&self, identity: &Identity) -> Result<Termination, AuthError> {
        if identity.token_id.is_empty() {
            return Err(AuthError::Missing);
        }

        let mut records_removed = true;

        if let Err(e) = self
            .store
            .remove(&keys::tokens::by_id(&identity.token_id))
            .await
        {
            warn!(error = %e, "Failed to remove token from cache during logout");
            records_removed = false;
        }

        if !identity.subject.is_empty() {
            if let Err(e) = self
                .store
                .remove(&keys::users::current_token(&identity.subject))
                .await
            {
                warn!(error = %e, "Failed to remove user token pointer during logout");
                records_removed = false;
            }
        }

        info!(records_removed, "Session terminated");

        Ok(Termination { records_removed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::UnreachableStore;
    use chrono::Utc;
    use maleva_cache::MemoryCache;
    use std::time::Duration;

    fn identity(subject: &str, token_id: &str) -> Identity {
        Identity {
            subject: subject.to_string(),
            token_id: token_id.to_string(),
            name: subject.to_string(),
            expires_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_terminate_removes_both_entries() {
        let store = Arc::new(MemoryCache::new());
        let ttl = Duration::from_secs(60);
        store.set("tokens:jti-1", "token", ttl).await.unwrap();
        store.set("user:admin:token", "jti-1", ttl).await.unwrap();

        let outcome = SessionTerminator::new(store.clone())
            .terminate(&identity("admin", "jti-1"))
            .await
            .unwrap();

        assert!(outcome.records_removed);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_terminate_leaves_other_sessions_valid() {
        let store = Arc::new(MemoryCache::new());
        let ttl = Duration::from_secs(60);
        store.set("tokens:jti-old", "old", ttl).await.unwrap();
        store.set("tokens:jti-new", "new", ttl).await.unwrap();
        store.set("user:admin:token", "jti-new", ttl).await.unwrap();

        SessionTerminator::new(store.clone())
            .terminate(&identity("admin", "jti-old"))
            .await
            .unwrap();

        assert!(store.get("tokens:jti-old").await.unwrap().is_none());
        assert!(store.get("tokens:jti-new").await.unwrap().is_some());
        // The pointer goes regardless of which session it referenced.
        assert!(store.get("user:admin:token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_terminate_without_subject_keeps_pointers() {
        let store = Arc::new(MemoryCache::new());
        let ttl = Duration::from_secs(60);
        store.set("tokens:jti-1", "token", ttl).await.unwrap();
        store.set("user:admin:token", "jti-1", ttl).await.unwrap();

        SessionTerminator::new(store.clone())
            .terminate(&identity("", "jti-1"))
            .await
            .unwrap();

        assert!(store.get("user:admin:token").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_terminate_swallows_store_failures() {
        let outcome = SessionTerminator::new(Arc::new(UnreachableStore))
            .terminate(&identity("admin", "jti-1"))
            .await
            .unwrap();

        assert!(!outcome.records_removed);
    }

    #[tokio::test]
    async fn test_terminate_requires_token_id() {
        let result = SessionTerminator::new(Arc::new(MemoryCache::new()))
            .terminate(&identity("admin", ""))
            .await;

        assert!(matches!(result, Err(AuthError::Missing)));
    }
}
