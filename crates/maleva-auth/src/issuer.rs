//! Login: credentials in, signed session token out.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use maleva_cache::{RevocationStore, keys};

use crate::credentials::CredentialVerifier;
use crate::errors::AuthError;
use crate::jwt::{EncodedToken, TokenCodec, fingerprint};

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
    /// Whether the revocation record was written. `false` means the token
    /// was issued while the store was unreachable and will not validate
    /// until it can be found there.
    pub recorded: bool,
}

#[derive(Clone)]
pub struct TokenIssuer {
    verifier: Arc<dyn CredentialVerifier>,
    codec: TokenCodec,
    store: Arc<dyn RevocationStore>,
}

impl TokenIssuer {
    pub fn new(
        verifier: Arc<dyn CredentialVerifier>,
        codec: TokenCodec,
        store: Arc<dyn RevocationStore>,
    ) -> Self {
        Self {
            verifier,
            codec,
            store,
        }
    }

    /// Verifies the credentials, signs a token with a fresh id and records it.
    ///
    /// A previous session of the same user is left alone: only the user's
    /// current-token pointer is overwritten.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidCredentials`] when the verifier says no
    /// - [`AuthError::Encoding`] when signing fails
    ///
    /// Store failures are never returned; see [`Self::record_fail_open`].
    #[instrument(skip(self, password), fields(auth.username = %username))]
    pub async fn issue(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        if username.is_empty() || !self.verifier.verify(username, password).await {
            warn!("Login rejected: invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        let token_id = Uuid::new_v4().to_string();
        let encoded = self.codec.encode(username, username, &token_id, Utc::now())?;
        let recorded = self.record_fail_open(username, &token_id, &encoded).await;

        info!(
            token.id = %token_id,
            token.fingerprint = %fingerprint(&encoded.token),
            token.expires_at = %encoded.expires_at,
            recorded,
            "Issued session token"
        );

        Ok(Session {
            token: encoded.token,
            token_id,
            expires_at: encoded.expires_at,
            recorded,
        })
    }

    /// Fail-open issuance policy: a store outage must not block login, so a
    /// failed write is logged and the token is still handed out. No retry.
    async fn record_fail_open(&self, subject: &str, token_id: &str, encoded: &EncodedToken) -> bool {
        let ttl = (encoded.expires_at - Utc::now())
            .to_std()
            .unwrap_or(Duration::ZERO);
        let entries = [
            (keys::tokens::by_id(token_id), encoded.token.clone()),
            (keys::users::current_token(subject), token_id.to_string()),
        ];

        match self.store.set_all(&entries, ttl).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    error = %e,
                    token.id = %token_id,
                    "Failed to store token in revocation store; continuing without it"
                );
                false
            }
        }
    }
}
