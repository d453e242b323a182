//! Credential verification.
//!
//! The issuer only needs a yes/no answer for a username/password pair, so any
//! user directory (database, LDAP, external identity provider) can be plugged
//! in behind [`CredentialVerifier`].

use async_trait::async_trait;
use tracing::warn;

use maleva_core::{AppError, hash_password, hash_password_with_cost, verify_password};

#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` when `password` is correct for `username`.
    async fn verify(&self, username: &str, password: &str) -> bool;
}

/// Accepts exactly one configured account.
///
/// The password is kept only as a bcrypt hash.
pub struct StaticCredentialVerifier {
    username: String,
    password_hash: String,
}

impl StaticCredentialVerifier {
    pub fn new(username: &str, password: &str) -> Result<Self, AppError> {
        Ok(Self {
            username: username.to_string(),
            password_hash: hash_password(password)?,
        })
    }

    pub fn with_cost(username: &str, password: &str, cost: u32) -> Result<Self, AppError> {
        Ok(Self {
            username: username.to_string(),
            password_hash: hash_password_with_cost(password, cost)?,
        })
    }
}

impl std::fmt::Debug for StaticCredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentialVerifier")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentialVerifier {
    async fn verify(&self, username: &str, password: &str) -> bool {
        // Hash check runs for unknown usernames too, keeping timing uniform.
        // bcrypt is CPU-bound, so it runs on the blocking pool.
        let password = password.to_owned();
        let hash = self.password_hash.clone();
        let password_ok =
            match tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await {
                Ok(Ok(valid)) => valid,
                Ok(Err(e)) => {
                    warn!(error = %e, "Password verification failed");
                    false
                }
                Err(e) => {
                    warn!(error = %e, "Password verification task failed");
                    false
                }
            };

        !username.is_empty() && username == self.username && password_ok
    }
}
