use anyhow::anyhow;
use maleva_cache::CacheError;
use maleva_core::AppError;

/// Message returned for every rejected token, whatever check failed.
pub const GENERIC_TOKEN_ERROR: &str = "Invalid or expired token";

/// Failures of the session lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token issuer or audience does not match")]
    InvalidClaims,

    #[error("token does not contain a token id")]
    Missing,

    #[error("token has been revoked")]
    Revoked,

    #[error("revocation store unavailable: {0}")]
    StoreUnavailable(#[source] CacheError),

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl AuthError {
    /// Short, stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "expired",
            Self::Malformed => "malformed",
            Self::InvalidClaims => "invalid_claims",
            Self::Missing => "missing_token_id",
            Self::Revoked => "revoked",
            Self::StoreUnavailable(_) => "store_unavailable",
            Self::Encoding(_) => "encoding",
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                AppError::unauthorized(anyhow!("Invalid username or password."))
            }
            AuthError::Encoding(_) => AppError::internal(anyhow!("Failed to issue token")),
            // Collapsed so a caller cannot tell which check rejected the token.
            _ => AppError::unauthorized(anyhow!(GENERIC_TOKEN_ERROR)),
        }
    }
}
