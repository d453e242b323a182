//! Token claims and the identity derived from a validated token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
///
/// # Fields
///
/// - `sub`: username (subject)
/// - `jti`: unique token id, the revocation key
/// - `name`: display name
/// - `iat` / `exp`: issued-at and expiry (Unix seconds)
/// - `iss` / `aud`: present only when configured
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username (subject claim)
    pub sub: String,
    /// Unique token identifier (JWT ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: i64,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// The authenticated principal of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub token_id: String,
    pub name: String,
    pub expires_at: DateTime<Utc>,
}

impl Identity {
    pub fn from_claims(claims: Claims, token_id: String) -> Self {
        Self {
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
            subject: claims.sub,
            token_id,
            name: claims.name,
        }
    }

    /// Name to greet the user with; falls back to the subject.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.subject
        } else {
            &self.name
        }
    }
}
