use std::env;
use std::fmt;

use crate::ConfigError;

pub const DEFAULT_EXPIRE_MINUTES: i64 = 60;

/// Token signing configuration.
///
/// # Environment Variables
///
/// - `JWT_SECRET`: HMAC signing secret (required)
/// - `JWT_ISSUER`: value for the `iss` claim, validated when set
/// - `JWT_AUDIENCE`: value for the `aud` claim, validated when set
/// - `JWT_EXPIRE_MINUTES`: token lifetime in minutes (default: `60`)
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub expire_minutes: i64,
}

impl JwtConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `JWT_SECRET` is unset or blank,
    /// and [`ConfigError::Invalid`] for a non-positive lifetime.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        // An unparsable lifetime falls back to the default, like an unset one.
        let expire_minutes = lookup("JWT_EXPIRE_MINUTES")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(DEFAULT_EXPIRE_MINUTES);
        if expire_minutes <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_EXPIRE_MINUTES",
                reason: format!("lifetime must be positive, got {}", expire_minutes),
            });
        }

        Ok(Self {
            secret,
            issuer: lookup("JWT_ISSUER").filter(|s| !s.is_empty()),
            audience: lookup("JWT_AUDIENCE").filter(|s| !s.is_empty()),
            expire_minutes,
        })
    }
}

// The secret must never reach a log line.
impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expire_minutes", &self.expire_minutes)
            .finish()
    }
}
