//! Token codec: HS256-signed JWTs built from a [`Claims`] set.
//!
//! The codec is constructed once from [`JwtConfig`] and then shared; the
//! signing secret lives only inside the encoding/decoding keys.
//!
//! # Example
//!
//! ```ignore
//! use chrono::Utc;
//! use maleva_auth::TokenCodec;
//! use maleva_config::JwtConfig;
//!
//! let codec = TokenCodec::new(&JwtConfig::from_env()?);
//! let encoded = codec.encode("admin", "admin", "5b0c7c2e-...", Utc::now())?;
//! let claims = codec.decode(&encoded.token)?;
//! assert_eq!(claims.sub, "admin");
//! ```

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, crypto, decode, encode};
use sha2::{Digest, Sha256};

use maleva_config::JwtConfig;

use crate::claims::Claims;
use crate::errors::AuthError;

/// Allowed clock drift between the issuing and the validating machine.
pub const CLOCK_SKEW_LEEWAY_SECS: u64 = 30;

/// A freshly signed token and its absolute expiry.
#[derive(Debug, Clone)]
pub struct EncodedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
    audience: Option<String>,
    lifetime: TimeDelta,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
        let mut required = vec!["exp", "sub"];
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
            required.push("iss");
        }
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                required.push("aud");
            }
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&required);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            lifetime: TimeDelta::minutes(config.expire_minutes),
        }
    }

    /// Configured token lifetime.
    pub fn lifetime(&self) -> TimeDelta {
        self.lifetime
    }

    /// Signs a token for `subject` that expires one lifetime after `issued_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encoding`] if signing fails or the expiry does
    /// not fit in a timestamp.
    pub fn encode(
        &self,
        subject: &str,
        name: &str,
        token_id: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<EncodedToken, AuthError> {
        let iat = issued_at.timestamp();
        let exp = iat + self.lifetime.num_seconds();
        let expires_at = DateTime::from_timestamp(exp, 0)
            .ok_or_else(|| AuthError::Encoding(format!("expiry {} out of range", exp)))?;

        let claims = Claims {
            sub: subject.to_string(),
            jti: Some(token_id.to_string()),
            name: name.to_string(),
            iat,
            exp,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))?;

        Ok(EncodedToken { token, expires_at })
    }

    /// Verifies the signature over the raw `header.payload` bytes, then expiry (with leeway) and the optional
    /// issuer/audience, and returns the claims.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidSignature`]: any altered byte, signature or algorithm mismatch
    /// - [`AuthError::Expired`]: `exp` is more than the leeway in the past
    /// - [`AuthError::InvalidClaims`]: issuer/audience mismatch or missing required claim
    /// - [`AuthError::Malformed`]: no `.` separator, or a correctly signed
    ///   token whose header or claims cannot be decoded
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let (message, signature) = token.rsplit_once('.').ok_or(AuthError::Malformed)?;
        // The header is untrusted input too; nothing is parsed before the MAC matches.
        match crypto::verify(signature, message.as_bytes(), &self.decoding_key, Algorithm::HS256) {
            Ok(true) => {}
            Ok(false) | Err(_) => return Err(AuthError::InvalidSignature),
        }

        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience
                | ErrorKind::InvalidSubject
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
                _ => AuthError::Malformed,
            })
    }
}

/// Short digest of a token, safe to put in logs in place of the token.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(&digest[..6])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            issuer: None,
            audience: None,
            expire_minutes: 60,
        }
    }

    fn flip_char_at(token: &str, index: usize) -> String {
        let mut bytes = token.as_bytes().to_vec();
        bytes[index] = if bytes[index] == b'A' { b'B' } else { b'A' };
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let now = Utc::now();

        let encoded = codec.encode("admin", "admin", "jti-1", now).unwrap();
        let claims = codec.decode(&encoded.token).unwrap();

        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.jti.as_deref(), Some("jti-1"));
        assert_eq!(claims.name, "admin");
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(encoded.expires_at.timestamp(), claims.exp);
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let issued_at = Utc::now() - TimeDelta::minutes(61);

        let encoded = codec.encode("admin", "admin", "jti-old", issued_at).unwrap();

        assert!(matches!(codec.decode(&encoded.token), Err(AuthError::Expired)));
    }

    #[test]
    fn test_expiry_within_leeway_is_accepted() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        // Expired 10 seconds ago, inside the 30 second skew allowance.
        let issued_at = Utc::now() - TimeDelta::minutes(60) - TimeDelta::seconds(10);

        let encoded = codec.encode("admin", "admin", "jti-skew", issued_at).unwrap();

        assert!(codec.decode(&encoded.token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let encoded = codec.encode("admin", "admin", "jti", Utc::now()).unwrap();

        let other = TokenCodec::new(&JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            ..get_test_jwt_config()
        });

        assert!(matches!(
            other.decode(&encoded.token),
            Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_tampered_payload_is_invalid_signature() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let token = codec.encode("admin", "admin", "jti", Utc::now()).unwrap().token;

        let payload_start = token.find('.').unwrap() + 1;
        let payload_end = token.rfind('.').unwrap();
        for index in [payload_start, (payload_start + payload_end) / 2, payload_end - 1] {
            let tampered = flip_char_at(&token, index);
            assert!(
                matches!(codec.decode(&tampered), Err(AuthError::InvalidSignature)),
                "byte {} of the payload was not detected",
                index
            );
        }
    }

    #[test]
    fn test_tampered_signature_is_invalid_signature() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let token = codec.encode("admin", "admin", "jti", Utc::now()).unwrap().token;

        let signature_start = token.rfind('.').unwrap() + 1;
        for index in [signature_start, token.len() - 2] {
            let tampered = flip_char_at(&token, index);
            assert!(matches!(
                codec.decode(&tampered),
                Err(AuthError::InvalidSignature)
            ));
        }
    }

    #[test]
    fn test_every_flipped_byte_is_invalid_signature() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let token = codec.encode("admin", "admin", "jti", Utc::now()).unwrap().token;

        let undetected: Vec<usize> = (0..token.len())
            .filter(|&index| {
                !matches!(
                    codec.decode(&flip_char_at(&token, index)),
                    Err(AuthError::InvalidSignature)
                )
            })
            .collect();

        assert!(undetected.is_empty(), "flips not rejected: {:?}", undetected);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        assert!(matches!(codec.decode("invalid-token"), Err(AuthError::Malformed)));
        assert!(matches!(codec.decode(""), Err(AuthError::Malformed)));
    }

    #[test]
    fn test_issuer_and_audience_are_enforced() {
        let config = JwtConfig {
            issuer: Some("maleva".to_string()),
            audience: Some("maleva-clients".to_string()),
            ..get_test_jwt_config()
        };
        let codec = TokenCodec::new(&config);
        let encoded = codec.encode("admin", "admin", "jti", Utc::now()).unwrap();

        let claims = codec.decode(&encoded.token).unwrap();
        assert_eq!(claims.iss.as_deref(), Some("maleva"));
        assert_eq!(claims.aud.as_deref(), Some("maleva-clients"));

        let other_audience = TokenCodec::new(&JwtConfig {
            audience: Some("someone-else".to_string()),
            ..config.clone()
        });
        assert!(matches!(
            other_audience.decode(&encoded.token),
            Err(AuthError::InvalidClaims)
        ));

        let other_issuer = TokenCodec::new(&JwtConfig {
            issuer: Some("impostor".to_string()),
            ..config
        });
        assert!(matches!(
            other_issuer.decode(&encoded.token),
            Err(AuthError::InvalidClaims)
        ));
    }

    #[test]
    fn test_token_without_issuer_rejected_when_issuer_required() {
        let plain = TokenCodec::new(&get_test_jwt_config());
        let encoded = plain.encode("admin", "admin", "jti", Utc::now()).unwrap();

        let strict = TokenCodec::new(&JwtConfig {
            issuer: Some("maleva".to_string()),
            ..get_test_jwt_config()
        });
        assert!(matches!(
            strict.decode(&encoded.token),
            Err(AuthError::InvalidClaims)
        ));
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        let a = fingerprint("token-a");
        assert_eq!(a, fingerprint("token-a"));
        assert_ne!(a, fingerprint("token-b"));
        assert_eq!(a.len(), 12);
    }

    #[test]
    fn test_debug_does_not_expose_keys() {
        let codec = TokenCodec::new(&get_test_jwt_config());
        let debug = format!("{:?}", codec);
        assert!(!debug.contains("test-secret-key"));
    }
}
