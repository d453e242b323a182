//! # Maleva Auth
//!
//! Session token lifecycle for the Maleva API.
//!
//! This crate provides:
//!
//! - [`claims`]: token claims and the validated [`Identity`]
//! - [`jwt`]: the HS256 [`TokenCodec`]
//! - [`credentials`]: the pluggable [`CredentialVerifier`]
//! - [`issuer`]: login, recording each token in the revocation store
//! - [`validator`]: signature plus revocation-record check for every request
//! - [`terminator`]: logout, removing the revocation record
//!
//! # Store failure policies
//!
//! The two sides of the revocation store deliberately treat an outage
//! differently:
//!
//! - **Issuance fails open**: if the record cannot be written the token is
//!   still returned, so an unreachable cache never blocks login.
//! - **Validation fails closed**: if the record cannot be read the request is
//!   denied, so an unreachable cache never lets a revoked token through.
//!
//! A token issued during an outage is therefore unusable until it is
//! re-issued after the store recovers.
//!
//! # Example
//!
//! ```ignore
//! let issuer = TokenIssuer::new(verifier, codec.clone(), store.clone());
//! let validator = TokenValidator::new(codec, store.clone());
//! let terminator = SessionTerminator::new(store);
//!
//! let session = issuer.issue("admin", "password").await?;
//! let identity = validator.validate(&session.token).await?;
//! terminator.terminate(&identity).await?;
//! assert!(validator.validate(&session.token).await.is_err());
//! ```

pub mod claims;
pub mod credentials;
pub mod errors;
pub mod issuer;
pub mod jwt;
pub mod terminator;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use claims::{Claims, Identity};
pub use credentials::{CredentialVerifier, StaticCredentialVerifier};
pub use errors::{AuthError, GENERIC_TOKEN_ERROR};
pub use issuer::{Session, TokenIssuer};
pub use jwt::{CLOCK_SKEW_LEEWAY_SECS, EncodedToken, TokenCodec, fingerprint};
pub use terminator::{SessionTerminator, Termination};
pub use validator::TokenValidator;
