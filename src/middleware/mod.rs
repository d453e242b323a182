//! Request extractors.
//!
//! - [`auth`]: the [`AuthUser`](auth::AuthUser) extractor guarding protected handlers
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` checks the signature, expiry and token id
//! 3. The token must still be recorded in the revocation store
//! 4. Handler executes with the caller's identity
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn welcome(AuthUser(identity): AuthUser) -> impl IntoResponse {
//!     format!("Welcome, {}!", identity.display_name())
//! }
//! ```

pub mod auth;
