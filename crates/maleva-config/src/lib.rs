//! # Maleva Config
//!
//! Configuration types for the Maleva API, read once from environment
//! variables at startup.
//!
//! - [`jwt`]: token signing secret, issuer, audience and lifetime
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: listen address and demo credentials
//!
//! # Example
//!
//! ```ignore
//! use maleva_config::{CorsConfig, JwtConfig, ServerConfig};
//!
//! // Refuses to start without JWT_SECRET
//! let jwt_config = JwtConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod jwt;
pub mod server;

pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use server::ServerConfig;

/// Error raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required configuration `{0}` is not set")]
    Missing(&'static str),

    #[error("configuration `{key}` has an invalid value: {reason}")]
    Invalid { key: &'static str, reason: String },
}
