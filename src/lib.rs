//! # Maleva API
//!
//! Stateless JWT session tokens with server-side revocation.
//!
//! ## Overview
//!
//! Every issued token is recorded in a shared key/value store (Redis). A
//! token is accepted only if its signature and expiry check out **and** the
//! exact token string is still recorded under its token id. Logging out
//! removes the record, which revokes the token immediately across all
//! instances.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── maleva-core/     # AppError, password hashing
//! ├── maleva-config/   # JWT, CORS, server settings
//! ├── maleva-cache/    # RevocationStore trait, Redis and in-memory stores
//! └── maleva-auth/     # Codec, issuer, validator, terminator
//! src/
//! ├── middleware/      # AuthUser extractor
//! ├── modules/auth/    # /api/auth handlers, DTOs, router
//! ├── docs.rs          # OpenAPI document
//! ├── logging.rs       # Subscriber setup and request logging
//! ├── metrics.rs       # Prometheus exporter and session counters
//! ├── router.rs        # Main application router
//! └── state.rs         # Shared application state
//! ```
//!
//! ## Endpoints
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | POST | `/api/auth/login` | - | Exchange username/password for a token |
//! | POST | `/api/auth/logout` | Bearer | Revoke the presented token |
//! | GET | `/api/auth/welcome` | Bearer | Greeting for the token's user |
//! | GET | `/metrics` | - | Prometheus exposition |
//!
//! ## Quick Start
//!
//! ```bash
//! JWT_SECRET=change-me-to-a-long-random-string
//! REDIS_URL=redis://127.0.0.1:6379
//! cargo run
//! ```
//!
//! API documentation is served at `/swagger-ui` and `/scalar`.
//!
//! ## Store outages
//!
//! Login keeps working while Redis is down (the token is returned but not
//! recorded); every authenticated request is refused until Redis is back.

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use maleva_auth;
pub use maleva_cache;
pub use maleva_config;
pub use maleva_core;
