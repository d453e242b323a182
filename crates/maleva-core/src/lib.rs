//! # Maleva Core
//!
//! Core types and utilities shared by the Maleva API crates.
//!
//! - [`errors`]: HTTP-facing application error with JSON response conversion
//! - [`password`]: bcrypt password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use maleva_core::{AppError, hash_password, verify_password};
//!
//! let error = AppError::unauthorized(anyhow::anyhow!("Invalid or expired token"));
//!
//! let hash = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &hash)?);
//! ```

pub mod errors;
pub mod password;

pub use errors::AppError;
pub use password::{hash_password, hash_password_with_cost, verify_password};
