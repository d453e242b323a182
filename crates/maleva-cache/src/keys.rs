//! Logical cache keys for session records.
//!
//! Backends add their own namespace prefix on top of these; the logical
//! layout itself is fixed so that other services can read the same records.

/// Keys for the canonical copy of an issued token.
pub mod tokens {
    /// `tokens:{token_id}` holds the raw token string.
    pub fn by_id(token_id: &str) -> String {
        format!("tokens:{}", token_id)
    }
}

/// Keys for per-user session pointers.
pub mod users {
    /// `user:{username}:token` holds the id of the user's most recent token.
    pub fn current_token(username: &str) -> String {
        format!("user:{}:token", username)
    }
}
