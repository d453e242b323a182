use std::env;

/// Process-level server settings.
///
/// # Environment Variables
///
/// - `SERVER_ADDR`: listen address (default: `0.0.0.0:3000`)
/// - `DEMO_USERNAME` / `DEMO_PASSWORD`: the single account accepted by the
///   built-in credential verifier (default: `admin` / `password`)
#[derive(Clone)]
pub struct ServerConfig {
    pub addr: String,
    pub demo_username: String,
    pub demo_password: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into()),
            demo_username: env::var("DEMO_USERNAME").unwrap_or_else(|_| "admin".into()),
            demo_password: env::var("DEMO_PASSWORD").unwrap_or_else(|_| "password".into()),
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("addr", &self.addr)
            .field("demo_username", &self.demo_username)
            .finish_non_exhaustive()
    }
}
