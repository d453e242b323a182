use std::sync::Arc;

use anyhow::Context;

use maleva_auth::{
    CredentialVerifier, SessionTerminator, StaticCredentialVerifier, TokenCodec, TokenIssuer,
    TokenValidator,
};
use maleva_cache::{CacheConfig, RevocationStore, build_store};
use maleva_config::{CorsConfig, JwtConfig, ServerConfig};

#[derive(Clone)]
pub struct AppState {
    pub issuer: TokenIssuer,
    pub validator: TokenValidator,
    pub terminator: SessionTerminator,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// Wires the session services around one codec and one shared store.
    pub fn new(
        jwt_config: &JwtConfig,
        verifier: Arc<dyn CredentialVerifier>,
        store: Arc<dyn RevocationStore>,
        cors_config: CorsConfig,
    ) -> Self {
        let codec = TokenCodec::new(jwt_config);

        Self {
            issuer: TokenIssuer::new(verifier, codec.clone(), store.clone()),
            validator: TokenValidator::new(codec, store.clone()),
            terminator: SessionTerminator::new(store),
            cors_config,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cors_config", &self.cors_config)
            .finish_non_exhaustive()
    }
}

/// Builds the application state from the environment.
///
/// Fails when `JWT_SECRET` is missing, a value is malformed, or the demo
/// password cannot be hashed. An unreachable Redis is not an error here.
pub fn init_app_state(server_config: &ServerConfig) -> anyhow::Result<AppState> {
    let jwt_config = JwtConfig::from_env().context("invalid JWT configuration")?;
    let store = build_store(&CacheConfig::from_env()).context("invalid cache configuration")?;
    let verifier = StaticCredentialVerifier::new(
        &server_config.demo_username,
        &server_config.demo_password,
    )
    .map_err(|e| anyhow::anyhow!("failed to prepare demo credentials: {}", e.error))?;

    Ok(AppState::new(
        &jwt_config,
        Arc::new(verifier),
        store,
        CorsConfig::from_env(),
    ))
}
