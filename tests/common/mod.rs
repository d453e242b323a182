#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use maleva::maleva_auth::StaticCredentialVerifier;
use maleva::maleva_cache::{CacheError, MemoryCache, RevocationStore};
use maleva::maleva_config::{CorsConfig, JwtConfig};
use maleva::router::init_router;
use maleva::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "password";

/// Revocation store that fails every call, like a Redis that is down.
pub struct UnreachableStore;

#[async_trait]
impl RevocationStore for UnreachableStore {
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Unavailable("connection refused".into()))
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-key-32-bytes!".to_string(),
        issuer: Some("maleva".to_string()),
        audience: Some("maleva-clients".to_string()),
        expire_minutes: 60,
    }
}

pub fn test_state(store: Arc<dyn RevocationStore>) -> AppState {
    let verifier = StaticCredentialVerifier::with_cost(USERNAME, PASSWORD, 4).unwrap();
    AppState::new(
        &test_jwt_config(),
        Arc::new(verifier),
        store,
        CorsConfig::default(),
    )
}

pub fn setup_test_app(store: Arc<dyn RevocationStore>) -> Router {
    init_router(test_state(store))
}

pub fn memory_app() -> (Router, Arc<MemoryCache>) {
    let store = Arc::new(MemoryCache::new());
    (setup_test_app(store.clone()), store)
}

pub fn login_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn bearer_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Logs in with the demo account and returns the token.
pub async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(login_request(json!({ "username": USERNAME, "password": PASSWORD })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}
