use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{login, logout, welcome};

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/welcome", get(welcome))
}
