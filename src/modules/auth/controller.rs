use anyhow::anyhow;
use axum::Json;
use axum::extract::State;
use tracing::{info, instrument};
use utoipa::ToSchema;

use maleva_auth::AuthError;
use maleva_core::AppError;

use super::model::{LoginRequest, LoginResponse, MessageResponse};
use crate::metrics::{track_login_failure, track_login_success, track_logout, track_store_failure};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[derive(ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Login and receive a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing or empty username/password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Token could not be signed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let session = state
        .issuer
        .issue(&dto.username, &dto.password)
        .await
        .inspect_err(|e| track_login_failure(e.reason()))?;

    track_login_success();
    if !session.recorded {
        track_store_failure("issue");
    }

    Ok(Json(LoginResponse {
        token: session.token,
        expires: session.expires_at,
    }))
}

/// Revoke the current session token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 400, description = "Token does not contain a token id", body = ErrorResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    let termination = state
        .terminator
        .terminate(&identity)
        .await
        .map_err(|e| match e {
            AuthError::Missing => AppError::bad_request(anyhow!("Token does not contain jti.")),
            other => other.into(),
        })?;

    track_logout();
    if !termination.records_removed {
        track_store_failure("logout");
    }
    info!(auth.subject = %identity.subject, "User logged out");

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// Protected greeting for the authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/welcome",
    responses(
        (status = 200, description = "Greeting", body = MessageResponse),
        (status = 401, description = "Invalid or expired token", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn welcome(AuthUser(identity): AuthUser) -> Json<MessageResponse> {
    let name = match identity.display_name() {
        "" => "user",
        name => name,
    };

    Json(MessageResponse {
        message: format!("Welcome, {}!", name),
    })
}
