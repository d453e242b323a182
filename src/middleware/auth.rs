use anyhow::anyhow;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use maleva_auth::{AuthError, Identity};
use maleva_core::AppError;

use crate::metrics::{track_store_failure, track_token_validation};
use crate::state::AppState;

/// Extractor that validates the bearer token against the revocation store
/// and yields the caller's identity.
///
/// Every token failure is rejected with the same 401 body.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::unauthorized(anyhow!("Missing authorization header"))
                    } else {
                        AppError::unauthorized(anyhow!("Invalid authorization header format"))
                    }
                })?;

        match state.validator.validate(bearer.token()).await {
            Ok(identity) => {
                track_token_validation(None);
                Ok(AuthUser(identity))
            }
            Err(e) => {
                track_token_validation(Some(e.reason()));
                if matches!(e, AuthError::StoreUnavailable(_)) {
                    track_store_failure("validate");
                }
                Err(e.into())
            }
        }
    }
}
