//! Handlers for session refresh and logout.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::api::dto::auth::TokenResponse;
use crate::api::extractors::ClientIdentity;
use crate::application::services::policies;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::cookies::{
    REFRESH_COOKIE_NAME, build_refresh_cookie, clear_refresh_cookie, read_cookie,
};

/// Rotates the refresh token and issues a new access token.
///
/// # Endpoint
///
/// `POST /api/auth/refresh`
///
/// The refresh token is read from the `refresh_token` cookie; the rotated
/// one is returned in `Set-Cookie`.
///
/// # Errors
///
/// Returns 401 if the cookie is missing or the token is not active and 429
/// when the `auth_refresh` budget is spent.
pub async fn refresh_handler(
    State(state): State<AppState>,
    identity: ClientIdentity,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    state
        .rate_limiter
        .enforce(policies::AUTH_REFRESH, identity.as_str())
        .await?;

    let token = read_cookie(&headers, REFRESH_COOKIE_NAME).ok_or_else(|| {
        AppError::unauthorized("Unauthorized", json!({"reason": "Refresh cookie is missing"}))
    })?;

    let tokens = state.auth_service.refresh(&token).await?;

    Ok((
        [(header::SET_COOKIE, build_refresh_cookie(&tokens.refresh_token))],
        Json(TokenResponse::from(&tokens)),
    ))
}

/// Revokes the refresh token and clears the cookie.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// Always answers 204; a missing or unknown token only clears the cookie.
pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    if let Some(token) = read_cookie(&headers, REFRESH_COOKIE_NAME) {
        state.auth_service.logout(&token).await?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_refresh_cookie())],
    ))
}
