//! Bearer session authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use tracing::warn;

use crate::{error::AppError, state::AppState};

/// Authenticates requests using the access token in the `Authorization` header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <access token>
/// ```
///
/// On success the resolved [`AuthenticatedUser`](crate::domain::entities::AuthenticatedUser)
/// is stored in the request extensions, where
/// [`CurrentUser`](crate::api::extractors::CurrentUser) and
/// [`ClientIdentity`](crate::api::extractors::ClientIdentity) pick it up.
///
/// # Errors
///
/// Returns `401 Unauthorized` (with `WWW-Authenticate: Bearer`) if the header
/// is missing or malformed, or the session is unknown, revoked or expired.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            warn!(target: "security", path = %parts.uri.path(), "Missing or malformed Authorization header");
            AppError::unauthorized(
                "Unauthorized",
                serde_json::json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let user = st.auth_service.authenticate(&token).await.inspect_err(|_| {
        warn!(target: "security", path = %parts.uri.path(), "Rejected access token");
    })?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
