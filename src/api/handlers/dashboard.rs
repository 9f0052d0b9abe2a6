//! Handler for the user dashboard.

use axum::{Json, extract::State};

use crate::api::dto::dashboard::DashboardResponse;
use crate::api::extractors::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Listings, renovation projects and recent valuations of the caller.
///
/// # Endpoint
///
/// `GET /api/dashboard`
pub async fn dashboard_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardResponse>, AppError> {
    let dashboard = state.dashboard_service.for_user(user.user_id).await?;
    Ok(Json(dashboard.into()))
}
