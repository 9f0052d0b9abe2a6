//! Handlers for valuations.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::valuation::{CreateValuationRequest, ValuationResponse};
use crate::api::extractors::{ClientIdentity, CurrentUser, ValidatedJson};
use crate::application::services::policies;
use crate::error::AppError;
use crate::state::AppState;

/// Estimates and stores the value of a listing.
///
/// # Endpoint
///
/// `POST /api/valuations`
///
/// # Errors
///
/// Returns 404 for an unknown listing, 429 when the `valuation` budget is
/// spent and 500 if the CBS API fails.
pub async fn create_valuation_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    identity: ClientIdentity,
    ValidatedJson(payload): ValidatedJson<CreateValuationRequest>,
) -> Result<(StatusCode, Json<ValuationResponse>), AppError> {
    state
        .rate_limiter
        .enforce(policies::VALUATION, identity.as_str())
        .await?;

    let valuation = state
        .valuation_service
        .create(user, payload.property_id)
        .await?;

    Ok((StatusCode::CREATED, Json(valuation.into())))
}

/// # Endpoint
///
/// `GET /api/valuations/{id}`
pub async fn get_valuation_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ValuationResponse>, AppError> {
    let valuation = state.valuation_service.get(user, id).await?;
    Ok(Json(valuation.into()))
}
