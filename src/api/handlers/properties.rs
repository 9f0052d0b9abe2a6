//! Handlers for property listings.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::pagination::PaginationMeta;
use crate::api::dto::property::{
    CreatePropertyRequest, PropertyListQuery, PropertyListResponse, PropertyResponse,
};
use crate::api::extractors::{ClientIdentity, CurrentUser, ValidatedJson, ValidatedQuery};
use crate::application::services::policies;
use crate::error::AppError;
use crate::state::AppState;

/// Lists listings, newest first.
///
/// # Endpoint
///
/// `GET /api/properties`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 20, max: 100)
/// - `city` (optional): Case-insensitive city name
/// - `min_price` / `max_price` (optional): Asking price range in euros
///
/// # Errors
///
/// Returns 400 if pagination parameters are invalid or `min_price > max_price`.
pub async fn list_properties_handler(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<PropertyListQuery>,
) -> Result<Json<PropertyListResponse>, AppError> {
    let (offset, limit) = params.pagination.validate_and_get_offset_limit()?;

    let (items, total_items) = state
        .property_service
        .list(params.filter(), offset, limit)
        .await?;

    Ok(Json(PropertyListResponse {
        pagination: PaginationMeta::new(
            params.pagination.page(),
            params.pagination.page_size(),
            total_items,
        ),
        items: items.into_iter().map(Into::into).collect(),
    }))
}

/// # Endpoint
///
/// `GET /api/properties/{id}`
pub async fn get_property_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropertyResponse>, AppError> {
    let property = state.property_service.get(id).await?;
    Ok(Json(property.into()))
}

/// Creates a listing owned by the caller.
///
/// # Endpoint
///
/// `POST /api/properties`
///
/// # Errors
///
/// Returns 400 with the offending fields when the body is incomplete or
/// invalid, and 429 when the `create_property` budget is spent.
pub async fn create_property_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    identity: ClientIdentity,
    ValidatedJson(payload): ValidatedJson<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyResponse>), AppError> {
    state
        .rate_limiter
        .enforce(policies::CREATE_PROPERTY, identity.as_str())
        .await?;

    let property = state
        .property_service
        .create(user, payload.into_new_property())
        .await?;

    Ok((StatusCode::CREATED, Json(property.into())))
}

/// # Endpoint
///
/// `DELETE /api/properties/{id}`
///
/// # Errors
///
/// Returns 403 unless the caller owns the listing or is an admin.
pub async fn delete_property_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.property_service.delete(user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
