//! Handlers for energy renovation projects.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::energy::{
    CreateEnergyProjectRequest, EnergyProjectListResponse, EnergyProjectResponse,
    UpdateProjectStatusRequest,
};
use crate::api::extractors::{ClientIdentity, CurrentUser, ValidatedJson};
use crate::application::services::policies;
use crate::error::AppError;
use crate::state::AppState;

/// # Endpoint
///
/// `GET /api/energy-projects`
pub async fn list_energy_projects_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<EnergyProjectListResponse>, AppError> {
    let projects = state.energy_service.list(user).await?;

    Ok(Json(EnergyProjectListResponse {
        items: projects.into_iter().map(Into::into).collect(),
    }))
}

/// Starts a renovation project for a listing the caller manages.
///
/// # Endpoint
///
/// `POST /api/energy-projects`
///
/// # Errors
///
/// Returns 400 if `label_after` is worse than the current label, 403 for
/// listings of other users and 429 when the `energy_project` budget is spent.
pub async fn create_energy_project_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    identity: ClientIdentity,
    ValidatedJson(payload): ValidatedJson<CreateEnergyProjectRequest>,
) -> Result<(StatusCode, Json<EnergyProjectResponse>), AppError> {
    state
        .rate_limiter
        .enforce(policies::ENERGY_PROJECT, identity.as_str())
        .await?;

    let project = state.energy_service.create(user, payload.into()).await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// # Endpoint
///
/// `PATCH /api/energy-projects/{id}/status`
///
/// # Errors
///
/// Returns 409 when a completed or cancelled project is moved to another
/// status.
pub async fn update_energy_project_status_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateProjectStatusRequest>,
) -> Result<Json<EnergyProjectResponse>, AppError> {
    let project = state
        .energy_service
        .update_status(user, id, payload.status)
        .await?;

    Ok(Json(project.into()))
}
