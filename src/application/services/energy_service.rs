//! Energy renovation projects.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::property_service::ensure_can_manage;
use crate::domain::entities::{
    AuthenticatedUser, EnergyLabel, EnergyMeasure, EnergyProject, NewEnergyProject, ProjectStatus,
};
use crate::domain::repositories::{EnergyProjectRepository, PropertyRepository};
use crate::error::AppError;

/// Caller input for a new project.
#[derive(Debug, Clone)]
pub struct EnergyProjectInput {
    pub property_id: i64,
    pub measure: EnergyMeasure,
    pub estimated_cost: i64,
    pub label_after: Option<EnergyLabel>,
}

pub struct EnergyService {
    properties: Arc<dyn PropertyRepository>,
    projects: Arc<dyn EnergyProjectRepository>,
}

impl EnergyService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        projects: Arc<dyn EnergyProjectRepository>,
    ) -> Self {
        Self {
            properties,
            projects,
        }
    }

    pub async fn list(&self, caller: AuthenticatedUser) -> Result<Vec<EnergyProject>, AppError> {
        self.projects.list_by_owner(caller.user_id).await
    }

    /// Creates a project for a listing the caller manages.
    ///
    /// The current label of the listing is recorded as `label_before`.
    pub async fn create(
        &self,
        caller: AuthenticatedUser,
        input: EnergyProjectInput,
    ) -> Result<EnergyProject, AppError> {
        let property = self
            .properties
            .find_by_id(input.property_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("Property not found", json!({ "id": input.property_id }))
            })?;
        ensure_can_manage(caller, property.owner_id, "property", property.id)?;

        if let (Some(before), Some(after)) = (property.energy_label, input.label_after)
            && after > before
        {
            return Err(AppError::invalid_field(
                "label_after",
                "worse_label",
                "label_after must not be worse than the current label",
            ));
        }

        let project = self
            .projects
            .create(NewEnergyProject {
                property_id: property.id,
                owner_id: property.owner_id,
                measure: input.measure,
                estimated_cost: input.estimated_cost,
                label_before: property.energy_label,
                label_after: input.label_after,
            })
            .await?;

        info!(
            target: "audit",
            user_id = caller.user_id,
            project_id = project.id,
            measure = project.measure.as_str(),
            "Energy project created"
        );

        Ok(project)
    }

    /// Moves a project to a new status.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the project is already completed or
    /// cancelled.
    pub async fn update_status(
        &self,
        caller: AuthenticatedUser,
        id: i64,
        status: ProjectStatus,
    ) -> Result<EnergyProject, AppError> {
        let project = self
            .projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Energy project not found", json!({ "id": id })))?;
        ensure_can_manage(caller, project.owner_id, "energy_project", id)?;

        if !project.status.is_active() && project.status != status {
            return Err(AppError::conflict(
                "Project is already closed",
                json!({ "id": id, "status": project.status.as_str() }),
            ));
        }

        let updated = self
            .projects
            .update_status(id, status)
            .await?
            .ok_or_else(|| AppError::not_found("Energy project not found", json!({ "id": id })))?;

        info!(
            target: "audit",
            user_id = caller.user_id,
            project_id = id,
            status = status.as_str(),
            "Energy project status changed"
        );

        Ok(updated)
    }
}
