//! DTOs for energy renovation projects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::EnergyProjectInput;
use crate::domain::entities::{EnergyLabel, EnergyMeasure, EnergyProject, ProjectStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEnergyProjectRequest {
    #[validate(range(min = 1))]
    pub property_id: i64,

    pub measure: EnergyMeasure,

    #[validate(range(min = 0, max = 1_000_000, message = "estimated_cost must be 0-1000000"))]
    pub estimated_cost: i64,

    pub label_after: Option<EnergyLabel>,
}

impl From<CreateEnergyProjectRequest> for EnergyProjectInput {
    fn from(r: CreateEnergyProjectRequest) -> Self {
        Self {
            property_id: r.property_id,
            measure: r.measure,
            estimated_cost: r.estimated_cost,
            label_after: r.label_after,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectStatusRequest {
    pub status: ProjectStatus,
}

#[derive(Debug, Serialize)]
pub struct EnergyProjectResponse {
    pub id: i64,
    pub property_id: i64,
    pub measure: EnergyMeasure,
    pub status: ProjectStatus,
    pub estimated_cost: i64,
    pub estimated_yearly_savings: i64,
    /// Years until savings cover the cost; absent for free measures.
    pub payback_years: Option<f64>,
    pub label_before: Option<EnergyLabel>,
    pub label_after: Option<EnergyLabel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EnergyProject> for EnergyProjectResponse {
    fn from(p: EnergyProject) -> Self {
        let savings = p.measure.estimated_yearly_savings();
        let payback_years = (p.estimated_cost > 0 && savings > 0)
            .then(|| ((p.estimated_cost as f64 / savings as f64) * 10.0).round() / 10.0);

        Self {
            id: p.id,
            property_id: p.property_id,
            measure: p.measure,
            status: p.status,
            estimated_cost: p.estimated_cost,
            estimated_yearly_savings: savings,
            payback_years,
            label_before: p.label_before,
            label_after: p.label_after,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EnergyProjectListResponse {
    pub items: Vec<EnergyProjectResponse>,
}
