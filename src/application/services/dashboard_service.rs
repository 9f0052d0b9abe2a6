//! Per-user dashboard aggregate.

use std::sync::Arc;

use crate::domain::entities::{EnergyProject, ListingStatus, Property, ProjectStatus, Valuation};
use crate::domain::repositories::{
    EnergyProjectRepository, PropertyRepository, ValuationRepository,
};
use crate::error::AppError;

/// Number of valuations shown on the dashboard.
pub const RECENT_VALUATIONS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardTotals {
    /// Sum of asking prices of listings that are not sold.
    pub listed_value: i64,
    pub active_projects: usize,
    /// Yearly savings of all projects that were not cancelled.
    pub estimated_yearly_savings: i64,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub properties: Vec<Property>,
    pub energy_projects: Vec<EnergyProject>,
    pub recent_valuations: Vec<Valuation>,
    pub totals: DashboardTotals,
}

pub struct DashboardService {
    properties: Arc<dyn PropertyRepository>,
    projects: Arc<dyn EnergyProjectRepository>,
    valuations: Arc<dyn ValuationRepository>,
}

impl DashboardService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        projects: Arc<dyn EnergyProjectRepository>,
        valuations: Arc<dyn ValuationRepository>,
    ) -> Self {
        Self {
            properties,
            projects,
            valuations,
        }
    }

    /// Loads listings, projects and recent valuations of a user concurrently.
    pub async fn for_user(&self, user_id: i64) -> Result<Dashboard, AppError> {
        let (properties, energy_projects, recent_valuations) = tokio::try_join!(
            self.properties.list_by_owner(user_id),
            self.projects.list_by_owner(user_id),
            self.valuations.recent_by_user(user_id, RECENT_VALUATIONS),
        )?;

        let totals = compute_totals(&properties, &energy_projects);

        Ok(Dashboard {
            properties,
            energy_projects,
            recent_valuations,
            totals,
        })
    }
}

fn compute_totals(properties: &[Property], projects: &[EnergyProject]) -> DashboardTotals {
    DashboardTotals {
        listed_value: properties
            .iter()
            .filter(|p| p.status != ListingStatus::Sold)
            .map(|p| p.asking_price)
            .sum(),
        active_projects: projects.iter().filter(|p| p.status.is_active()).count(),
        estimated_yearly_savings: projects
            .iter()
            .filter(|p| p.status != ProjectStatus::Cancelled)
            .map(|p| p.measure.estimated_yearly_savings())
            .sum(),
    }
}
