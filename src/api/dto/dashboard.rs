//! DTOs for the user dashboard.

use serde::Serialize;

use super::energy::EnergyProjectResponse;
use super::property::PropertyResponse;
use super::valuation::ValuationResponse;
use crate::application::services::{Dashboard, DashboardTotals};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub properties: Vec<PropertyResponse>,
    pub energy_projects: Vec<EnergyProjectResponse>,
    pub recent_valuations: Vec<ValuationResponse>,
    pub totals: DashboardTotalsResponse,
}

#[derive(Debug, Serialize)]
pub struct DashboardTotalsResponse {
    pub property_count: usize,
    pub listed_value: i64,
    pub active_projects: usize,
    pub estimated_yearly_savings: i64,
}

impl From<Dashboard> for DashboardResponse {
    fn from(d: Dashboard) -> Self {
        let DashboardTotals {
            listed_value,
            active_projects,
            estimated_yearly_savings,
        } = d.totals;

        Self {
            totals: DashboardTotalsResponse {
                property_count: d.properties.len(),
                listed_value,
                active_projects,
                estimated_yearly_savings,
            },
            properties: d.properties.into_iter().map(Into::into).collect(),
            energy_projects: d.energy_projects.into_iter().map(Into::into).collect(),
            recent_valuations: d.recent_valuations.into_iter().map(Into::into).collect(),
        }
    }
}
