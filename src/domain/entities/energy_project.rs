//! Energy renovation project entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::property::EnergyLabel;

/// Renovation measure with a static yearly savings estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyMeasure {
    RoofInsulation,
    WallInsulation,
    FloorInsulation,
    HrGlass,
    HeatPump,
    SolarPanels,
}

impl EnergyMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyMeasure::RoofInsulation => "roof_insulation",
            EnergyMeasure::WallInsulation => "wall_insulation",
            EnergyMeasure::FloorInsulation => "floor_insulation",
            EnergyMeasure::HrGlass => "hr_glass",
            EnergyMeasure::HeatPump => "heat_pump",
            EnergyMeasure::SolarPanels => "solar_panels",
        }
    }

    /// Typical yearly energy bill reduction in euros for an average dwelling.
    pub fn estimated_yearly_savings(&self) -> i64 {
        match self {
            EnergyMeasure::RoofInsulation => 570,
            EnergyMeasure::WallInsulation => 420,
            EnergyMeasure::FloorInsulation => 230,
            EnergyMeasure::HrGlass => 280,
            EnergyMeasure::HeatPump => 900,
            EnergyMeasure::SolarPanels => 650,
        }
    }
}

impl FromStr for EnergyMeasure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "roof_insulation" => Ok(EnergyMeasure::RoofInsulation),
            "wall_insulation" => Ok(EnergyMeasure::WallInsulation),
            "floor_insulation" => Ok(EnergyMeasure::FloorInsulation),
            "hr_glass" => Ok(EnergyMeasure::HrGlass),
            "heat_pump" => Ok(EnergyMeasure::HeatPump),
            "solar_panels" => Ok(EnergyMeasure::SolarPanels),
            other => Err(format!("unknown energy measure '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }

    /// Planned and in-progress projects count as active.
    pub fn is_active(&self) -> bool {
        matches!(self, ProjectStatus::Planned | ProjectStatus::InProgress)
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(ProjectStatus::Planned),
            "in_progress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            other => Err(format!("unknown project status '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnergyProject {
    pub id: i64,
    pub property_id: i64,
    pub owner_id: i64,
    pub measure: EnergyMeasure,
    pub status: ProjectStatus,
    pub estimated_cost: i64,
    pub label_before: Option<EnergyLabel>,
    pub label_after: Option<EnergyLabel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEnergyProject {
    pub property_id: i64,
    pub owner_id: i64,
    pub measure: EnergyMeasure,
    pub estimated_cost: i64,
    pub label_before: Option<EnergyLabel>,
    pub label_after: Option<EnergyLabel>,
}
