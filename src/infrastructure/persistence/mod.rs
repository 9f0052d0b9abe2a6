//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgPropertyRepository`] - Listings and city aggregates
//! - [`PgEnergyProjectRepository`] - Renovation projects
//! - [`PgValuationRepository`] - Valuation estimates
//! - [`PgSessionRepository`] - Session token storage and validation
//! - [`PgUserRepository`] - User accounts

pub mod pg_energy_project_repository;
pub mod pg_property_repository;
pub mod pg_session_repository;
pub mod pg_user_repository;
pub mod pg_valuation_repository;

pub use pg_energy_project_repository::PgEnergyProjectRepository;
pub use pg_property_repository::PgPropertyRepository;
pub use pg_session_repository::PgSessionRepository;
pub use pg_user_repository::PgUserRepository;
pub use pg_valuation_repository::PgValuationRepository;

use crate::error::AppError;
use serde_json::json;
use std::str::FromStr;

/// Parses a text column holding an enum value.
fn parse_column<T>(column: &'static str, value: &str) -> Result<T, AppError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|reason: String| {
        AppError::internal(
            "Corrupt database row",
            json!({ "column": column, "reason": reason }),
        )
    })
}

/// Parses a nullable text column holding an enum value.
fn parse_optional_column<T>(column: &'static str, value: Option<&str>) -> Result<Option<T>, AppError>
where
    T: FromStr<Err = String>,
{
    value.map(|v| parse_column(column, v)).transpose()
}
