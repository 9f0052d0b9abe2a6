use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use super::{parse_column, parse_optional_column};
use crate::domain::entities::{EnergyProject, NewEnergyProject, ProjectStatus};
use crate::domain::repositories::EnergyProjectRepository;
use crate::error::AppError;

const PROJECT_COLUMNS: &str = "id, property_id, owner_id, measure, status, estimated_cost, \
     label_before, label_after, created_at, updated_at";

#[derive(FromRow)]
struct EnergyProjectRow {
    id: i64,
    property_id: i64,
    owner_id: i64,
    measure: String,
    status: String,
    estimated_cost: i64,
    label_before: Option<String>,
    label_after: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<EnergyProjectRow> for EnergyProject {
    type Error = AppError;

    fn try_from(row: EnergyProjectRow) -> Result<Self, Self::Error> {
        Ok(EnergyProject {
            id: row.id,
            property_id: row.property_id,
            owner_id: row.owner_id,
            measure: parse_column("measure", &row.measure)?,
            status: parse_column("status", &row.status)?,
            estimated_cost: row.estimated_cost,
            label_before: parse_optional_column("label_before", row.label_before.as_deref())?,
            label_after: parse_optional_column("label_after", row.label_after.as_deref())?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PgEnergyProjectRepository {
    pool: Arc<PgPool>,
}

impl PgEnergyProjectRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EnergyProjectRepository for PgEnergyProjectRepository {
    async fn create(&self, new_project: NewEnergyProject) -> Result<EnergyProject, AppError> {
        let sql = format!(
            r#"
            INSERT INTO energy_projects (
                property_id, owner_id, measure, estimated_cost, label_before, label_after
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, EnergyProjectRow>(&sql)
            .bind(new_project.property_id)
            .bind(new_project.owner_id)
            .bind(new_project.measure.as_str())
            .bind(new_project.estimated_cost)
            .bind(new_project.label_before.map(|l| l.as_str()))
            .bind(new_project.label_after.map(|l| l.as_str()))
            .fetch_one(self.pool.as_ref())
            .await?
            .try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<EnergyProject>, AppError> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM energy_projects WHERE id = $1");

        sqlx::query_as::<_, EnergyProjectRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(EnergyProject::try_from)
            .transpose()
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<EnergyProject>, AppError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM energy_projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, EnergyProjectRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(EnergyProject::try_from)
            .collect()
    }

    async fn update_status(
        &self,
        id: i64,
        status: ProjectStatus,
    ) -> Result<Option<EnergyProject>, AppError> {
        let sql = format!(
            r#"
            UPDATE energy_projects
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, EnergyProjectRow>(&sql)
            .bind(id)
            .bind(status.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(EnergyProject::try_from)
            .transpose()
    }
}
