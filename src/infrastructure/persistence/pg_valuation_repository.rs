use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use super::parse_column;
use crate::domain::entities::{NewValuation, Valuation};
use crate::domain::repositories::ValuationRepository;
use crate::error::AppError;

const VALUATION_COLUMNS: &str = "id, property_id, requested_by, estimated_value, low_estimate, \
     high_estimate, price_per_m2, basis, region_source, created_at";

#[derive(FromRow)]
struct ValuationRow {
    id: i64,
    property_id: i64,
    requested_by: i64,
    estimated_value: i64,
    low_estimate: i64,
    high_estimate: i64,
    price_per_m2: Option<i64>,
    basis: String,
    region_source: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ValuationRow> for Valuation {
    type Error = AppError;

    fn try_from(row: ValuationRow) -> Result<Self, Self::Error> {
        Ok(Valuation {
            id: row.id,
            property_id: row.property_id,
            requested_by: row.requested_by,
            estimated_value: row.estimated_value,
            low_estimate: row.low_estimate,
            high_estimate: row.high_estimate,
            price_per_m2: row.price_per_m2,
            basis: parse_column("basis", &row.basis)?,
            region_source: row.region_source,
            created_at: row.created_at,
        })
    }
}

/// PostgreSQL repository for valuation estimates.
pub struct PgValuationRepository {
    pool: Arc<PgPool>,
}

impl PgValuationRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ValuationRepository for PgValuationRepository {
    async fn create(&self, new_valuation: NewValuation) -> Result<Valuation, AppError> {
        let sql = format!(
            r#"
            INSERT INTO valuations (
                property_id, requested_by, estimated_value, low_estimate, high_estimate,
                price_per_m2, basis, region_source
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {VALUATION_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ValuationRow>(&sql)
            .bind(new_valuation.property_id)
            .bind(new_valuation.requested_by)
            .bind(new_valuation.estimated_value)
            .bind(new_valuation.low_estimate)
            .bind(new_valuation.high_estimate)
            .bind(new_valuation.price_per_m2)
            .bind(new_valuation.basis.as_str())
            .bind(new_valuation.region_source)
            .fetch_one(self.pool.as_ref())
            .await?
            .try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Valuation>, AppError> {
        let sql = format!("SELECT {VALUATION_COLUMNS} FROM valuations WHERE id = $1");

        sqlx::query_as::<_, ValuationRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Valuation::try_from)
            .transpose()
    }

    async fn recent_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Valuation>, AppError> {
        let sql = format!(
            r#"
            SELECT {VALUATION_COLUMNS}
            FROM valuations
            WHERE requested_by = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#
        );

        sqlx::query_as::<_, ValuationRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(Valuation::try_from)
            .collect()
    }
}
