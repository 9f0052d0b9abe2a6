//! PostgreSQL implementation of property repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use std::sync::Arc;

use super::{parse_column, parse_optional_column};
use crate::domain::entities::{CityListingStats, NewProperty, Property, PropertyFilter};
use crate::domain::repositories::PropertyRepository;
use crate::error::AppError;

const PROPERTY_COLUMNS: &str = "id, owner_id, title, street, house_number, postal_code, city, \
     asking_price, living_area_m2, rooms, property_type, energy_label, woz_value, status, \
     created_at, updated_at";

#[derive(FromRow)]
struct PropertyRow {
    id: i64,
    owner_id: i64,
    title: String,
    street: String,
    house_number: String,
    postal_code: String,
    city: String,
    asking_price: i64,
    living_area_m2: i32,
    rooms: i32,
    property_type: String,
    energy_label: Option<String>,
    woz_value: Option<i64>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = AppError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        Ok(Property {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            street: row.street,
            house_number: row.house_number,
            postal_code: row.postal_code,
            city: row.city,
            asking_price: row.asking_price,
            living_area_m2: row.living_area_m2,
            rooms: row.rooms,
            property_type: parse_column("property_type", &row.property_type)?,
            energy_label: parse_optional_column("energy_label", row.energy_label.as_deref())?,
            woz_value: row.woz_value,
            status: parse_column("status", &row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct CityStatsRow {
    listing_count: i64,
    average_asking_price: Option<f64>,
    average_price_per_m2: Option<f64>,
}

/// PostgreSQL repository for listings.
pub struct PgPropertyRepository {
    pool: Arc<PgPool>,
}

impl PgPropertyRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Appends the `WHERE` clause for a listing filter.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &PropertyFilter) {
    builder.push(" WHERE TRUE");

    if let Some(city) = &filter.city {
        builder.push(" AND LOWER(city) = LOWER(");
        builder.push_bind(city.clone());
        builder.push(")");
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND asking_price >= ");
        builder.push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND asking_price <= ");
        builder.push_bind(max_price);
    }
}

#[async_trait]
impl PropertyRepository for PgPropertyRepository {
    async fn create(&self, new_property: NewProperty) -> Result<Property, AppError> {
        let sql = format!(
            r#"
            INSERT INTO properties (
                owner_id, title, street, house_number, postal_code, city,
                asking_price, living_area_m2, rooms, property_type, energy_label, woz_value
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {PROPERTY_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(new_property.owner_id)
            .bind(new_property.title)
            .bind(new_property.street)
            .bind(new_property.house_number)
            .bind(new_property.postal_code)
            .bind(new_property.city)
            .bind(new_property.asking_price)
            .bind(new_property.living_area_m2)
            .bind(new_property.rooms)
            .bind(new_property.property_type.as_str())
            .bind(new_property.energy_label.map(|l| l.as_str()))
            .bind(new_property.woz_value)
            .fetch_one(self.pool.as_ref())
            .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Property>, AppError> {
        let sql = format!("SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1");

        sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?
            .map(Property::try_from)
            .transpose()
    }

    async fn list(
        &self,
        filter: PropertyFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties"
        ));
        push_filter(&mut builder, &filter);
        builder.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        builder
            .build_query_as::<PropertyRow>()
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(Property::try_from)
            .collect()
    }

    async fn count(&self, filter: PropertyFilter) -> Result<i64, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM properties");
        push_filter(&mut builder, &filter);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Property>, AppError> {
        let sql = format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE owner_id = $1 ORDER BY created_at DESC"
        );

        sqlx::query_as::<_, PropertyRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(Property::try_from)
            .collect()
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn city_stats(&self, city: &str) -> Result<CityListingStats, AppError> {
        let row = sqlx::query_as::<_, CityStatsRow>(
            r#"
            SELECT
                COUNT(*) AS listing_count,
                AVG(asking_price)::DOUBLE PRECISION AS average_asking_price,
                AVG(asking_price::DOUBLE PRECISION / NULLIF(living_area_m2, 0)) AS average_price_per_m2
            FROM properties
            WHERE LOWER(city) = LOWER($1)
              AND status <> 'sold'
            "#,
        )
        .bind(city.trim())
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(CityListingStats {
            listing_count: row.listing_count,
            average_asking_price: row.average_asking_price,
            average_price_per_m2: row.average_price_per_m2,
        })
    }
}
