//! DTOs for valuations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{Valuation, ValuationBasis};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateValuationRequest {
    #[validate(range(min = 1))]
    pub property_id: i64,
}

#[derive(Debug, Serialize)]
pub struct ValuationResponse {
    pub id: i64,
    pub property_id: i64,
    pub estimated_value: i64,
    pub low_estimate: i64,
    pub high_estimate: i64,
    pub price_per_m2: Option<i64>,
    pub basis: ValuationBasis,
    pub region_source: String,
    pub created_at: DateTime<Utc>,
}

impl From<Valuation> for ValuationResponse {
    fn from(v: Valuation) -> Self {
        Self {
            id: v.id,
            property_id: v.property_id,
            estimated_value: v.estimated_value,
            low_estimate: v.low_estimate,
            high_estimate: v.high_estimate,
            price_per_m2: v.price_per_m2,
            basis: v.basis,
            region_source: v.region_source,
            created_at: v.created_at,
        }
    }
}
