//! Property valuation estimates.

use serde_json::json;
use std::sync::Arc;
use tracing::info;

use super::market_service::MarketService;
use super::property_service::ensure_can_manage;
use crate::domain::entities::{AuthenticatedUser, NewValuation, Valuation};
use crate::domain::pricing::estimate_value;
use crate::domain::repositories::{PropertyRepository, ValuationRepository};
use crate::error::AppError;

pub struct ValuationService {
    properties: Arc<dyn PropertyRepository>,
    valuations: Arc<dyn ValuationRepository>,
    market: Arc<MarketService>,
}

impl ValuationService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        valuations: Arc<dyn ValuationRepository>,
        market: Arc<MarketService>,
    ) -> Self {
        Self {
            properties,
            valuations,
            market,
        }
    }

    /// Estimates the value of a listing and stores the estimate for the caller.
    ///
    /// Regional price level and yearly change come from the market overview
    /// of the listing's city, so the national defaults apply when no region
    /// matches.
    pub async fn create(
        &self,
        caller: AuthenticatedUser,
        property_id: i64,
    ) -> Result<Valuation, AppError> {
        let property = self.properties.find_by_id(property_id).await?.ok_or_else(|| {
            AppError::not_found("Property not found", json!({ "id": property_id }))
        })?;

        let market = self.market.overview(&property.city).await?;
        let estimate = estimate_value(
            &property,
            market.average_price_per_m2,
            market.yearly_change_pct,
        );

        let valuation = self
            .valuations
            .create(NewValuation {
                property_id,
                requested_by: caller.user_id,
                estimated_value: estimate.estimated_value,
                low_estimate: estimate.low_estimate,
                high_estimate: estimate.high_estimate,
                price_per_m2: estimate.price_per_m2,
                basis: estimate.basis,
                region_source: market.source.as_str().to_string(),
            })
            .await?;

        info!(
            target: "audit",
            user_id = caller.user_id,
            property_id,
            valuation_id = valuation.id,
            estimated_value = valuation.estimated_value,
            "Valuation created"
        );

        Ok(valuation)
    }

    /// Reads a valuation requested by the caller (admins may read any).
    pub async fn get(&self, caller: AuthenticatedUser, id: i64) -> Result<Valuation, AppError> {
        let valuation = self
            .valuations
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Valuation not found", json!({ "id": id })))?;

        ensure_can_manage(caller, valuation.requested_by, "valuation", id)?;
        Ok(valuation)
    }
}
