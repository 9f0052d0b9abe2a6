//! City market overview from listings and national statistics.

use std::sync::Arc;
use tracing::debug;

use crate::domain::blending::blend_market_overview;
use crate::domain::entities::MarketOverview;
use crate::domain::gateways::RegionalStatisticsSource;
use crate::domain::repositories::PropertyRepository;
use crate::error::AppError;

pub struct MarketService {
    properties: Arc<dyn PropertyRepository>,
    statistics: Arc<dyn RegionalStatisticsSource>,
}

impl MarketService {
    pub fn new(
        properties: Arc<dyn PropertyRepository>,
        statistics: Arc<dyn RegionalStatisticsSource>,
    ) -> Self {
        Self {
            properties,
            statistics,
        }
    }

    /// Builds the overview for a city.
    ///
    /// The listing aggregate and the regional dataset are fetched concurrently;
    /// if either fails the whole request fails.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a blank city and
    /// [`AppError::Internal`] if the database or the statistics service fails.
    pub async fn overview(&self, city: &str) -> Result<MarketOverview, AppError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(AppError::invalid_field("city", "required", "city is required"));
        }

        let (listings, regions) = tokio::try_join!(self.properties.city_stats(city), async {
            self.statistics
                .fetch_regions()
                .await
                .map_err(AppError::from)
        })?;

        let overview = blend_market_overview(city, &listings, &regions);
        debug!(
            city = %overview.city,
            source = overview.source.as_str(),
            matched_region = ?overview.matched_region,
            "Market overview built"
        );

        Ok(overview)
    }
}
