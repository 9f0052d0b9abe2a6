//! Joins database listing aggregates with regional statistics.
//!
//! Regions are matched to a city name by case-insensitive substring
//! containment in either direction. The dataset is scanned in order and the
//! first match wins; there is no scoring.

use crate::domain::entities::{CityListingStats, MarketOverview, MarketSource, RegionStatistic};

/// National average sale price in euros, used when no region matches.
pub const DEFAULT_AVERAGE_SALE_PRICE: f64 = 429_000.0;

/// National year-on-year price change in percent.
pub const DEFAULT_YEARLY_CHANGE_PCT: f64 = 8.5;

/// Average asking price used when the city has no listings.
pub const DEFAULT_AVERAGE_ASKING_PRICE: f64 = 450_000.0;

/// Average asking price per m² used when the city has no listings.
pub const DEFAULT_PRICE_PER_M2: f64 = 4_750.0;

/// Finds the first region whose name contains the city or is contained in it.
///
/// Blank names on either side never match.
pub fn find_region<'a>(city: &str, regions: &'a [RegionStatistic]) -> Option<&'a RegionStatistic> {
    let city = city.trim().to_lowercase();
    if city.is_empty() {
        return None;
    }

    regions.iter().find(|region| {
        let name = region.region_name.trim().to_lowercase();
        !name.is_empty() && (name.contains(&city) || city.contains(&name))
    })
}

/// Builds the market overview for `city`.
///
/// Missing database aggregates and unmatched or incomplete regional data fall
/// back to the national defaults above.
pub fn blend_market_overview(
    city: &str,
    listings: &CityListingStats,
    regions: &[RegionStatistic],
) -> MarketOverview {
    let region = find_region(city, regions);

    let (regional_average_sale_price, yearly_change_pct, source) = match region {
        Some(r) => (
            r.average_sale_price.unwrap_or(DEFAULT_AVERAGE_SALE_PRICE),
            r.yearly_change_pct.unwrap_or(DEFAULT_YEARLY_CHANGE_PCT),
            MarketSource::Cbs,
        ),
        None => (
            DEFAULT_AVERAGE_SALE_PRICE,
            DEFAULT_YEARLY_CHANGE_PCT,
            MarketSource::DatabaseOnly,
        ),
    };

    MarketOverview {
        city: city.trim().to_string(),
        listing_count: listings.listing_count,
        average_asking_price: listings
            .average_asking_price
            .unwrap_or(DEFAULT_AVERAGE_ASKING_PRICE),
        average_price_per_m2: listings.average_price_per_m2.unwrap_or(DEFAULT_PRICE_PER_M2),
        regional_average_sale_price,
        yearly_change_pct,
        matched_region: region.map(|r| r.region_name.clone()),
        source,
    }
}
