//! Regional market statistics and the blended overview built from them.

use serde::Serialize;

/// One region row of the national statistics dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStatistic {
    pub region_name: String,
    pub average_sale_price: Option<f64>,
    /// Year-on-year change of the average sale price, in percent.
    pub yearly_change_pct: Option<f64>,
}

/// Where the regional part of a [`MarketOverview`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSource {
    Cbs,
    DatabaseOnly,
}

impl MarketSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSource::Cbs => "cbs",
            MarketSource::DatabaseOnly => "database_only",
        }
    }
}

/// Database listing aggregate merged with regional statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketOverview {
    pub city: String,
    pub listing_count: i64,
    pub average_asking_price: f64,
    pub average_price_per_m2: f64,
    pub regional_average_sale_price: f64,
    pub yearly_change_pct: f64,
    pub matched_region: Option<String>,
    pub source: MarketSource,
}
