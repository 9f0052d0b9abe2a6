//! DTOs for market overviews and mortgage quotes.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{MarketOverview, MarketSource};
use crate::domain::pricing::MortgageQuote;

#[derive(Debug, Serialize)]
pub struct MarketOverviewResponse {
    pub city: String,
    pub listing_count: i64,
    pub average_asking_price: f64,
    pub average_price_per_m2: f64,
    pub regional_average_sale_price: f64,
    pub yearly_change_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_region: Option<String>,
    pub source: MarketSource,
}

impl From<MarketOverview> for MarketOverviewResponse {
    fn from(o: MarketOverview) -> Self {
        Self {
            city: o.city,
            listing_count: o.listing_count,
            average_asking_price: o.average_asking_price.round(),
            average_price_per_m2: o.average_price_per_m2.round(),
            regional_average_sale_price: o.regional_average_sale_price.round(),
            yearly_change_pct: (o.yearly_change_pct * 10.0).round() / 10.0,
            matched_region: o.matched_region,
            source: o.source,
        }
    }
}

/// `GET /api/mortgage` query.
#[derive(Debug, Deserialize, Validate)]
pub struct MortgageQuery {
    #[validate(range(min = 1.0, message = "purchase_price must be positive"))]
    pub purchase_price: f64,

    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub down_payment: f64,

    /// Nominal yearly rate in percent.
    #[validate(range(min = 0.0, max = 20.0))]
    pub interest_rate: f64,

    #[serde(default = "default_years")]
    #[validate(range(min = 1, max = 40))]
    pub years: u32,
}

fn default_years() -> u32 {
    30
}

#[derive(Debug, Serialize)]
pub struct MortgageQuoteResponse {
    pub purchase_price: f64,
    pub down_payment: f64,
    pub interest_rate: f64,
    pub years: u32,
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub total_interest: f64,
    pub transfer_tax: f64,
    pub total_cost: f64,
}

impl MortgageQuoteResponse {
    pub fn new(query: &MortgageQuery, quote: MortgageQuote) -> Self {
        Self {
            purchase_price: query.purchase_price,
            down_payment: query.down_payment,
            interest_rate: query.interest_rate,
            years: query.years,
            loan_amount: quote.loan_amount,
            monthly_payment: quote.monthly_payment,
            total_interest: quote.total_interest,
            transfer_tax: quote.transfer_tax,
            total_cost: quote.total_cost,
        }
    }
}
