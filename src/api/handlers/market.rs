//! Handlers for market data and mortgage quotes.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::market::{MarketOverviewResponse, MortgageQuery, MortgageQuoteResponse};
use crate::api::extractors::ValidatedQuery;
use crate::domain::pricing::mortgage_quote;
use crate::error::AppError;
use crate::state::AppState;

/// Blended market overview for a city.
///
/// # Endpoint
///
/// `GET /api/market/{city}`
///
/// `source` is `cbs` when a CBS region matches the city and
/// `database_only` otherwise.
///
/// # Errors
///
/// Returns 500 if the database or the CBS API fails.
pub async fn market_overview_handler(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<MarketOverviewResponse>, AppError> {
    let overview = state.market_service.overview(&city).await?;
    Ok(Json(overview.into()))
}

/// Annuity mortgage quote.
///
/// # Endpoint
///
/// `GET /api/mortgage?purchase_price=..&interest_rate=..[&down_payment=..][&years=..]`
pub async fn mortgage_handler(
    ValidatedQuery(query): ValidatedQuery<MortgageQuery>,
) -> Result<Json<MortgageQuoteResponse>, AppError> {
    if query.down_payment > query.purchase_price {
        return Err(AppError::invalid_field(
            "down_payment",
            "range",
            "down_payment must not exceed purchase_price",
        ));
    }

    let quote = mortgage_quote(
        query.purchase_price,
        query.down_payment,
        query.interest_rate,
        query.years,
    );

    Ok(Json(MortgageQuoteResponse::new(&query, quote)))
}
