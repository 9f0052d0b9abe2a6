//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: Database or rate-limit store degraded
///
/// # Components Checked
///
/// 1. **Database**: Counts listings
/// 2. **Rate limit store**: Redis `PING` or the in-process store
/// 3. **Payment providers**: Lists configured gateways (informational)
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "database": { "status": "ok", "message": "Connected, 128 listings" },
///     "rate_limit_store": { "status": "ok", "message": "Store reachable" },
///     "payment_providers": { "status": "ok", "message": "paypal, stripe" }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let (db_check, store_check) = tokio::join!(check_database(&state), check_rate_limit_store(&state));
    let providers_check = check_payment_providers(&state);

    let all_healthy = db_check.is_ok() && store_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            rate_limit_store: store_check,
            payment_providers: providers_check,
        },
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.property_service.probe().await {
        Ok(count) => CheckStatus::ok(format!("Connected, {count} listings")),
        Err(e) => CheckStatus::error(format!("Database error: {e}")),
    }
}

async fn check_rate_limit_store(state: &AppState) -> CheckStatus {
    if state.rate_limiter.health_check().await {
        CheckStatus::ok("Store reachable")
    } else {
        CheckStatus::error("Rate limit store unreachable")
    }
}

fn check_payment_providers(state: &AppState) -> CheckStatus {
    let providers = state.payment_service.available_providers();

    if providers.is_empty() {
        CheckStatus::ok("No payment providers configured")
    } else {
        let names: Vec<_> = providers.iter().map(|p| p.as_str()).collect();
        CheckStatus::ok(names.join(", "))
    }
}
