//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /health`      - Health check: database, rate-limit store, payment providers (public)
//! - `/api/*`            - REST API, see [`crate::api::routes`]
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket (configurable for proxy deployments);
//!   per-action budgets are enforced inside the handlers
//! - **Authentication** - Bearer access token on protected API routes
//! - **Path normalization** - Trailing slash handling

use crate::api::middleware::{rate_limit, tracing};
use crate::api::routes::api_router;
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, the token bucket keys on `X-Forwarded-For`
///   / `X-Real-IP` instead of the peer socket address; enable only when the
///   service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = api_router(state);

    let router = if behind_proxy {
        router.layer(rate_limit::proxy_layer())
    } else {
        router.layer(rate_limit::layer())
    };

    NormalizePathLayer::trim_trailing_slash().layer(router.layer(tracing::layer()))
}
