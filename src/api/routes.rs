//! API route configuration.
//!
//! Public routes serve anonymous reads and the cookie-based session
//! endpoints; protected routes require a Bearer access token via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    capture_payment_handler, create_energy_project_handler, create_payment_handler,
    create_property_handler, create_valuation_handler, dashboard_handler,
    delete_property_handler, get_property_handler, get_valuation_handler, health_handler,
    list_energy_projects_handler, list_properties_handler, logout_handler,
    market_overview_handler, mortgage_handler, refresh_handler, refund_payment_handler,
    update_energy_project_status_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};

/// Routes that need no access token.
///
/// # Endpoints
///
/// - `POST /auth/refresh`       - Rotate refresh cookie, issue access token
/// - `POST /auth/logout`        - Revoke refresh cookie
/// - `GET  /properties`         - Paginated, filtered listings
/// - `GET  /properties/{id}`    - One listing
/// - `GET  /market/{city}`      - Blended market overview
/// - `GET  /mortgage`           - Annuity mortgage quote
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/refresh", post(refresh_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/properties", get(list_properties_handler))
        .route("/properties/{id}", get(get_property_handler))
        .route("/market/{city}", get(market_overview_handler))
        .route("/mortgage", get(mortgage_handler))
}

/// Routes protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /properties`                         - Create a listing
/// - `DELETE /properties/{id}`                    - Delete a listing (owner or admin)
/// - `POST   /valuations`                         - Estimate and store a valuation
/// - `GET    /valuations/{id}`                    - Read a valuation
/// - `GET    /energy-projects`                    - Caller's renovation projects
/// - `POST   /energy-projects`                    - Start a renovation project
/// - `PATCH  /energy-projects/{id}/status`        - Change project status
/// - `GET    /dashboard`                          - Caller's dashboard
/// - `POST   /payments`                           - Create a payment
/// - `POST   /payments/{provider}/{id}/capture`   - Capture a payment
/// - `POST   /payments/{provider}/{id}/refund`    - Refund a payment
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/properties", post(create_property_handler))
        .route("/properties/{id}", delete(delete_property_handler))
        .route("/valuations", post(create_valuation_handler))
        .route("/valuations/{id}", get(get_valuation_handler))
        .route(
            "/energy-projects",
            get(list_energy_projects_handler).post(create_energy_project_handler),
        )
        .route(
            "/energy-projects/{id}/status",
            patch(update_energy_project_status_handler),
        )
        .route("/dashboard", get(dashboard_handler))
        .route("/payments", post(create_payment_handler))
        .route(
            "/payments/{provider}/{id}/capture",
            post(capture_payment_handler),
        )
        .route(
            "/payments/{provider}/{id}/refund",
            post(refund_payment_handler),
        )
}

/// `/health` plus everything under `/api`, with state applied.
///
/// Carries no transport-level middleware, so tests can drive it directly.
pub fn api_router(state: AppState) -> Router {
    let protected = protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api", public_routes().merge(protected))
        .with_state(state)
}
