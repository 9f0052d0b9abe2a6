//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod dashboard;
pub mod energy;
pub mod health;
pub mod market;
pub mod payments;
pub mod properties;
pub mod valuations;

pub use auth::{logout_handler, refresh_handler};
pub use dashboard::dashboard_handler;
pub use energy::{
    create_energy_project_handler, list_energy_projects_handler,
    update_energy_project_status_handler,
};
pub use health::health_handler;
pub use market::{market_overview_handler, mortgage_handler};
pub use payments::{capture_payment_handler, create_payment_handler, refund_payment_handler};
pub use properties::{
    create_property_handler, delete_property_handler, get_property_handler,
    list_properties_handler,
};
pub use valuations::{create_valuation_handler, get_valuation_handler};
