//! Business logic services for the application layer.

pub mod auth_service;
pub mod dashboard_service;
pub mod energy_service;
pub mod market_service;
pub mod payment_service;
pub mod property_service;
pub mod rate_limiter;
pub mod valuation_service;

pub use auth_service::{AuthService, IssuedTokens};
pub use dashboard_service::{Dashboard, DashboardService, DashboardTotals};
pub use energy_service::{EnergyProjectInput, EnergyService};
pub use market_service::MarketService;
pub use payment_service::PaymentService;
pub use property_service::PropertyService;
pub use rate_limiter::{RateLimiter, policies};
pub use valuation_service::ValuationService;
