//! Application layer services implementing business logic.
//!
//! Services coordinate repository and gateway calls, apply ownership rules
//! and write the audit log. HTTP handlers talk only to this layer.
//!
//! # Available Services
//!
//! - [`services::AuthService`] - Session token validation, refresh and logout
//! - [`services::PropertyService`] - Listings
//! - [`services::MarketService`] - Listing aggregates blended with CBS statistics
//! - [`services::ValuationService`] - Value estimates
//! - [`services::EnergyService`] - Renovation projects
//! - [`services::DashboardService`] - Per-user overview
//! - [`services::PaymentService`] - Stripe and PayPal payments
//! - [`services::RateLimiter`] - Fixed-window limits per action and client

pub mod services;
