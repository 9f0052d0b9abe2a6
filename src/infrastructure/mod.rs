//! Infrastructure layer for external integrations.
//!
//! Implements the interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`payments`] - Stripe and PayPal gateway clients
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`rate_limit`] - Redis and in-memory rate-limit counter stores
//! - [`statistics`] - CBS regional housing statistics

pub mod payments;
pub mod persistence;
pub mod rate_limit;
pub mod statistics;
