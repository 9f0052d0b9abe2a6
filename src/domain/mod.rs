//! Domain layer containing business entities and logic.
//!
//! The domain layer has no dependencies on infrastructure or presentation.
//! It defines entities, the contracts implemented by the infrastructure layer
//! and the small amount of pure logic the marketplace needs.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`gateways`] - Third-party API contracts (payments, statistics)
//! - [`rate_limit`] - Fixed-window rate limiting contract
//! - [`blending`] - Regional statistics matching and fallbacks
//! - [`pricing`] - Valuation and mortgage arithmetic

pub mod blending;
pub mod entities;
pub mod gateways;
pub mod pricing;
pub mod rate_limit;
pub mod repositories;
