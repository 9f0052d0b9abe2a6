//! Core domain entities representing the marketplace data model.
//!
//! Entities are plain data structures. Records stored in PostgreSQL have a
//! read model and a separate `New*` struct for creation:
//!
//! - [`Property`] / [`NewProperty`] - A listing
//! - [`EnergyProject`] / [`NewEnergyProject`] - A renovation measure on a listing
//! - [`Valuation`] / [`NewValuation`] - A stored value estimate
//! - [`User`] / [`NewUser`], [`Session`] / [`NewSession`] - Accounts and tokens
//!
//! Gateway-owned and computed types ([`PaymentIntent`], [`MarketOverview`])
//! are never persisted.

pub mod energy_project;
pub mod market;
pub mod payment;
pub mod property;
pub mod user;
pub mod valuation;

pub use energy_project::{EnergyMeasure, EnergyProject, NewEnergyProject, ProjectStatus};
pub use market::{MarketOverview, MarketSource, RegionStatistic};
pub use payment::{
    PaymentIntent, PaymentProvider, PaymentRequest, PaymentStatus, Refund, RefundRequest,
};
pub use property::{
    CityListingStats, EnergyLabel, ListingStatus, NewProperty, Property, PropertyFilter,
    PropertyType,
};
pub use user::{AuthenticatedUser, NewSession, NewUser, Role, Session, SessionKind, User};
pub use valuation::{NewValuation, Valuation, ValuationBasis};
