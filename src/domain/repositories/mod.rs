//! Repository trait definitions for the domain layer.
//!
//! These traits abstract data access following the Repository pattern and are
//! implemented by concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`PropertyRepository`] - Listings and per-city aggregates
//! - [`EnergyProjectRepository`] - Renovation projects
//! - [`ValuationRepository`] - Stored valuation estimates
//! - [`SessionRepository`] - Hashed session tokens
//! - [`UserRepository`] - User accounts

pub mod energy_project_repository;
pub mod property_repository;
pub mod session_repository;
pub mod user_repository;
pub mod valuation_repository;

pub use energy_project_repository::EnergyProjectRepository;
pub use property_repository::PropertyRepository;
pub use session_repository::SessionRepository;
pub use user_repository::UserRepository;
pub use valuation_repository::ValuationRepository;

#[cfg(test)]
pub use energy_project_repository::MockEnergyProjectRepository;
#[cfg(test)]
pub use property_repository::MockPropertyRepository;
#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
#[cfg(test)]
pub use valuation_repository::MockValuationRepository;
