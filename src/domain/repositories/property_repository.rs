//! Repository trait for property listings.

use crate::domain::entities::{CityListingStats, NewProperty, Property, PropertyFilter};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for marketplace listings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPropertyRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Creates a new listing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_property: NewProperty) -> Result<Property, AppError>;

    /// Finds a listing by id.
    async fn find_by_id(&self, id: i64) -> Result<Option<Property>, AppError>;

    /// Lists listings matching `filter`, newest first.
    async fn list(
        &self,
        filter: PropertyFilter,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Property>, AppError>;

    /// Counts listings matching `filter`.
    async fn count(&self, filter: PropertyFilter) -> Result<i64, AppError>;

    /// Lists all listings owned by a user.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Property>, AppError>;

    /// Deletes a listing.
    ///
    /// Returns `Ok(false)` when no listing had this id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Aggregates listings whose city equals `city` (case-insensitive).
    async fn city_stats(&self, city: &str) -> Result<CityListingStats, AppError>;
}
