//! Listing creation, lookup and removal.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::{AuthenticatedUser, NewProperty, Property, PropertyFilter};
use crate::domain::repositories::PropertyRepository;
use crate::error::AppError;

/// Service for property listings.
///
/// Input shape is validated by the HTTP layer; this service adds the
/// cross-field checks and the owner-or-admin rule for mutations.
pub struct PropertyService {
    repository: Arc<dyn PropertyRepository>,
}

impl PropertyService {
    pub fn new(repository: Arc<dyn PropertyRepository>) -> Self {
        Self { repository }
    }

    /// Returns one page of listings plus the total matching count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `min_price` exceeds `max_price`.
    pub async fn list(
        &self,
        filter: PropertyFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Property>, i64), AppError> {
        if let (Some(min), Some(max)) = (filter.min_price, filter.max_price)
            && min > max
        {
            return Err(AppError::invalid_field(
                "min_price",
                "range",
                "min_price must not exceed max_price",
            ));
        }

        let (items, total) = tokio::try_join!(
            self.repository.list(filter.clone(), offset, limit),
            self.repository.count(filter),
        )?;

        Ok((items, total))
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no listing has this id.
    pub async fn get(&self, id: i64) -> Result<Property, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Property not found", json!({ "id": id })))
    }

    /// Creates a listing owned by the caller.
    pub async fn create(
        &self,
        caller: AuthenticatedUser,
        new_property: NewProperty,
    ) -> Result<Property, AppError> {
        let new_property = NewProperty {
            owner_id: caller.user_id,
            ..new_property
        };

        let property = self.repository.create(new_property).await?;

        info!(
            target: "audit",
            user_id = caller.user_id,
            property_id = property.id,
            city = %property.city,
            "Listing created"
        );

        Ok(property)
    }

    /// Deletes a listing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the listing does not exist and
    /// [`AppError::Forbidden`] if the caller neither owns it nor is an admin.
    pub async fn delete(&self, caller: AuthenticatedUser, id: i64) -> Result<(), AppError> {
        let property = self.get(id).await?;
        ensure_can_manage(caller, property.owner_id, "property", id)?;

        if !self.repository.delete(id).await? {
            return Err(AppError::not_found("Property not found", json!({ "id": id })));
        }

        info!(target: "audit", user_id = caller.user_id, property_id = id, "Listing deleted");
        Ok(())
    }

    /// Cheap round trip used by the health check.
    pub async fn probe(&self) -> Result<i64, AppError> {
        self.repository.count(PropertyFilter::default()).await
    }
}

/// Owner-or-admin check shared by the services that mutate owned records.
pub(crate) fn ensure_can_manage(
    caller: AuthenticatedUser,
    owner_id: i64,
    resource: &'static str,
    id: i64,
) -> Result<(), AppError> {
    if caller.can_manage(owner_id) {
        return Ok(());
    }

    warn!(
        target: "security",
        user_id = caller.user_id,
        resource,
        id,
        "Forbidden access to resource of another user"
    );

    Err(AppError::forbidden(
        "You do not have access to this resource",
        json!({ "resource": resource, "id": id }),
    ))
}
