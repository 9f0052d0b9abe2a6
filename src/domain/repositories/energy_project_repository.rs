//! Repository trait for energy renovation projects.

use crate::domain::entities::{EnergyProject, NewEnergyProject, ProjectStatus};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnergyProjectRepository: Send + Sync {
    async fn create(&self, new_project: NewEnergyProject) -> Result<EnergyProject, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<EnergyProject>, AppError>;

    /// Lists projects owned by a user, newest first.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<EnergyProject>, AppError>;

    /// Sets the status of a project.
    ///
    /// Returns `Ok(None)` when the project does not exist.
    async fn update_status(
        &self,
        id: i64,
        status: ProjectStatus,
    ) -> Result<Option<EnergyProject>, AppError>;
}
