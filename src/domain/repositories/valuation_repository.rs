//! Repository trait for stored valuations.

use crate::domain::entities::{NewValuation, Valuation};
use crate::error::AppError;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ValuationRepository: Send + Sync {
    async fn create(&self, new_valuation: NewValuation) -> Result<Valuation, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Valuation>, AppError>;

    /// Most recent valuations requested by a user, newest first.
    async fn recent_by_user(&self, user_id: i64, limit: i64) -> Result<Vec<Valuation>, AppError>;
}
