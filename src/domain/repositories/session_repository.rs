//! Repository trait for session tokens.

use crate::domain::entities::{NewSession, Session, SessionKind};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for session token storage.
///
/// Tokens are stored as HMAC-SHA256 hashes; raw tokens never reach the
/// database.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgSessionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the hash already exists.
    async fn create(&self, new_session: NewSession) -> Result<(), AppError>;

    /// Finds an unrevoked, unexpired session of the given kind.
    async fn find_active(
        &self,
        token_hash: &str,
        kind: SessionKind,
    ) -> Result<Option<Session>, AppError>;

    /// Revokes a session. Returns `Ok(false)` if it was unknown or already revoked.
    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError>;

    /// Revokes every active session of a user, returning how many were revoked.
    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, AppError>;

    /// Records that a session was just used.
    async fn touch(&self, token_hash: &str) -> Result<(), AppError>;
}
