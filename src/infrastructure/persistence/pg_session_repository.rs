//! PostgreSQL implementation of session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use super::parse_column;
use crate::domain::entities::{NewSession, Session, SessionKind};
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct SessionRow {
    user_id: i64,
    role: String,
    kind: String,
    expires_at: DateTime<Utc>,
}

impl TryFrom<SessionRow> for Session {
    type Error = AppError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(Session {
            user_id: row.user_id,
            role: parse_column("role", &row.role)?,
            kind: parse_column("kind", &row.kind)?,
            expires_at: row.expires_at,
        })
    }
}

/// PostgreSQL repository for session token storage and validation.
///
/// Stores hashed tokens (HMAC-SHA256). Raw tokens are never persisted.
pub struct PgSessionRepository {
    pool: Arc<PgPool>,
}

impl PgSessionRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, new_session: NewSession) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (user_id, token_hash, kind, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(new_session.user_id)
        .bind(new_session.token_hash)
        .bind(new_session.kind.as_str())
        .bind(new_session.expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn find_active(
        &self,
        token_hash: &str,
        kind: SessionKind,
    ) -> Result<Option<Session>, AppError> {
        sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT s.user_id, u.role, s.kind, s.expires_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1
              AND s.kind = $2
              AND s.revoked_at IS NULL
              AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .bind(kind.as_str())
        .fetch_optional(self.pool.as_ref())
        .await?
        .map(Session::try_from)
        .transpose()
    }

    async fn revoke(&self, token_hash: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE token_hash = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn revoke_all_for_user(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET revoked_at = NOW()
            WHERE user_id = $1 AND revoked_at IS NULL
            "#,
        )
        .bind(user_id)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn touch(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE sessions
            SET last_used_at = NOW()
            WHERE token_hash = $1
              AND revoked_at IS NULL
            "#,
        )
        .bind(token_hash)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }
}
