//! Session authentication, refresh and revocation.

use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::entities::{AuthenticatedUser, NewSession, SessionKind};
use crate::domain::repositories::SessionRepository;
use crate::error::AppError;
use crate::utils::cookies::REFRESH_COOKIE_MAX_AGE_SECS;
use crate::utils::token_generator::generate_token;

type HmacSha256 = Hmac<Sha256>;

/// Raw tokens handed to the client once; only their hashes are stored.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub access_expires_in: i64,
}

/// Service for session tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
///
/// Refresh tokens rotate: every refresh revokes the presented token and issues
/// a new pair.
pub struct AuthService {
    sessions: Arc<dyn SessionRepository>,
    signing_secret: String,
    access_ttl_secs: i64,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `sessions` - session repository for DB operations
    /// - `signing_secret` - HMAC key; must match the value used when tokens were issued
    /// - `access_ttl_secs` - lifetime of access tokens
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        signing_secret: String,
        access_ttl_secs: i64,
    ) -> Self {
        Self {
            sessions,
            signing_secret,
            access_ttl_secs,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Resolves an access token to the calling user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown, revoked or
    /// expired. Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_hash = self.hash_token(token);

        let session = self
            .sessions
            .find_active(&token_hash, SessionKind::Access)
            .await?
            .filter(|s| !s.is_expired())
            .ok_or_else(|| {
                AppError::unauthorized(
                    "Unauthorized",
                    json!({"reason": "Invalid, expired or revoked token"}),
                )
            })?;

        let _ = self.sessions.touch(&token_hash).await;

        Ok(AuthenticatedUser {
            user_id: session.user_id,
            role: session.role,
        })
    }

    /// Issues a fresh access/refresh token pair for a user.
    pub async fn issue_tokens(&self, user_id: i64) -> Result<IssuedTokens, AppError> {
        let now = Utc::now();
        let access_token = generate_token();
        let refresh_token = generate_token();

        self.sessions
            .create(NewSession {
                user_id,
                token_hash: self.hash_token(&access_token),
                kind: SessionKind::Access,
                expires_at: now + Duration::seconds(self.access_ttl_secs),
            })
            .await?;

        self.sessions
            .create(NewSession {
                user_id,
                token_hash: self.hash_token(&refresh_token),
                kind: SessionKind::Refresh,
                expires_at: now + Duration::seconds(REFRESH_COOKIE_MAX_AGE_SECS),
            })
            .await?;

        Ok(IssuedTokens {
            access_token,
            refresh_token,
            access_expires_in: self.access_ttl_secs,
        })
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the refresh token is not active.
    pub async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens, AppError> {
        let token_hash = self.hash_token(refresh_token);

        let session = self
            .sessions
            .find_active(&token_hash, SessionKind::Refresh)
            .await?
            .filter(|s| !s.is_expired());

        let Some(session) = session else {
            warn!(target: "security", "Refresh with unknown or expired token rejected");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid, expired or revoked refresh token"}),
            ));
        };

        // A concurrent refresh may have rotated it already.
        if !self.sessions.revoke(&token_hash).await? {
            warn!(target: "security", user_id = session.user_id, "Refresh token reused during rotation");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Refresh token already used"}),
            ));
        }

        let tokens = self.issue_tokens(session.user_id).await?;
        info!(target: "audit", user_id = session.user_id, "Session refreshed");

        Ok(tokens)
    }

    /// Revokes a refresh token. Unknown tokens are ignored.
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AppError> {
        let token_hash = self.hash_token(refresh_token);

        if self.sessions.revoke(&token_hash).await? {
            info!(target: "audit", "Session revoked");
        }

        Ok(())
    }

    /// Revokes every session of a user.
    pub async fn revoke_all(&self, user_id: i64) -> Result<u64, AppError> {
        let revoked = self.sessions.revoke_all_for_user(user_id).await?;
        info!(target: "audit", user_id, revoked, "All sessions revoked");
        Ok(revoked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Role, Session};
    use crate::domain::repositories::MockSessionRepository;

    fn test_secret() -> String {
        "test-signing-secret".to_string()
    }

    fn compute_expected_hash(token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(test_secret().as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn active_session(kind: SessionKind) -> Session {
        Session {
            user_id: 42,
            role: Role::User,
            kind,
            expires_at: Utc::now() + Duration::minutes(5),
        }
    }

    fn service(mock: MockSessionRepository) -> AuthService {
        AuthService::new(Arc::new(mock), test_secret(), 900)
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockSessionRepository::new();

        let token = "valid-token";
        let expected_hash = compute_expected_hash(token);

        mock_repo
            .expect_find_active()
            .withf(move |hash, kind| hash == expected_hash && *kind == SessionKind::Access)
            .times(1)
            .returning(|_, kind| Ok(Some(active_session(kind))));

        mock_repo.expect_touch().times(1).returning(|_| Ok(()));

        let user = service(mock_repo).authenticate(token).await.unwrap();

        assert_eq!(user.user_id, 42);
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_authenticate_invalid_token() {
        let mut mock_repo = MockSessionRepository::new();

        mock_repo
            .expect_find_active()
            .times(1)
            .returning(|_, _| Ok(None));

        let result = service(mock_repo).authenticate("invalid-token").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_expired_session() {
        let mut mock_repo = MockSessionRepository::new();

        mock_repo.expect_find_active().returning(|_, kind| {
            let mut session = active_session(kind);
            session.expires_at = Utc::now() - Duration::seconds(1);
            Ok(Some(session))
        });

        let result = service(mock_repo).authenticate("stale").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_refresh_rotates_tokens() {
        let mut mock_repo = MockSessionRepository::new();
        let old_hash = compute_expected_hash("old-refresh");

        let lookup_hash = old_hash.clone();
        mock_repo
            .expect_find_active()
            .withf(move |hash, kind| hash == lookup_hash && *kind == SessionKind::Refresh)
            .times(1)
            .returning(|_, kind| Ok(Some(active_session(kind))));

        mock_repo
            .expect_revoke()
            .withf(move |hash| hash == old_hash)
            .times(1)
            .returning(|_| Ok(true));

        mock_repo
            .expect_create()
            .withf(|s| s.user_id == 42)
            .times(2)
            .returning(|_| Ok(()));

        let tokens = service(mock_repo).refresh("old-refresh").await.unwrap();

        assert_ne!(tokens.refresh_token, "old-refresh");
        assert_ne!(tokens.access_token, tokens.refresh_token);
        assert_eq!(tokens.access_expires_in, 900);
    }

    #[tokio::test]
    async fn test_refresh_reused_token_rejected() {
        let mut mock_repo = MockSessionRepository::new();

        mock_repo
            .expect_find_active()
            .returning(|_, kind| Ok(Some(active_session(kind))));
        mock_repo.expect_revoke().returning(|_| Ok(false));
        mock_repo.expect_create().never();

        let result = service(mock_repo).refresh("raced").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_logout_unknown_token_is_ok() {
        let mut mock_repo = MockSessionRepository::new();
        mock_repo.expect_revoke().times(1).returning(|_| Ok(false));

        assert!(service(mock_repo).logout("whatever").await.is_ok());
    }

    #[tokio::test]
    async fn test_hash_token_consistency() {
        let service = service(MockSessionRepository::new());

        let hash1 = service.hash_token("test-token");
        let hash2 = service.hash_token("test-token");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
        assert_ne!(hash1, service.hash_token("other-token"));
    }

    #[tokio::test]
    async fn test_hash_token_secret_matters() {
        let svc1 = AuthService::new(
            Arc::new(MockSessionRepository::new()),
            "secret-a".to_string(),
            900,
        );
        let svc2 = AuthService::new(
            Arc::new(MockSessionRepository::new()),
            "secret-b".to_string(),
            900,
        );

        assert_ne!(svc1.hash_token("token"), svc2.hash_token("token"));
    }
}
