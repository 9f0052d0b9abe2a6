//! DTOs for session refresh.

use serde::Serialize;

use crate::application::services::IssuedTokens;

/// New access token; the rotated refresh token travels in the cookie only.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl From<&IssuedTokens> for TokenResponse {
    fn from(tokens: &IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token.clone(),
            token_type: "Bearer",
            expires_in: tokens.access_expires_in,
        }
    }
}
