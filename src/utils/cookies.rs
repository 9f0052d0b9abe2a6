//! Refresh-token cookie handling.

use axum::http::{HeaderMap, header};

pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// Seven days.
pub const REFRESH_COOKIE_MAX_AGE_SECS: i64 = 604_800;

const REFRESH_COOKIE_PATH: &str = "/api/auth";

/// `Set-Cookie` value carrying a new refresh token.
pub fn build_refresh_cookie(token: &str) -> String {
    format!(
        "{REFRESH_COOKIE_NAME}={token}; HttpOnly; Secure; SameSite=Strict; Path={REFRESH_COOKIE_PATH}; Max-Age={REFRESH_COOKIE_MAX_AGE_SECS}"
    )
}

/// `Set-Cookie` value that makes the browser drop the refresh token.
pub fn clear_refresh_cookie() -> String {
    format!(
        "{REFRESH_COOKIE_NAME}=; HttpOnly; Secure; SameSite=Strict; Path={REFRESH_COOKIE_PATH}; Max-Age=0"
    )
}

/// Reads a cookie value from all `Cookie` headers of a request.
///
/// Empty values are treated as absent.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
