//! Fixed-window rate limiting contract.
//!
//! A counter is kept per `(action, client identity)` key. The window opens on
//! the first attempt and lasts `window_secs`; attempts `1..=max_attempts` in
//! the window are allowed, every later attempt is rejected until the window
//! ends, after which counting restarts at 1.
//!
//! Windows are not sliding: a client that spends its whole budget at the end
//! of one window can spend it again right after the reset, so up to twice the
//! nominal rate can pass in a short span around a boundary.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

/// Limit applied to one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub max_attempts: u32,
    pub window_secs: u64,
}

impl RatePolicy {
    pub const fn new(max_attempts: u32, window_secs: u64) -> Self {
        Self {
            max_attempts,
            window_secs,
        }
    }
}

/// Counter state after registering one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    /// Attempts in the current window, including this one.
    pub count: u64,
    /// Seconds until the window resets.
    pub resets_in_secs: u64,
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub remaining: u32,
    pub retry_after_secs: u64,
}

impl RateLimitDecision {
    pub fn from_count(policy: RatePolicy, window: WindowCount) -> Self {
        let allowed = window.count <= u64::from(policy.max_attempts);
        let remaining = u64::from(policy.max_attempts).saturating_sub(window.count) as u32;

        Self {
            allowed,
            remaining,
            retry_after_secs: if allowed { 0 } else { window.resets_in_secs.max(1) },
        }
    }

    /// Decision used when the backing store is unavailable.
    pub fn fail_open(policy: RatePolicy) -> Self {
        Self {
            allowed: true,
            remaining: policy.max_attempts,
            retry_after_secs: 0,
        }
    }
}

/// In-memory fixed window for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWindow {
    pub started_at: DateTime<Utc>,
    pub count: u64,
}

impl FixedWindow {
    pub fn open(now: DateTime<Utc>) -> Self {
        Self {
            started_at: now,
            count: 0,
        }
    }

    /// Registers one attempt at `now`, resetting the window first if it has expired.
    pub fn register(&mut self, now: DateTime<Utc>, window_secs: u64) -> WindowCount {
        let window = Duration::seconds(window_secs as i64);

        if now >= self.started_at + window {
            self.started_at = now;
            self.count = 0;
        }

        self.count += 1;

        let ends_at = self.started_at + window;
        let remaining_ms = (ends_at - now).num_milliseconds().max(0) as u64;

        WindowCount {
            count: self.count,
            resets_in_secs: remaining_ms.div_ceil(1000),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>, window_secs: u64) -> bool {
        now >= self.started_at + Duration::seconds(window_secs as i64)
    }
}

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("rate limit store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for fixed-window counters.
///
/// # Implementations
///
/// - [`crate::infrastructure::rate_limit::RedisRateLimitStore`] - shared across instances
/// - [`crate::infrastructure::rate_limit::MemoryRateLimitStore`] - single process
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Increments the counter for `key` and returns its state.
    ///
    /// The window for a key starts with its first hit and expires
    /// `window_secs` later.
    async fn hit(&self, key: &str, window_secs: u64) -> Result<WindowCount, RateLimitError>;

    /// Reports whether the backend is reachable.
    async fn health_check(&self) -> bool;
}

/// Storage key for an action and client identity.
pub fn rate_limit_key(action: &str, identity: &str) -> String {
    format!("ratelimit:{action}:{identity}")
}
