//! Per-action fixed-window rate limiting.

use metrics::counter;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::rate_limit::{RateLimitDecision, RatePolicy, RateLimitStore, rate_limit_key};
use crate::error::AppError;

/// Named limits for the abusable routes.
pub mod policies {
    use crate::domain::rate_limit::RatePolicy;

    pub const AUTH_REFRESH: (&str, RatePolicy) = ("auth_refresh", RatePolicy::new(10, 60));
    pub const CREATE_PROPERTY: (&str, RatePolicy) = ("create_property", RatePolicy::new(20, 3600));
    pub const VALUATION: (&str, RatePolicy) = ("valuation", RatePolicy::new(5, 60));
    pub const ENERGY_PROJECT: (&str, RatePolicy) = ("energy_project", RatePolicy::new(30, 3600));
    pub const PAYMENT: (&str, RatePolicy) = ("payment", RatePolicy::new(10, 60));
}

pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }

    /// Counts one attempt of `action` by `identity` and decides on it.
    ///
    /// Store failures allow the attempt.
    pub async fn check(&self, action: &str, identity: &str, policy: RatePolicy) -> RateLimitDecision {
        let key = rate_limit_key(action, identity);

        match self.store.hit(&key, policy.window_secs).await {
            Ok(window) => {
                let decision = RateLimitDecision::from_count(policy, window);
                debug!(key = %key, count = window.count, allowed = decision.allowed, "Rate limit check");
                decision
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Rate limit store failed, allowing request");
                RateLimitDecision::fail_open(policy)
            }
        }
    }

    /// Like [`check`](Self::check), but turns a rejection into [`AppError::TooManyRequests`].
    pub async fn enforce(
        &self,
        (action, policy): (&str, RatePolicy),
        identity: &str,
    ) -> Result<(), AppError> {
        let decision = self.check(action, identity, policy).await;

        if decision.allowed {
            return Ok(());
        }

        counter!("rate_limit_rejections_total", "action" => action.to_string()).increment(1);
        warn!(
            target: "security",
            action,
            identity,
            retry_after_secs = decision.retry_after_secs,
            "Rate limit exceeded"
        );

        Err(AppError::too_many_requests(action, decision.retry_after_secs))
    }

    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
}
