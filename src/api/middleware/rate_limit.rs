//! Coarse per-IP token bucket in front of the whole router.
//!
//! Per-action budgets are enforced separately by
//! [`RateLimiter`](crate::application::services::RateLimiter).

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Seconds until one spent request is given back.
const REPLENISH_INTERVAL_SECS: u64 = 5;
const BURST_SIZE: u32 = 100;

/// Token bucket keyed by the socket peer address.
///
/// # Limits
///
/// - **Replenish**: one request every 5 seconds
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
/// Requires the router to be served with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn layer() -> GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>
{
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(REPLENISH_INTERVAL_SECS)
            .burst_size(BURST_SIZE)
            .finish()
            .expect("non-zero governor quota"),
    );

    GovernorLayer::new(governor_conf)
}

/// Same limits as [`layer`], keyed by `X-Forwarded-For` / `X-Real-IP` /
/// `Forwarded` before falling back to the peer address.
///
/// Only for deployments behind a trusted reverse proxy.
pub fn proxy_layer()
-> GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(REPLENISH_INTERVAL_SECS)
            .burst_size(BURST_SIZE)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .expect("non-zero governor quota"),
    );

    GovernorLayer::new(governor_conf)
}
