//! In-process rate limit store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use crate::domain::rate_limit::{FixedWindow, RateLimitError, RateLimitStore, WindowCount};

/// Source of the current time for window bookkeeping.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-window counters kept in a concurrent map.
///
/// Used when Redis is not configured. Counters are per process, so several
/// instances each enforce their own limit. Expired windows are pruned
/// lazily once the map grows past `prune_threshold` keys.
pub struct MemoryRateLimitStore {
    windows: DashMap<String, (FixedWindow, u64)>,
    clock: Arc<dyn Clock>,
    prune_threshold: usize,
}

impl MemoryRateLimitStore {
    /// Creates a store driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a store driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        debug!("Using in-memory rate limit store");
        Self {
            windows: DashMap::new(),
            clock,
            prune_threshold: 10_000,
        }
    }

    /// Number of tracked keys.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn prune_expired(&self, now: DateTime<Utc>) {
        self.windows
            .retain(|_, (window, window_secs)| !window.is_expired(now, *window_secs));
    }
}

impl Default for MemoryRateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn hit(&self, key: &str, window_secs: u64) -> Result<WindowCount, RateLimitError> {
        let now = self.clock.now();

        if self.windows.len() > self.prune_threshold {
            self.prune_expired(now);
        }

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert_with(|| (FixedWindow::open(now), window_secs));
        let (window, stored_secs) = entry.value_mut();
        *stored_secs = window_secs;

        Ok(window.register(now, window_secs))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
