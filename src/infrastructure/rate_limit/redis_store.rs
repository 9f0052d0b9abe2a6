//! Redis-backed rate limit store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info};

use crate::domain::rate_limit::{RateLimitError, RateLimitStore, WindowCount};

/// Fixed-window counters in Redis.
///
/// Each hit runs `INCR` and `TTL` in one atomic pipeline. The first hit of a
/// window (`TTL` reports no expiry) sets `EXPIRE key window_secs`, so the
/// window starts at the first attempt and Redis drops the key when it ends.
pub struct RedisRateLimitStore {
    client: ConnectionManager,
}

impl RedisRateLimitStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`RateLimitError::Unavailable`] if the URL is invalid, the connection cannot
    /// be established, or the PING health check fails.
    pub async fn connect(redis_url: &str) -> Result<Self, RateLimitError> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            RateLimitError::Unavailable(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            RateLimitError::Unavailable(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| RateLimitError::Unavailable(format!("Redis PING failed: {}", e)))?;

        info!("✓ Connected to Redis");

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn hit(&self, key: &str, window_secs: u64) -> Result<WindowCount, RateLimitError> {
        let mut conn = self.client.clone();

        let (count, ttl): (u64, i64) = redis::pipe()
            .atomic()
            .incr(key, 1)
            .ttl(key)
            .query_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Unavailable(format!("Redis INCR failed: {}", e)))?;

        let resets_in_secs = if ttl < 0 {
            conn.expire::<_, ()>(key, window_secs as i64)
                .await
                .map_err(|e| RateLimitError::Unavailable(format!("Redis EXPIRE failed: {}", e)))?;
            window_secs
        } else {
            ttl as u64
        };

        debug!("Rate limit hit: {} -> {} ({}s left)", key, count, resets_in_secs);

        Ok(WindowCount {
            count,
            resets_in_secs,
        })
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
