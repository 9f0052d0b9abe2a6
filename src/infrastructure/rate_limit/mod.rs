//! Counter stores backing the fixed-window rate limiter.
//!
//! Provides two [`RateLimitStore`](crate::domain::rate_limit::RateLimitStore) implementations:
//! - [`RedisRateLimitStore`] - Shared counters with server-side expiry
//! - [`MemoryRateLimitStore`] - Per-process counters when Redis is not configured

mod memory_store;
mod redis_store;

pub use memory_store::{Clock, MemoryRateLimitStore, SystemClock};
pub use redis_store::RedisRateLimitStore;
