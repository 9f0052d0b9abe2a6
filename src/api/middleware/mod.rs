//! HTTP middleware for request processing and protection.
//!
//! Provides session authentication, coarse per-IP rate limiting and request
//! tracing.

pub mod auth;
pub mod rate_limit;
pub mod tracing;
