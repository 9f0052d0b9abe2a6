//! Helpers shared by the HTTP layer and the services.
//!
//! - [`token_generator`] - Random session tokens
//! - [`client_ip`] - Client address resolution for rate limiting
//! - [`cookies`] - Refresh-token cookie construction and parsing

pub mod client_ip;
pub mod cookies;
pub mod token_generator;
