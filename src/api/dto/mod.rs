//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod auth;
pub mod dashboard;
pub mod energy;
pub mod health;
pub mod market;
pub mod pagination;
pub mod payment;
pub mod property;
pub mod valuation;

use validator::ValidationError;

/// Rejects empty and whitespace-only strings.
///
/// Text fields are stored trimmed, so they are checked trimmed.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}
