//! Payment gateway clients.
//!
//! - [`StripeProcessor`] - Stripe PaymentIntents with manual capture
//! - [`PayPalProcessor`] - PayPal Orders v2 with per-call OAuth tokens

pub mod idempotency;
mod paypal;
mod stripe;

pub use idempotency::generate_idempotency_key;
pub use paypal::{PayPalProcessor, format_amount};
pub use stripe::StripeProcessor;

use reqwest::Url;

use crate::domain::entities::PaymentProvider;
use crate::domain::gateways::PaymentError;

/// Appends `segments` to the API base path.
///
/// Each segment is percent-encoded on its own, so `/`, `?` and `..` inside a
/// payment id stay part of that segment.
fn endpoint(
    provider: PaymentProvider,
    api_base: &str,
    segments: &[&str],
) -> Result<Url, PaymentError> {
    let mut url = Url::parse(api_base)
        .map_err(|e| PaymentError::new(provider, format!("invalid API base '{api_base}': {e}")))?;

    url.path_segments_mut()
        .map_err(|()| PaymentError::new(provider, format!("API base '{api_base}' has no path")))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}
