//! DTOs for payments.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

use super::not_blank;
use crate::domain::entities::{
    PaymentIntent, PaymentProvider, PaymentRequest, PaymentStatus, Refund, RefundRequest,
};
use crate::error::AppError;

/// ISO 4217 alphabetic code, any case.
static CURRENCY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}$").expect("valid regex"));

/// Gateway object ids (`pi_3N...`, `5O190127TN364715T`). They are placed in
/// gateway URL paths, so separators and dot segments are excluded.
static PAYMENT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,255}$").expect("valid regex"));

/// Checks a payment id taken from the request path.
pub fn validate_payment_id(id: &str) -> Result<(), AppError> {
    if PAYMENT_ID_REGEX.is_match(id) {
        return Ok(());
    }
    Err(AppError::invalid_field(
        "id",
        "invalid_format",
        "Payment id may only contain letters, digits, '_' and '-'",
    ))
}

fn default_currency() -> String {
    "eur".to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreatePaymentRequest {
    pub provider: PaymentProvider,

    /// Minor units (cents).
    #[validate(range(min = 50, max = 10_000_000, message = "amount_cents must be 50-10000000"))]
    pub amount_cents: i64,

    #[serde(default = "default_currency")]
    #[validate(regex(path = *CURRENCY_REGEX, message = "currency must be a 3-letter code"))]
    pub currency: String,

    #[validate(length(max = 255), custom(function = "not_blank"))]
    pub description: String,

    #[validate(range(min = 1))]
    pub property_id: Option<i64>,
}

impl CreatePaymentRequest {
    pub fn into_payment_request(self, user_id: i64) -> (PaymentProvider, PaymentRequest) {
        (
            self.provider,
            PaymentRequest {
                amount_cents: self.amount_cents,
                currency: self.currency.to_lowercase(),
                description: self.description.trim().to_string(),
                user_id,
                property_id: self.property_id,
            },
        )
    }
}

/// Body of a refund; an absent amount refunds the full payment.
///
/// A partial amount needs the currency of the captured payment.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RefundPaymentRequest {
    pub amount_cents: Option<i64>,

    #[validate(regex(path = *CURRENCY_REGEX, message = "currency must be a 3-letter code"))]
    pub currency: Option<String>,
}

impl TryFrom<RefundPaymentRequest> for RefundRequest {
    type Error = AppError;

    fn try_from(r: RefundPaymentRequest) -> Result<Self, Self::Error> {
        if r.amount_cents.is_some() && r.currency.is_none() {
            return Err(AppError::invalid_field(
                "currency",
                "required",
                "currency is required for a partial refund",
            ));
        }

        Ok(Self {
            amount_cents: r.amount_cents,
            currency: r.currency.map(|c| c.to_lowercase()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub provider: PaymentProvider,
    pub id: String,
    pub status: PaymentStatus,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    /// Stripe client secret or PayPal approval URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_action: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_id: Option<String>,
}

impl From<PaymentIntent> for PaymentResponse {
    fn from(i: PaymentIntent) -> Self {
        Self {
            provider: i.provider,
            id: i.id,
            status: i.status,
            amount_cents: i.amount_cents,
            currency: i.currency,
            client_action: i.client_action,
            capture_id: i.capture_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RefundResponse {
    pub provider: PaymentProvider,
    pub id: String,
    pub status: String,
    pub amount_cents: Option<i64>,
}

impl From<Refund> for RefundResponse {
    fn from(r: Refund) -> Self {
        Self {
            provider: r.provider,
            id: r.id,
            status: r.status,
            amount_cents: r.amount_cents,
        }
    }
}
