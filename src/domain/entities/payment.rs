//! Payment gateway request and result types.
//!
//! Amounts are integer minor units (cents). Nothing here is persisted; the
//! gateways own payment state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentProvider {
    Stripe,
    Paypal,
}

impl PaymentProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentProvider::Stripe => "stripe",
            PaymentProvider::Paypal => "paypal",
        }
    }
}

impl fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stripe" => Ok(PaymentProvider::Stripe),
            "paypal" => Ok(PaymentProvider::Paypal),
            other => Err(format!("unknown payment provider '{other}'")),
        }
    }
}

/// Gateway-neutral payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Created,
    RequiresAction,
    RequiresCapture,
    Processing,
    Succeeded,
    Canceled,
    Failed,
}

/// What the caller asks a gateway to charge.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub amount_cents: i64,
    /// ISO 4217 code, lowercase.
    pub currency: String,
    pub description: String,
    pub user_id: i64,
    pub property_id: Option<i64>,
}

/// Payment as reported by a gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentIntent {
    pub provider: PaymentProvider,
    pub id: String,
    pub status: PaymentStatus,
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
    /// Token the browser needs to finish the payment (Stripe client secret,
    /// PayPal approval link).
    pub client_action: Option<String>,
    /// PayPal capture id, required for refunds.
    pub capture_id: Option<String>,
}

/// A full refund when `amount_cents` is `None`.
///
/// `currency` accompanies a partial amount and must match the payment.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundRequest {
    pub amount_cents: Option<i64>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Refund {
    pub provider: PaymentProvider,
    pub id: String,
    pub status: String,
    pub amount_cents: Option<i64>,
}
