//! Contracts for third-party APIs.
//!
//! Implementations live in `crate::infrastructure::payments` and
//! `crate::infrastructure::statistics`.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::{
    PaymentIntent, PaymentProvider, PaymentRequest, Refund, RefundRequest, RegionStatistic,
};

/// The single failure signal of a payment gateway call.
///
/// Transport errors, non-success statuses and undecodable responses all
/// collapse into this error; `reason` is for logs only.
#[derive(Debug, Error)]
#[error("{provider} payment processing failed: {reason}")]
pub struct PaymentError {
    pub provider: PaymentProvider,
    pub reason: String,
}

impl PaymentError {
    pub fn new(provider: PaymentProvider, reason: impl Into<String>) -> Self {
        Self {
            provider,
            reason: reason.into(),
        }
    }
}

/// A payment gateway.
///
/// Implementations hold no payment state: every call goes to the gateway.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    fn provider(&self) -> PaymentProvider;

    /// Creates a payment (Stripe PaymentIntent, PayPal order).
    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent, PaymentError>;

    /// Captures an authorized payment.
    async fn capture(&self, payment_id: &str) -> Result<PaymentIntent, PaymentError>;

    /// Refunds a captured payment, fully when `amount_cents` is `None`.
    async fn refund(
        &self,
        payment_id: &str,
        request: &RefundRequest,
    ) -> Result<Refund, PaymentError>;

    /// User id recorded on the payment by [`create_payment`](Self::create_payment).
    ///
    /// `None` when the payment carries no owner.
    async fn payment_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError>;

    /// Owner lookup for the id a [`refund`](Self::refund) is addressed to.
    async fn refund_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError>;
}

#[derive(Debug, Error)]
pub enum StatisticsError {
    #[error("statistics request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("statistics service returned {status}")]
    Status { status: u16 },
}

/// Source of regional housing statistics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionalStatisticsSource: Send + Sync {
    /// Fetches the latest regional dataset, in dataset order.
    async fn fetch_regions(&self) -> Result<Vec<RegionStatistic>, StatisticsError>;
}
