//! Stripe PaymentIntents client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, error};

use super::endpoint;
use super::idempotency::generate_idempotency_key;
use crate::domain::entities::{
    PaymentIntent, PaymentProvider, PaymentRequest, PaymentStatus, Refund, RefundRequest,
};
use crate::domain::gateways::{PaymentError, PaymentProcessor};

#[derive(Debug, Deserialize)]
struct StripePaymentIntent {
    id: String,
    status: String,
    amount: Option<i64>,
    currency: Option<String>,
    client_secret: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct StripeRefund {
    id: String,
    status: Option<String>,
    amount: Option<i64>,
}

/// Maps a PaymentIntent status onto [`PaymentStatus`].
fn map_status(status: &str) -> Option<PaymentStatus> {
    match status {
        "requires_payment_method" | "requires_confirmation" | "requires_action" => {
            Some(PaymentStatus::RequiresAction)
        }
        "requires_capture" => Some(PaymentStatus::RequiresCapture),
        "processing" => Some(PaymentStatus::Processing),
        "succeeded" => Some(PaymentStatus::Succeeded),
        "canceled" => Some(PaymentStatus::Canceled),
        _ => None,
    }
}

/// Stripe gateway.
///
/// Payments are created with `capture_method=manual` and captured by a second
/// call. Every POST carries a freshly generated `Idempotency-Key`; the
/// creating user is stored in `metadata[user_id]`.
pub struct StripeProcessor {
    http: Client,
    secret_key: String,
    api_base: String,
}

impl StripeProcessor {
    pub fn new(http: Client, secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http,
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn post(&self, segments: &[&str]) -> Result<RequestBuilder, PaymentError> {
        let url = endpoint(PaymentProvider::Stripe, &self.api_base, segments)?;

        Ok(self
            .http
            .post(url)
            .bearer_auth(&self.secret_key)
            .header("Idempotency-Key", generate_idempotency_key()))
    }

    async fn retrieve(&self, payment_id: &str) -> Result<StripePaymentIntent, PaymentError> {
        let url = endpoint(
            PaymentProvider::Stripe,
            &self.api_base,
            &["v1", "payment_intents", payment_id],
        )?;

        self.send(self.http.get(url).bearer_auth(&self.secret_key), "retrieve")
            .await
    }

    async fn send<T>(&self, request: RequestBuilder, operation: &str) -> Result<T, PaymentError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Stripe {} request failed", operation);
            PaymentError::new(PaymentProvider::Stripe, format!("{operation}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Stripe {} rejected", operation);
            return Err(PaymentError::new(
                PaymentProvider::Stripe,
                format!("{operation}: HTTP {status}"),
            ));
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse Stripe {} response", operation);
            PaymentError::new(PaymentProvider::Stripe, format!("{operation}: {e}"))
        })?;

        debug!("Stripe {} succeeded", operation);
        Ok(parsed)
    }

    fn to_intent(&self, intent: StripePaymentIntent) -> Result<PaymentIntent, PaymentError> {
        let status = map_status(&intent.status).ok_or_else(|| {
            PaymentError::new(
                PaymentProvider::Stripe,
                format!("unknown payment intent status '{}'", intent.status),
            )
        })?;

        Ok(PaymentIntent {
            provider: PaymentProvider::Stripe,
            id: intent.id,
            status,
            amount_cents: intent.amount,
            currency: intent.currency,
            client_action: intent.client_secret,
            capture_id: None,
        })
    }
}

#[async_trait]
impl PaymentProcessor for StripeProcessor {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Stripe
    }

    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent, PaymentError> {
        let mut form = vec![
            ("amount", request.amount_cents.to_string()),
            ("currency", request.currency.clone()),
            ("description", request.description.clone()),
            ("capture_method", "manual".to_string()),
            ("metadata[user_id]", request.user_id.to_string()),
        ];
        if let Some(property_id) = request.property_id {
            form.push(("metadata[property_id]", property_id.to_string()));
        }

        let intent: StripePaymentIntent = self
            .send(self.post(&["v1", "payment_intents"])?.form(&form), "create")
            .await?;

        self.to_intent(intent)
    }

    async fn capture(&self, payment_id: &str) -> Result<PaymentIntent, PaymentError> {
        let request = self.post(&["v1", "payment_intents", payment_id, "capture"])?;
        let intent: StripePaymentIntent = self.send(request, "capture").await?;

        self.to_intent(intent)
    }

    async fn refund(
        &self,
        payment_id: &str,
        request: &RefundRequest,
    ) -> Result<Refund, PaymentError> {
        let mut form = vec![("payment_intent", payment_id.to_string())];
        if let Some(amount) = request.amount_cents {
            form.push(("amount", amount.to_string()));
        }

        let refund: StripeRefund = self
            .send(self.post(&["v1", "refunds"])?.form(&form), "refund")
            .await?;

        Ok(Refund {
            provider: PaymentProvider::Stripe,
            id: refund.id,
            status: refund.status.unwrap_or_else(|| "pending".to_string()),
            amount_cents: refund.amount,
        })
    }

    async fn payment_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError> {
        let intent = self.retrieve(payment_id).await?;
        Ok(intent.metadata.get("user_id").and_then(|id| id.parse().ok()))
    }

    /// Stripe refunds address the PaymentIntent itself.
    async fn refund_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError> {
        self.payment_owner(payment_id).await
    }
}
