//! PayPal Orders v2 client.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use super::endpoint;

use crate::domain::entities::{
    PaymentIntent, PaymentProvider, PaymentRequest, PaymentStatus, Refund, RefundRequest,
};
use crate::domain::gateways::{PaymentError, PaymentProcessor};

/// Formats minor units as a PayPal decimal string (`1234` -> `"12.34"`).
pub fn format_amount(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Parses a PayPal decimal string back into minor units.
pub fn parse_amount(value: &str) -> Option<i64> {
    let (whole, fraction) = match value.split_once('.') {
        Some((w, f)) => (w, f),
        None => (value, "0"),
    };
    if fraction.len() > 2 {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let fraction: i64 = format!("{fraction:0<2}").parse().ok()?;
    Some(whole * 100 + fraction)
}

fn map_status(status: &str) -> Option<PaymentStatus> {
    match status {
        "CREATED" | "SAVED" => Some(PaymentStatus::Created),
        "PAYER_ACTION_REQUIRED" => Some(PaymentStatus::RequiresAction),
        "APPROVED" => Some(PaymentStatus::RequiresCapture),
        "PENDING" => Some(PaymentStatus::Processing),
        "COMPLETED" => Some(PaymentStatus::Succeeded),
        "VOIDED" => Some(PaymentStatus::Canceled),
        "DECLINED" | "FAILED" => Some(PaymentStatus::Failed),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Money {
    currency_code: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
    rel: String,
}

#[derive(Debug, Deserialize)]
struct Capture {
    id: String,
    amount: Option<Money>,
}

#[derive(Debug, Default, Deserialize)]
struct Payments {
    #[serde(default)]
    captures: Vec<Capture>,
}

#[derive(Debug, Deserialize)]
struct PurchaseUnit {
    custom_id: Option<String>,
    amount: Option<Money>,
    payments: Option<Payments>,
}

#[derive(Debug, Deserialize)]
struct Order {
    id: String,
    status: String,
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default)]
    purchase_units: Vec<PurchaseUnit>,
}

/// `GET /v2/payments/captures/{id}` carries the purchase unit's `custom_id`.
#[derive(Debug, Deserialize)]
struct CaptureDetails {
    custom_id: Option<String>,
}

/// Owners are stored as the decimal user id in `custom_id`.
fn parse_owner(custom_id: Option<&str>) -> Option<i64> {
    custom_id.and_then(|id| id.parse().ok())
}

#[derive(Debug, Deserialize)]
struct PayPalRefund {
    id: String,
    status: String,
    amount: Option<Money>,
}

/// PayPal gateway.
///
/// Each operation first exchanges the client credentials for an access
/// token; tokens are not cached.
pub struct PayPalProcessor {
    http: Client,
    client_id: String,
    client_secret: String,
    api_base: String,
}

impl PayPalProcessor {
    pub fn new(
        http: Client,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    async fn send<T>(&self, request: RequestBuilder, operation: &str) -> Result<T, PaymentError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "PayPal {} request failed", operation);
            PaymentError::new(PaymentProvider::Paypal, format!("{operation}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "PayPal {} rejected", operation);
            return Err(PaymentError::new(
                PaymentProvider::Paypal,
                format!("{operation}: HTTP {status}"),
            ));
        }

        let parsed = response.json::<T>().await.map_err(|e| {
            error!(error = %e, "Failed to parse PayPal {} response", operation);
            PaymentError::new(PaymentProvider::Paypal, format!("{operation}: {e}"))
        })?;

        debug!("PayPal {} succeeded", operation);
        Ok(parsed)
    }

    async fn access_token(&self) -> Result<String, PaymentError> {
        let url = endpoint(PaymentProvider::Paypal, &self.api_base, &["v1", "oauth2", "token"])?;
        let request = self
            .http
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let token: AccessToken = self.send(request, "token").await?;
        Ok(token.access_token)
    }

    async fn post_json<T>(
        &self,
        segments: &[&str],
        body: Value,
        operation: &str,
    ) -> Result<T, PaymentError>
    where
        T: DeserializeOwned,
    {
        let url = endpoint(PaymentProvider::Paypal, &self.api_base, segments)?;
        let token = self.access_token().await?;
        let request = self.http.post(url).bearer_auth(token).json(&body);

        self.send(request, operation).await
    }

    async fn get_json<T>(&self, segments: &[&str], operation: &str) -> Result<T, PaymentError>
    where
        T: DeserializeOwned,
    {
        let url = endpoint(PaymentProvider::Paypal, &self.api_base, segments)?;
        let token = self.access_token().await?;

        self.send(self.http.get(url).bearer_auth(token), operation).await
    }

    fn to_intent(&self, order: Order) -> Result<PaymentIntent, PaymentError> {
        let status = map_status(&order.status).ok_or_else(|| {
            PaymentError::new(
                PaymentProvider::Paypal,
                format!("unknown order status '{}'", order.status),
            )
        })?;

        let client_action = order
            .links
            .iter()
            .find(|l| l.rel == "approve" || l.rel == "payer-action")
            .map(|l| l.href.clone());

        let unit = order.purchase_units.first();
        let capture = unit
            .and_then(|u| u.payments.as_ref())
            .and_then(|p| p.captures.first());
        let amount = capture
            .and_then(|c| c.amount.as_ref())
            .or_else(|| unit.and_then(|u| u.amount.as_ref()));

        Ok(PaymentIntent {
            provider: PaymentProvider::Paypal,
            id: order.id,
            status,
            amount_cents: amount.and_then(|m| parse_amount(&m.value)),
            currency: amount.map(|m| m.currency_code.to_lowercase()),
            client_action,
            capture_id: capture.map(|c| c.id.clone()),
        })
    }
}

#[async_trait]
impl PaymentProcessor for PayPalProcessor {
    fn provider(&self) -> PaymentProvider {
        PaymentProvider::Paypal
    }

    async fn create_payment(&self, request: &PaymentRequest) -> Result<PaymentIntent, PaymentError> {
        let reference_id = request
            .property_id
            .map(|id| format!("property-{id}"))
            .unwrap_or_else(|| format!("user-{}", request.user_id));

        let body = json!({
            "intent": "CAPTURE",
            "purchase_units": [{
                "reference_id": reference_id,
                "custom_id": request.user_id.to_string(),
                "description": request.description,
                "amount": {
                    "currency_code": request.currency.to_uppercase(),
                    "value": format_amount(request.amount_cents),
                },
            }],
        });

        let order: Order = self
            .post_json(&["v2", "checkout", "orders"], body, "create")
            .await?;
        self.to_intent(order)
    }

    async fn capture(&self, payment_id: &str) -> Result<PaymentIntent, PaymentError> {
        let order: Order = self
            .post_json(
                &["v2", "checkout", "orders", payment_id, "capture"],
                json!({}),
                "capture",
            )
            .await?;

        self.to_intent(order)
    }

    /// `payment_id` is the capture id returned by [`capture`](Self::capture).
    async fn refund(
        &self,
        payment_id: &str,
        request: &RefundRequest,
    ) -> Result<Refund, PaymentError> {
        let body = match (request.amount_cents, request.currency.as_deref()) {
            (Some(cents), Some(currency)) => json!({
                "amount": {
                    "value": format_amount(cents),
                    "currency_code": currency.to_uppercase(),
                }
            }),
            (Some(_), None) => {
                return Err(PaymentError::new(
                    PaymentProvider::Paypal,
                    "refund: partial amount without currency",
                ));
            }
            (None, _) => json!({}),
        };

        let refund: PayPalRefund = self
            .post_json(
                &["v2", "payments", "captures", payment_id, "refund"],
                body,
                "refund",
            )
            .await?;

        Ok(Refund {
            provider: PaymentProvider::Paypal,
            id: refund.id,
            status: refund.status.to_lowercase(),
            amount_cents: refund.amount.and_then(|m| parse_amount(&m.value)),
        })
    }

    async fn payment_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError> {
        let order: Order = self
            .get_json(&["v2", "checkout", "orders", payment_id], "order lookup")
            .await?;

        Ok(parse_owner(
            order.purchase_units.first().and_then(|u| u.custom_id.as_deref()),
        ))
    }

    /// PayPal refunds address a capture, which keeps the order's `custom_id`.
    async fn refund_owner(&self, payment_id: &str) -> Result<Option<i64>, PaymentError> {
        let capture: CaptureDetails = self
            .get_json(&["v2", "payments", "captures", payment_id], "capture lookup")
            .await?;

        Ok(parse_owner(capture.custom_id.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1234), "12.34");
        assert_eq!(format_amount(5), "0.05");
        assert_eq!(format_amount(100_000), "1000.00");
        assert_eq!(format_amount(0), "0.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.34"), Some(1234));
        assert_eq!(parse_amount("12.3"), Some(1230));
        assert_eq!(parse_amount("12"), Some(1200));
        assert_eq!(parse_amount("1.234"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_owner() {
        assert_eq!(parse_owner(Some("8")), Some(8));
        assert_eq!(parse_owner(Some("property-4")), None);
        assert_eq!(parse_owner(None), None);
    }

    #[test]
    fn test_order_maps_capture_and_approval_link() {
        let order: Order = serde_json::from_value(json!({
            "id": "ORDER-1",
            "status": "COMPLETED",
            "links": [{"href": "https://paypal.test/approve", "rel": "approve"}],
            "purchase_units": [{
                "payments": {"captures": [{
                    "id": "CAP-9",
                    "amount": {"currency_code": "EUR", "value": "250.00"}
                }]}
            }]
        }))
        .unwrap();

        let processor = PayPalProcessor::new(Client::new(), "id", "secret", "http://localhost:1");
        let intent = processor.to_intent(order).unwrap();

        assert_eq!(intent.status, PaymentStatus::Succeeded);
        assert_eq!(intent.capture_id.as_deref(), Some("CAP-9"));
        assert_eq!(intent.amount_cents, Some(25_000));
        assert_eq!(intent.currency.as_deref(), Some("eur"));
        assert_eq!(
            intent.client_action.as_deref(),
            Some("https://paypal.test/approve")
        );
    }
}
