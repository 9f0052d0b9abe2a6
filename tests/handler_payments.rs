mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::FakePaymentProcessor;
use serde_json::json;
use woonmarkt::domain::entities::{PaymentProvider, Role};

fn payment_payload(provider: &str) -> serde_json::Value {
    json!({
        "provider": provider,
        "amount_cents": 2500,
        "currency": "EUR",
        "description": "  Bezichtiging reserveren ",
        "property_id": 4
    })
}

// ─── POST /api/payments ───

#[tokio::test]
async fn test_create_payment_success() {
    let stripe = Arc::new(FakePaymentProcessor::new(PaymentProvider::Stripe));
    let app = common::TestApp::builder()
        .payment_processor(stripe.clone())
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments")
        .add_header("Authorization", bearer)
        .json(&payment_payload("stripe"))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["provider"], "stripe");
    assert_eq!(body["id"], "stripe_pay_1");
    assert_eq!(body["status"], "requires_action");
    assert_eq!(body["currency"], "eur");

    let created = stripe.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].user_id, 8);
    assert_eq!(created[0].property_id, Some(4));
    assert_eq!(created[0].description, "Bezichtiging reserveren");
}

#[tokio::test]
async fn test_create_payment_requires_token() {
    let app = common::test_app();

    let response = app
        .server
        .post("/api/payments")
        .json(&payment_payload("stripe"))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_payment_unknown_provider() {
    let app = common::test_app();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments")
        .add_header("Authorization", bearer)
        .json(&payment_payload("bitcoin"))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        common::error_fields(&response.json::<serde_json::Value>()),
        vec!["provider"]
    );
}

#[tokio::test]
async fn test_create_payment_unconfigured_provider() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(FakePaymentProcessor::new(PaymentProvider::Stripe)))
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments")
        .add_header("Authorization", bearer)
        .json(&payment_payload("paypal"))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(common::error_fields(&body), vec!["provider"]);
    assert_eq!(body["error"]["details"]["fields"][0]["code"], "unavailable");
}

#[tokio::test]
async fn test_create_payment_amount_out_of_range() {
    let stripe = Arc::new(FakePaymentProcessor::new(PaymentProvider::Stripe));
    let app = common::TestApp::builder()
        .payment_processor(stripe.clone())
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let mut payload = payment_payload("stripe");
    payload["amount_cents"] = json!(10);
    payload["currency"] = json!("euro");

    let response = app
        .server
        .post("/api/payments")
        .add_header("Authorization", bearer)
        .json(&payload)
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        common::error_fields(&response.json::<serde_json::Value>()),
        vec!["amount_cents", "currency"]
    );
    assert!(stripe.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_payment_gateway_failure_is_generic() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(FakePaymentProcessor::failing(
            PaymentProvider::Stripe,
        )))
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments")
        .add_header("Authorization", bearer)
        .json(&payment_payload("stripe"))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["message"], "Internal server error");
    assert!(!response.text().contains("card_declined"));
}

// ─── POST /api/payments/{provider}/{id}/capture ───

#[tokio::test]
async fn test_capture_payment() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(
            FakePaymentProcessor::new(PaymentProvider::Paypal).with_payment("ORDER-1", 8),
        ))
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments/paypal/ORDER-1/capture")
        .add_header("Authorization", bearer)
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["id"], "ORDER-1");
    assert_eq!(body["status"], "succeeded");
    assert_eq!(body["capture_id"], "ORDER-1_capture");
}

#[tokio::test]
async fn test_capture_unknown_provider_in_path() {
    let app = common::test_app();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments/bitcoin/abc/capture")
        .add_header("Authorization", bearer)
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(common::error_fields(&body), vec!["provider"]);
    assert_eq!(body["error"]["details"]["fields"][0]["code"], "unknown");
}

#[tokio::test]
async fn test_capture_rejects_id_with_encoded_slash() {
    let stripe = Arc::new(
        FakePaymentProcessor::new(PaymentProvider::Stripe).with_payment("pi_1", 8),
    );
    let app = common::TestApp::builder()
        .payment_processor(stripe.clone())
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments/stripe/pi_1%2F..%2F..%2Frefunds/capture")
        .add_header("Authorization", bearer)
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(common::error_fields(&body), vec!["id"]);
    assert_eq!(body["error"]["details"]["fields"][0]["code"], "invalid_format");
    assert!(stripe.captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_capture_of_foreign_payment_forbidden() {
    let paypal = Arc::new(
        FakePaymentProcessor::new(PaymentProvider::Paypal).with_payment("ORDER-1", 8),
    );
    let app = common::TestApp::builder()
        .payment_processor(paypal.clone())
        .build();
    let stranger = app.bearer(99, Role::User).await;

    let response = app
        .server
        .post("/api/payments/paypal/ORDER-1/capture")
        .add_header("Authorization", stranger)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert!(paypal.captured.lock().unwrap().is_empty());
}

// ─── POST /api/payments/{provider}/{id}/refund ───

#[tokio::test]
async fn test_refund_of_foreign_payment_forbidden() {
    let stripe = Arc::new(FakePaymentProcessor::new(PaymentProvider::Stripe));
    let app = common::TestApp::builder()
        .payment_processor(stripe.clone())
        .build();
    let owner = app.bearer(8, Role::User).await;
    let stranger = app.bearer(99, Role::User).await;

    let created = app
        .server
        .post("/api/payments")
        .add_header("Authorization", owner)
        .json(&payment_payload("stripe"))
        .await
        .json::<serde_json::Value>();
    let path = format!("/api/payments/stripe/{}/refund", created["id"].as_str().unwrap());

    let response = app
        .server
        .post(&path)
        .add_header("Authorization", stranger)
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<serde_json::Value>()["error"]["code"],
        "forbidden"
    );
    assert!(stripe.refunded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_admin_may_refund_any_payment() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(
            FakePaymentProcessor::new(PaymentProvider::Paypal).with_payment("ORDER-1", 8),
        ))
        .build();
    let admin = app.bearer(1, Role::Admin).await;

    let response = app
        .server
        .post("/api/payments/paypal/ORDER-1_capture/refund")
        .add_header("Authorization", admin)
        .json(&json!({}))
        .await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<serde_json::Value>()["id"],
        "ORDER-1_capture_refund"
    );
}

#[tokio::test]
async fn test_partial_refund_requires_currency() {
    let stripe = Arc::new(
        FakePaymentProcessor::new(PaymentProvider::Stripe).with_payment("pi_123", 8),
    );
    let app = common::TestApp::builder()
        .payment_processor(stripe.clone())
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments/stripe/pi_123/refund")
        .add_header("Authorization", bearer)
        .json(&json!({ "amount_cents": 500 }))
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(common::error_fields(&body), vec!["currency"]);
    assert_eq!(body["error"]["details"]["fields"][0]["code"], "required");
    assert!(stripe.refunded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_full_refund() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(
            FakePaymentProcessor::new(PaymentProvider::Stripe).with_payment("pi_123", 8),
        ))
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments/stripe/pi_123/refund")
        .add_header("Authorization", bearer)
        .json(&json!({}))
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["id"], "pi_123_refund");
    assert_eq!(body["status"], "succeeded");
    assert!(body["amount_cents"].is_null());
}

#[tokio::test]
async fn test_partial_refund() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(
            FakePaymentProcessor::new(PaymentProvider::Stripe).with_payment("pi_123", 8),
        ))
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments/stripe/pi_123/refund")
        .add_header("Authorization", bearer)
        .json(&json!({ "amount_cents": 500, "currency": "EUR" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<serde_json::Value>()["amount_cents"], 500);
}

#[tokio::test]
async fn test_refund_non_positive_amount() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(
            FakePaymentProcessor::new(PaymentProvider::Stripe).with_payment("pi_123", 8),
        ))
        .build();
    let bearer = app.bearer(8, Role::User).await;

    let response = app
        .server
        .post("/api/payments/stripe/pi_123/refund")
        .add_header("Authorization", bearer)
        .json(&json!({ "amount_cents": 0, "currency": "EUR" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        common::error_fields(&response.json::<serde_json::Value>()),
        vec!["amount_cents"]
    );
}

#[tokio::test]
async fn test_payments_are_rate_limited() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(
            FakePaymentProcessor::new(PaymentProvider::Stripe).with_payment("pi_123", 8),
        ))
        .build();
    let bearer = app.bearer(8, Role::User).await;

    for _ in 0..10 {
        app.server
            .post("/api/payments/stripe/pi_123/capture")
            .add_header("Authorization", bearer.clone())
            .await
            .assert_status_ok();
    }

    app.server
        .post("/api/payments")
        .add_header("Authorization", bearer)
        .json(&payment_payload("stripe"))
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);
}
