mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{FakePaymentProcessor, UnavailableRateLimitStore};
use woonmarkt::domain::entities::PaymentProvider;

#[tokio::test]
async fn test_health_endpoint_success() {
    let app = common::test_app();
    app.seed_property(1, "Amersfoort", 410_000).await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["database"]["message"], "Connected, 1 listings");
    assert_eq!(json["checks"]["rate_limit_store"]["status"], "ok");
    assert_eq!(
        json["checks"]["payment_providers"]["message"],
        "No payment providers configured"
    );
}

#[tokio::test]
async fn test_health_lists_payment_providers() {
    let app = common::TestApp::builder()
        .payment_processor(Arc::new(FakePaymentProcessor::new(PaymentProvider::Stripe)))
        .payment_processor(Arc::new(FakePaymentProcessor::new(PaymentProvider::Paypal)))
        .build();

    let response = app.server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["checks"]["payment_providers"]["status"], "ok");
    assert_eq!(json["checks"]["payment_providers"]["message"], "paypal, stripe");
}

#[tokio::test]
async fn test_health_degraded_when_store_unreachable() {
    let app = common::TestApp::builder()
        .rate_limit_store(Arc::new(UnavailableRateLimitStore))
        .build();

    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "ok");
    assert_eq!(json["checks"]["rate_limit_store"]["status"], "error");
}

#[tokio::test]
async fn test_health_endpoint_structure() {
    let app = common::test_app();

    let json = app.server.get("/health").await.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert!(json.get("version").is_some());
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"].get("rate_limit_store").is_some());
    assert!(json["checks"].get("payment_providers").is_some());
}
