mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;
use woonmarkt::domain::entities::Role;

#[tokio::test]
async fn test_valuation_limit_per_user() {
    let app = common::test_app();
    let property = app.seed_property(1, "Arnhem", 390_000).await;
    let bearer = app.bearer(2, Role::User).await;

    for _ in 0..5 {
        app.server
            .post("/api/valuations")
            .add_header("Authorization", bearer.clone())
            .json(&json!({ "property_id": property.id }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app
        .server
        .post("/api/valuations")
        .add_header("Authorization", bearer)
        .json(&json!({ "property_id": property.id }))
        .await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);

    let retry_after: u64 = response
        .header("retry-after")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!((1..=60).contains(&retry_after));

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "rate_limited");
    assert_eq!(body["error"]["details"]["action"], "valuation");
}

#[tokio::test]
async fn test_limits_are_per_identity() {
    let app = common::test_app();
    let property = app.seed_property(1, "Arnhem", 390_000).await;
    let first = app.bearer(2, Role::User).await;
    let second = app.bearer(3, Role::User).await;

    for _ in 0..6 {
        app.server
            .post("/api/valuations")
            .add_header("Authorization", first.clone())
            .json(&json!({ "property_id": property.id }))
            .await;
    }

    app.server
        .post("/api/valuations")
        .add_header("Authorization", second)
        .json(&json!({ "property_id": property.id }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_requests_do_not_spend_budget() {
    let app = common::test_app();
    let property = app.seed_property(1, "Arnhem", 390_000).await;
    let bearer = app.bearer(2, Role::User).await;

    for _ in 0..10 {
        app.server
            .post("/api/valuations")
            .add_header("Authorization", bearer.clone())
            .json(&json!({ "property_id": 0 }))
            .await
            .assert_status_bad_request();
    }

    app.server
        .post("/api/valuations")
        .add_header("Authorization", bearer)
        .json(&json!({ "property_id": property.id }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[tokio::test]
async fn test_store_outage_fails_open() {
    let app = common::TestApp::builder()
        .rate_limit_store(Arc::new(common::UnavailableRateLimitStore))
        .build();
    let property = app.seed_property(1, "Arnhem", 390_000).await;
    let bearer = app.bearer(2, Role::User).await;

    for _ in 0..8 {
        app.server
            .post("/api/valuations")
            .add_header("Authorization", bearer.clone())
            .json(&json!({ "property_id": property.id }))
            .await
            .assert_status(StatusCode::CREATED);
    }
}
