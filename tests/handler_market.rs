mod common;

use axum::http::StatusCode;
use common::{FakeStatistics, region};

// ─── GET /api/market/{city} ───

#[tokio::test]
async fn test_market_overview_without_matching_region() {
    let app = common::TestApp::builder()
        .statistics(FakeStatistics::with_regions(vec![region(
            "Amsterdam",
            610_000.0,
            4.1,
        )]))
        .build();
    app.seed_property(1, "Utrecht", 400_000).await;
    app.seed_property(2, "Utrecht", 600_000).await;

    let response = app.server.get("/api/market/Utrecht").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["city"], "Utrecht");
    assert_eq!(body["source"], "database_only");
    assert_eq!(body["listing_count"], 2);
    assert_eq!(body["average_asking_price"], 500_000.0);
    assert_eq!(body["average_price_per_m2"], 5_000.0);
    assert_eq!(body["regional_average_sale_price"], 429_000.0);
    assert_eq!(body["yearly_change_pct"], 8.5);
    assert!(body.get("matched_region").is_none());
}

#[tokio::test]
async fn test_market_overview_with_matching_region() {
    let app = common::TestApp::builder()
        .statistics(FakeStatistics::with_regions(vec![
            region("Nederland", 429_000.0, 8.5),
            region("Utrecht (PV)", 498_000.0, 6.2),
            region("Utrecht (gemeente)", 512_000.0, 7.0),
        ]))
        .build();
    app.seed_property(1, "Utrecht", 450_000).await;

    let response = app.server.get("/api/market/utrecht").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["source"], "cbs");
    assert_eq!(body["matched_region"], "Utrecht (PV)");
    assert_eq!(body["regional_average_sale_price"], 498_000.0);
    assert_eq!(body["yearly_change_pct"], 6.2);
    assert_eq!(body["listing_count"], 1);
}

#[tokio::test]
async fn test_market_overview_city_without_listings() {
    let app = common::test_app();

    let response = app.server.get("/api/market/Delft").await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["listing_count"], 0);
    assert_eq!(body["average_asking_price"], 450_000.0);
    assert_eq!(body["average_price_per_m2"], 4_750.0);
}

#[tokio::test]
async fn test_market_overview_statistics_outage() {
    let app = common::TestApp::builder()
        .statistics(FakeStatistics::failing(503))
        .build();

    let response = app.server.get("/api/market/Utrecht").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["message"], "Internal server error");
    assert_eq!(body["error"]["details"], serde_json::json!({}));
}

#[tokio::test]
async fn test_market_overview_blank_city() {
    let app = common::test_app();

    let response = app.server.get("/api/market/%20%20").await;

    response.assert_status_bad_request();
    assert_eq!(
        common::error_fields(&response.json::<serde_json::Value>()),
        vec!["city"]
    );
}

// ─── GET /api/mortgage ───

#[tokio::test]
async fn test_mortgage_quote() {
    let app = common::test_app();

    let response = app
        .server
        .get("/api/mortgage")
        .add_query_param("purchase_price", "300000")
        .add_query_param("down_payment", "50000")
        .add_query_param("interest_rate", "0")
        .add_query_param("years", "25")
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["loan_amount"], 250_000.0);
    assert_eq!(body["monthly_payment"], 833.33);
    assert_eq!(body["transfer_tax"], 6_000.0);
    assert_eq!(body["years"], 25);
}

#[tokio::test]
async fn test_mortgage_defaults_to_thirty_years() {
    let app = common::test_app();

    let response = app
        .server
        .get("/api/mortgage")
        .add_query_param("purchase_price", "400000")
        .add_query_param("interest_rate", "4")
        .await;

    response.assert_status_ok();

    let body = response.json::<serde_json::Value>();
    assert_eq!(body["years"], 30);
    assert_eq!(body["down_payment"], 0.0);
    assert_eq!(body["loan_amount"], 400_000.0);
}

#[tokio::test]
async fn test_mortgage_missing_purchase_price() {
    let app = common::test_app();

    let response = app
        .server
        .get("/api/mortgage")
        .add_query_param("interest_rate", "4")
        .await;

    response.assert_status_bad_request();

    let body = response.json::<serde_json::Value>();
    assert_eq!(common::error_fields(&body), vec!["purchase_price"]);
    assert_eq!(body["error"]["details"]["fields"][0]["code"], "required");
}

#[tokio::test]
async fn test_mortgage_down_payment_above_price() {
    let app = common::test_app();

    let response = app
        .server
        .get("/api/mortgage")
        .add_query_param("purchase_price", "200000")
        .add_query_param("down_payment", "250000")
        .add_query_param("interest_rate", "4")
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        common::error_fields(&response.json::<serde_json::Value>()),
        vec!["down_payment"]
    );
}

#[tokio::test]
async fn test_mortgage_rate_out_of_range() {
    let app = common::test_app();

    let response = app
        .server
        .get("/api/mortgage")
        .add_query_param("purchase_price", "200000")
        .add_query_param("interest_rate", "25")
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        common::error_fields(&response.json::<serde_json::Value>()),
        vec!["interest_rate"]
    );
}
