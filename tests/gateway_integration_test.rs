//! End-to-end tests for the integration gateway.
//!
//! Exercises dispatch, webhook resolution, and both bundled integrations
//! against wiremock upstreams.

use asset_gateway::{
    GatewayError, IntegrationKey, IntegrationMapper,
    config::GatewayConfig,
    models::{AssetPrice, Pagination, QueryParams, SubmitPayload, WebhookPayload},
};
use rust_decimal::Decimal;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path, query_param},
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).try_init();
}

fn rates_body() -> serde_json::Value {
    json!({
        "quotes": {
            "USDNGN": 1500.0,
            "USDKES": 100.0,
            "USDGHS": 15.0,
            "USDUGX": 2500.0,
            "USDETB": 50.0,
        }
    })
}

async fn mapper_with_rates(server: &MockServer) -> IntegrationMapper {
    init_tracing();
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(server)
        .await;

    let config = GatewayConfig::new()
        .with_value("AIRTIME_USERNAME", "sandbox")
        .with_value("AIRTIME_API_KEY", "atsk_test")
        .with_value("AIRTIME_RATES_API", format!("{}/live", server.uri()))
        .with_value("AIRTIME_API_URL", server.uri());
    IntegrationMapper::new(config)
}

#[tokio::test]
async fn test_airtime_catalog_end_to_end() {
    let server = MockServer::start().await;
    let mapper = mapper_with_rates(&server).await;

    let mut query = QueryParams::new();
    query.insert("country".to_owned(), json!("KES"));
    let page = mapper.get_data("airtime", Pagination::new(1, 10), Some(&query)).await.unwrap();

    assert_eq!(page.assets.len(), 1);
    let kenya = &page.assets[0];
    assert_eq!(kenya.name, "Kenya");
    assert_eq!(kenya.data["currencyCode"], "KES");
    // KES 10..=10000 at 100 KES/USD.
    assert_eq!(
        kenya.price,
        AssetPrice::Range { min: Decimal::new(10, 2), max: Decimal::from(100) }
    );

    let supported = page.supported_query_params.unwrap();
    assert_eq!(supported["country"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_airtime_submit_end_to_end() {
    let server = MockServer::start().await;
    let mapper = mapper_with_rates(&server).await;

    Mock::given(method("POST"))
        .and(path("/version1/airtime/send"))
        .and(header("apiKey", "atsk_test"))
        .and(body_partial_json(json!({
            "username": "sandbox",
            "recipients": [{
                "phoneNumber": "+254700000000",
                "currencyCode": "KES",
                "amount": "500",
            }],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorMessage": "None",
            "responses": [{ "requestId": "ATQid_1" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let payload = SubmitPayload::new(Decimal::from(5))
        .with_value("currencyCode", "KES")
        .with_value("phoneNumber", "+254700000000");
    let result = mapper.submit_data("airtime", &payload).await.unwrap();

    assert!(result.success);
    assert_eq!(result.transaction_reference, "ATQid_1");
}

#[tokio::test]
async fn test_airtime_submit_upstream_rejection_is_an_error() {
    let server = MockServer::start().await;
    let mapper = mapper_with_rates(&server).await;

    Mock::given(method("POST"))
        .and(path("/version1/airtime/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errorMessage": "Insufficient balance",
            "responses": [],
        })))
        .mount(&server)
        .await;

    let payload = SubmitPayload::new(Decimal::from(5))
        .with_value("currencyCode", "KES")
        .with_value("phoneNumber", "+254700000000");
    let result = mapper.submit_data("airtime", &payload).await;

    // Upstream rejection surfaces as an error, never as success: false.
    match result {
        Err(GatewayError::Integration { integration, operation, message, .. }) => {
            assert_eq!(integration, "Airtime");
            assert_eq!(operation, "submit_data");
            assert!(message.contains("Insufficient balance"));
        }
        other => panic!("expected integration error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_giftcard_catalog_does_not_touch_airtime() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cards"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "10"))
        .and(header("X-Api-Key", "gc_test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cards": [
                { "id": "card-1", "name": "Acme Card", "price": 25.0 },
                { "id": "card-2", "name": "Flex Card", "minPrice": 5.0, "maxPrice": 500.0 },
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    // No airtime configuration at all: touching the airtime integration
    // would fail the call.
    let config = GatewayConfig::new()
        .with_value("GIFTCARD_API_URL", server.uri())
        .with_value("GIFTCARD_API_KEY", "gc_test");
    let mapper = IntegrationMapper::new(config);

    let page = mapper.get_data("giftcards", Pagination::new(1, 10), None).await.unwrap();
    assert_eq!(page.assets.len(), 2);
    assert_eq!(page.assets[0].price, AssetPrice::Fixed(Decimal::from(25)));
    assert_eq!(
        page.assets[1].price,
        AssetPrice::Range { min: Decimal::from(5), max: Decimal::from(500) }
    );
    assert_eq!(page.assets[1].data["cardId"], "card-2");
}

#[tokio::test]
async fn test_giftcard_declined_order_is_an_explicit_failure_result() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": "ord-2",
            "status": "declined",
            "message": "insufficient stock",
        })))
        .mount(&server)
        .await;

    let config = GatewayConfig::new()
        .with_value("GIFTCARD_API_URL", server.uri())
        .with_value("GIFTCARD_API_KEY", "gc_test");
    let mapper = IntegrationMapper::new(config);

    let payload = SubmitPayload::new(Decimal::from(25))
        .with_value("cardId", "card-1")
        .with_value("recipientEmail", "buyer@example.com");
    let result = mapper.submit_data("giftcards", &payload).await.unwrap();

    // A declined order is a failure result, not an error.
    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some("insufficient stock"));
    assert_eq!(result.transaction_reference, "ord-2");
}

#[tokio::test]
async fn test_webhook_routes_to_giftcards_by_content() {
    init_tracing();
    let mapper = IntegrationMapper::new(GatewayConfig::new());
    let payload: WebhookPayload = serde_json::from_value(json!({
        "event": "giftcard.order.completed",
        "data": { "orderId": "ord-7", "status": "completed" },
    }))
    .unwrap();

    let result = mapper.handle_webhook(&payload).await.unwrap();
    assert!(result.success);
    assert_eq!(result.transaction_reference, "ord-7");
    assert_eq!(result.message.as_deref(), Some("completed"));
}

#[tokio::test]
async fn test_webhook_unrecognized_payload_not_found() {
    init_tracing();
    let mapper = IntegrationMapper::new(GatewayConfig::new());
    let payload: WebhookPayload =
        serde_json::from_value(json!({ "event": "unrelated.ping" })).unwrap();

    let result = mapper.handle_webhook(&payload).await;
    assert!(result.is_err_and(|e| e.is_not_found()));
}

#[tokio::test]
async fn test_unknown_key_not_found_with_offending_key() {
    init_tracing();
    let mapper = IntegrationMapper::new(GatewayConfig::new());
    let result = mapper.get_data("gamma", Pagination::new(1, 10), None).await;

    match result {
        Err(GatewayError::NotFound(key)) => assert_eq!(key, "gamma"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_listing_matches_registry_order() {
    init_tracing();
    let mapper = IntegrationMapper::new(GatewayConfig::new());
    let listings = mapper.integrations();

    let keys: Vec<IntegrationKey> = listings.iter().map(|l| l.key).collect();
    let names: Vec<&str> = listings.iter().map(|l| l.name).collect();
    assert_eq!(keys, vec![IntegrationKey::Airtime, IntegrationKey::Giftcards]);
    assert_eq!(names, vec!["Airtime", "Giftcards"]);
}

#[tokio::test]
async fn test_full_toml_configuration_flow() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(200).set_body_json(rates_body()))
        .mount(&server)
        .await;

    let toml = format!(
        r#"
        AIRTIME_USERNAME = "sandbox"
        AIRTIME_API_KEY = "atsk_test"
        AIRTIME_RATES_API = "{uri}/live"
        AIRTIME_API_URL = "{uri}"
        GIFTCARD_API_URL = "{uri}"
        GIFTCARD_API_KEY = "gc_test"
        "#,
        uri = server.uri()
    );
    let config = GatewayConfig::from_toml(&toml).unwrap();
    assert_eq!(config.get_str("AIRTIME_USERNAME"), Some("sandbox"));

    let mapper = IntegrationMapper::new(config);
    let page = mapper.get_data("airtime", Pagination::new(1, 10), None).await.unwrap();
    assert_eq!(page.assets.len(), 5);
    for asset in &page.assets {
        asset.validate().unwrap();
    }
}
