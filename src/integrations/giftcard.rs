//! Gift-card integration.
//!
//! Sells third-party gift cards through a REST upstream: catalog entries
//! carry fixed or ranged USD prices plus the form fields needed to deliver
//! the card. Order completion is asynchronous, so this integration also
//! recognizes and handles `giftcard.*` webhook events.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::{
    config::GatewayConfig,
    contract::{Integration, sealed},
    error::{GatewayError, Result},
    http::{HttpService, RequestConfig},
    models::{
        AssetDataPage, AssetDescriptor, AssetPrice, FieldInputType, FormField, Pagination,
        QueryParams, SubmitPayload, TransactionResult, WebhookPayload,
    },
};

/// Display name of this integration.
pub const INTEGRATION_NAME: &str = "Giftcards";

/// Configuration key for the gift-card upstream base URL.
pub const CONFIG_API_URL: &str = "GIFTCARD_API_URL";
/// Configuration key for the gift-card upstream API key.
pub const CONFIG_API_KEY: &str = "GIFTCARD_API_KEY";

/// Webhook events from the upstream are namespaced under this prefix.
const EVENT_PREFIX: &str = "giftcard.";
const EVENT_ORDER_COMPLETED: &str = "giftcard.order.completed";

/// One card in the upstream catalog response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpstreamCard {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    min_price: Option<Decimal>,
    #[serde(default)]
    max_price: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
struct CardCatalogResponse {
    cards: Vec<UpstreamCard>,
}

/// Upstream response to an order submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderResponse {
    order_id: String,
    status: String,
    #[serde(default)]
    message: Option<String>,
}

/// Parsed `giftcard.*` webhook event.
#[derive(Debug, Deserialize)]
struct WebhookEvent {
    event: String,
    data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebhookEventData {
    order_id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    completed_at: Option<DateTime<Utc>>,
}

/// Form fields every card submission needs.
fn delivery_fields() -> Vec<FormField> {
    vec![
        FormField {
            name: "Recipient email".to_owned(),
            input_type: FieldInputType::Text,
            key: "recipientEmail".to_owned(),
            options: None,
            required: Some(true),
        },
        FormField {
            name: "Gift message".to_owned(),
            input_type: FieldInputType::Textarea,
            key: "giftMessage".to_owned(),
            options: None,
            required: None,
        },
    ]
}

/// Converts an upstream card to the standard catalog shape.
fn to_asset(card: UpstreamCard) -> Result<AssetDescriptor> {
    let price = match (card.price, card.min_price, card.max_price) {
        (Some(fixed), _, _) => AssetPrice::Fixed(fixed),
        (None, Some(min), Some(max)) => AssetPrice::range(min, max)?,
        _ => {
            return Err(GatewayError::integration(
                INTEGRATION_NAME,
                "get_asset_data",
                format!("card {} has no usable price data", card.id),
            ));
        }
    };
    let mut data = Map::new();
    data.insert("cardId".to_owned(), Value::from(card.id));
    let asset = AssetDescriptor {
        name: card.name,
        description: card.description,
        image: card.image_url,
        price,
        fields: Some(delivery_fields()),
        data,
    };
    asset.validate()?;
    Ok(asset)
}

fn supported_query_params() -> QueryParams {
    Map::from_iter([("search".to_owned(), json!("free-text card name filter"))])
}

/// Gift-card integration instance.
///
/// Constructed fresh per logical operation; construction only copies
/// configuration values and performs no I/O.
#[derive(Debug, Clone)]
pub struct GiftCardIntegration {
    http: HttpService,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl GiftCardIntegration {
    /// Creates an instance bound to the given configuration.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: HttpService::new(),
            api_url: config.get_str(CONFIG_API_URL).map(str::to_owned),
            api_key: config.get_str(CONFIG_API_KEY).map(str::to_owned),
        }
    }

    fn api_url(&self, operation: &'static str) -> Result<&str> {
        self.api_url.as_deref().ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                operation,
                format!("missing configuration key {CONFIG_API_URL}"),
            )
        })
    }

    fn api_key(&self, operation: &'static str) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                operation,
                format!("missing configuration key {CONFIG_API_KEY}"),
            )
        })
    }
}

impl sealed::Sealed for GiftCardIntegration {}

impl Integration for GiftCardIntegration {
    fn name(&self) -> &'static str {
        INTEGRATION_NAME
    }

    async fn get_asset_data<'a>(
        &'a self,
        pagination: Pagination,
        query_params: Option<&'a QueryParams>,
    ) -> Result<AssetDataPage> {
        let base_url = self.api_url("get_asset_data")?;
        let api_key = self.api_key("get_asset_data")?;

        let mut query = Map::new();
        query.insert("page".to_owned(), json!(pagination.page));
        query.insert("limit".to_owned(), json!(pagination.limit));
        if let Some(search) = query_params.and_then(|q| q.get("search")).and_then(Value::as_str) {
            query.insert("search".to_owned(), Value::from(search));
        }

        let response = self
            .http
            .get(
                RequestConfig::get("/cards")
                    .with_base_url(base_url)
                    .with_header("X-Api-Key", api_key)
                    .with_query(&query),
            )
            .await
            .map_err(|e| {
                GatewayError::integration_with_source(
                    INTEGRATION_NAME,
                    "get_asset_data",
                    "failed to fetch card catalog",
                    e,
                )
            })?;
        if !response.is_success() {
            return Err(GatewayError::integration(
                INTEGRATION_NAME,
                "get_asset_data",
                format!("card catalog returned status {}", response.status),
            ));
        }

        let catalog: CardCatalogResponse = response.json().map_err(|e| {
            GatewayError::integration_with_source(
                INTEGRATION_NAME,
                "get_asset_data",
                "malformed card catalog response",
                e,
            )
        })?;
        debug!(cards = catalog.cards.len(), "fetched card catalog");

        let assets =
            catalog.cards.into_iter().map(to_asset).collect::<Result<Vec<AssetDescriptor>>>()?;
        Ok(AssetDataPage { assets, supported_query_params: Some(supported_query_params()) })
    }

    async fn submit_data<'a>(&'a self, payload: &'a SubmitPayload) -> Result<TransactionResult> {
        let base_url = self.api_url("submit_data")?;
        let api_key = self.api_key("submit_data")?;
        let card_id = payload.str_value("cardId").ok_or_else(|| {
            GatewayError::integration(INTEGRATION_NAME, "submit_data", "missing cardId")
        })?;
        let recipient_email = payload.str_value("recipientEmail").ok_or_else(|| {
            GatewayError::integration(INTEGRATION_NAME, "submit_data", "missing recipientEmail")
        })?;

        let mut body = json!({
            "cardId": card_id,
            "amount": payload.amount,
            "recipientEmail": recipient_email,
        });
        if let Some(message) = payload.str_value("giftMessage") {
            body["giftMessage"] = Value::from(message);
        }

        let response = self
            .http
            .post(
                RequestConfig::post("/orders")
                    .with_base_url(base_url)
                    .with_header("X-Api-Key", api_key)
                    .with_payload(body),
            )
            .await
            .map_err(|e| {
                GatewayError::integration_with_source(
                    INTEGRATION_NAME,
                    "submit_data",
                    "failed to place card order",
                    e,
                )
            })?;
        if !response.is_success() {
            return Err(GatewayError::integration(
                INTEGRATION_NAME,
                "submit_data",
                format!("card order returned status {}", response.status),
            ));
        }

        let order: OrderResponse = response.json().map_err(|e| {
            GatewayError::integration_with_source(
                INTEGRATION_NAME,
                "submit_data",
                "malformed card order response",
                e,
            )
        })?;
        // "declined" is an explicit failure result, not an error.
        let success = match order.status.as_str() {
            "accepted" => true,
            "declined" => false,
            other => {
                return Err(GatewayError::integration(
                    INTEGRATION_NAME,
                    "submit_data",
                    format!("unexpected order status {other}"),
                ));
            }
        };

        info!(order_id = %order.order_id, success, "card order placed");
        Ok(TransactionResult {
            success,
            message: order.message,
            transaction_reference: order.order_id,
        })
    }

    async fn handle_webhook<'a>(&'a self, payload: &'a WebhookPayload) -> Result<TransactionResult> {
        let event: WebhookEvent = serde_json::from_value(Value::Object(payload.clone()))
            .map_err(|e| {
                GatewayError::integration_with_source(
                    INTEGRATION_NAME,
                    "handle_webhook",
                    "malformed webhook payload",
                    e,
                )
            })?;

        let success = event.event == EVENT_ORDER_COMPLETED;
        info!(
            event = %event.event,
            order_id = %event.data.order_id,
            completed_at = ?event.data.completed_at,
            "gift card webhook handled"
        );
        Ok(TransactionResult {
            success,
            message: event.data.status.or(Some(event.event)),
            transaction_reference: event.data.order_id,
        })
    }

    fn validate_webhook_payload(&self, payload: &WebhookPayload) -> bool {
        let namespaced = payload
            .get("event")
            .and_then(Value::as_str)
            .is_some_and(|event| event.starts_with(EVENT_PREFIX));
        let has_order = payload
            .get("data")
            .and_then(Value::as_object)
            .is_some_and(|data| data.get("orderId").and_then(Value::as_str).is_some());
        namespaced && has_order
    }
}
