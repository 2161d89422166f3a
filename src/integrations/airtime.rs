//! Airtime top-up integration.
//!
//! Sells mobile airtime in supported African markets through an Africa's
//! Talking-style REST upstream. Catalog prices are quoted in USD, derived
//! from per-currency value limits and a live exchange-rate feed; submissions
//! convert the USD amount back to the recipient's local currency.
//!
//! The upstream pushes no notifications for airtime, so webhooks are a
//! permanent capability gap: the payload predicate always declines and
//! [`handle_webhook`](crate::contract::Integration::handle_webhook) returns
//! [`GatewayError::NotImplemented`].

use std::collections::HashMap;

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
        AssetDataPage, AssetDescriptor, AssetPrice, Pagination, QueryParams, SubmitPayload,
        TransactionResult, WebhookPayload,
    },
};

/// Display name of this integration.
pub const INTEGRATION_NAME: &str = "Airtime";

/// Configuration key for the upstream account username.
pub const CONFIG_USERNAME: &str = "AIRTIME_USERNAME";
/// Configuration key for the upstream API key.
pub const CONFIG_API_KEY: &str = "AIRTIME_API_KEY";
/// Configuration key for the exchange-rate feed URL.
pub const CONFIG_RATES_API: &str = "AIRTIME_RATES_API";
/// Configuration key overriding the airtime API base URL.
pub const CONFIG_API_URL: &str = "AIRTIME_API_URL";

const DEFAULT_API_URL: &str = "https://api.africastalking.com";
const SEND_PATH: &str = "/version1/airtime/send";

/// A market the airtime upstream can deliver to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedCountry {
    /// Country display name.
    pub name: &'static str,
    /// ISO 4217 currency code.
    pub currency_code: &'static str,
    /// Minimum transaction value, in local currency units.
    pub min: i64,
    /// Maximum transaction value, in local currency units.
    pub max: i64,
}

/// Supported markets with the upstream's per-currency request limits.
pub const SUPPORTED_COUNTRIES: [SupportedCountry; 5] = [
    SupportedCountry { name: "Nigeria", currency_code: "NGN", min: 10, max: 20 },
    SupportedCountry { name: "Kenya", currency_code: "KES", min: 10, max: 10_000 },
    SupportedCountry { name: "Ghana", currency_code: "GHS", min: 10, max: 20 },
    SupportedCountry { name: "Uganda", currency_code: "UGX", min: 500, max: 100_000 },
    SupportedCountry { name: "Ethiopia", currency_code: "ETB", min: 10, max: 10_000 },
];

/// Exchange-rate feed response: `quotes` keyed by `USD<code>`.
#[derive(Debug, Deserialize)]
struct RatesResponse {
    quotes: HashMap<String, Decimal>,
}

/// Upstream response to an airtime send.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SendResponse {
    error_message: String,
    #[serde(default)]
    responses: Vec<RecipientResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecipientResponse {
    request_id: String,
}

/// Looks up a supported country by currency code.
fn country_for(currency_code: &str) -> Option<&'static SupportedCountry> {
    SUPPORTED_COUNTRIES.iter().find(|c| c.currency_code == currency_code)
}

/// Extracts the exchange rate for a currency from the feed quotes.
fn rate_for(
    quotes: &HashMap<String, Decimal>,
    currency_code: &str,
    operation: &'static str,
) -> Result<Decimal> {
    let rate = quotes
        .get(&format!("USD{currency_code}"))
        .copied()
        .ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                operation,
                format!("exchange rate not found for {currency_code}"),
            )
        })?;
    if rate <= Decimal::ZERO {
        return Err(GatewayError::integration(
            INTEGRATION_NAME,
            operation,
            format!("non-positive exchange rate for {currency_code}"),
        ));
    }
    Ok(rate)
}

/// Converts a country's local value limits to a USD price range.
fn usd_limits(country: &SupportedCountry, rate: Decimal) -> Result<AssetPrice> {
    let convert = |limit: i64| {
        Decimal::from(limit).checked_div(rate).map(|usd| usd.round_dp(2)).ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                "get_asset_data",
                format!("exchange rate {rate} unusable for {}", country.currency_code),
            )
        })
    };
    AssetPrice::range(convert(country.min)?, convert(country.max)?)
}

/// Converts a USD amount to local currency, enforcing the upstream limits.
fn localized_amount(
    country: &SupportedCountry,
    rate: Decimal,
    amount_usd: Decimal,
) -> Result<Decimal> {
    let local = amount_usd
        .checked_mul(rate)
        .map(|local| local.round_dp(2))
        .ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                "submit_data",
                format!(
                    "amount {amount_usd} USD does not convert to {}",
                    country.currency_code
                ),
            )
        })?;
    if local < Decimal::from(country.min) || local > Decimal::from(country.max) {
        return Err(GatewayError::integration(
            INTEGRATION_NAME,
            "submit_data",
            format!(
                "amount {local} {} outside supported range {}..={}",
                country.currency_code, country.min, country.max
            ),
        ));
    }
    Ok(local)
}

/// Builds the catalog from feed quotes, optionally filtered by currency code.
fn build_catalog(
    quotes: &HashMap<String, Decimal>,
    country_filter: Option<&str>,
) -> Result<Vec<AssetDescriptor>> {
    let mut assets = Vec::new();
    for country in &SUPPORTED_COUNTRIES {
        if country_filter.is_some_and(|code| code != country.currency_code) {
            continue;
        }
        let rate = rate_for(quotes, country.currency_code, "get_asset_data")?;
        let mut data = Map::new();
        data.insert("currencyCode".to_owned(), Value::from(country.currency_code));
        assets.push(AssetDescriptor {
            name: country.name.to_owned(),
            description: None,
            image: None,
            price: usd_limits(country, rate)?,
            fields: None,
            data,
        });
    }
    Ok(assets)
}

fn supported_query_params() -> QueryParams {
    let codes: Vec<&str> = SUPPORTED_COUNTRIES.iter().map(|c| c.currency_code).collect();
    Map::from_iter([("country".to_owned(), json!(codes))])
}

/// Airtime top-up integration instance.
///
/// Constructed fresh per logical operation; construction only copies
/// configuration values and performs no I/O.
#[derive(Debug, Clone)]
pub struct AirtimeIntegration {
    http: HttpService,
    username: Option<String>,
    api_key: Option<String>,
    api_url: String,
    rates_api: Option<String>,
}

impl AirtimeIntegration {
    /// Creates an instance bound to the given configuration.
    #[must_use]
    pub fn new(config: &GatewayConfig) -> Self {
        Self {
            http: HttpService::new(),
            username: config.get_str(CONFIG_USERNAME).map(str::to_owned),
            api_key: config.get_str(CONFIG_API_KEY).map(str::to_owned),
            api_url: config
                .get_str(CONFIG_API_URL)
                .unwrap_or(DEFAULT_API_URL)
                .to_owned(),
            rates_api: config.get_str(CONFIG_RATES_API).map(str::to_owned),
        }
    }

    fn require<'a>(
        value: &'a Option<String>,
        key: &str,
        operation: &'static str,
    ) -> Result<&'a str> {
        value.as_deref().ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                operation,
                format!("missing configuration key {key}"),
            )
        })
    }

    async fn exchange_rates(&self, operation: &'static str) -> Result<HashMap<String, Decimal>> {
        let rates_api = Self::require(&self.rates_api, CONFIG_RATES_API, operation)?;
        let response = self.http.get(RequestConfig::get(rates_api)).await.map_err(|e| {
            GatewayError::integration_with_source(
                INTEGRATION_NAME,
                operation,
                "failed to get exchange rates",
                e,
            )
        })?;
        if !response.is_success() {
            return Err(GatewayError::integration(
                INTEGRATION_NAME,
                operation,
                format!("exchange rate feed returned status {}", response.status),
            ));
        }
        let rates: RatesResponse = response.json().map_err(|e| {
            GatewayError::integration_with_source(
                INTEGRATION_NAME,
                operation,
                "malformed exchange rate feed response",
                e,
            )
        })?;
        debug!(quotes = rates.quotes.len(), "fetched exchange rates");
        Ok(rates.quotes)
    }
}

impl sealed::Sealed for AirtimeIntegration {}

impl Integration for AirtimeIntegration {
    fn name(&self) -> &'static str {
        INTEGRATION_NAME
    }

    async fn get_asset_data<'a>(
        &'a self,
        _pagination: Pagination,
        query_params: Option<&'a QueryParams>,
    ) -> Result<AssetDataPage> {
        let country_filter =
            query_params.and_then(|q| q.get("country")).and_then(Value::as_str);
        let quotes = self.exchange_rates("get_asset_data").await?;
        let assets = build_catalog(&quotes, country_filter)?;
        Ok(AssetDataPage { assets, supported_query_params: Some(supported_query_params()) })
    }

    async fn submit_data<'a>(&'a self, payload: &'a SubmitPayload) -> Result<TransactionResult> {
        let username = Self::require(&self.username, CONFIG_USERNAME, "submit_data")?;
        let api_key = Self::require(&self.api_key, CONFIG_API_KEY, "submit_data")?;
        let currency_code = payload.str_value("currencyCode").ok_or_else(|| {
            GatewayError::integration(INTEGRATION_NAME, "submit_data", "missing currencyCode")
        })?;
        let phone_number = payload.str_value("phoneNumber").ok_or_else(|| {
            GatewayError::integration(INTEGRATION_NAME, "submit_data", "missing phoneNumber")
        })?;
        let country = country_for(currency_code).ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                "submit_data",
                format!("unsupported currency {currency_code}"),
            )
        })?;

        let quotes = self.exchange_rates("submit_data").await?;
        let rate = rate_for(&quotes, currency_code, "submit_data")?;
        let amount = localized_amount(country, rate, payload.amount)?;

        let body = json!({
            "username": username,
            "recipients": [{
                "phoneNumber": phone_number,
                "currencyCode": currency_code,
                "amount": amount.to_string(),
            }],
        });
        let response = self
            .http
            .post(
                RequestConfig::post(SEND_PATH)
                    .with_base_url(&self.api_url)
                    .with_header("apiKey", api_key)
                    .with_header("Accept", "application/json")
                    .with_payload(body),
            )
            .await
            .map_err(|e| {
                GatewayError::integration_with_source(
                    INTEGRATION_NAME,
                    "submit_data",
                    "failed to send airtime",
                    e,
                )
            })?;
        if !response.is_success() {
            return Err(GatewayError::integration(
                INTEGRATION_NAME,
                "submit_data",
                format!("airtime API returned status {}", response.status),
            ));
        }

        let send: SendResponse = response.json().map_err(|e| {
            GatewayError::integration_with_source(
                INTEGRATION_NAME,
                "submit_data",
                "malformed airtime API response",
                e,
            )
        })?;
        if send.error_message != "None" {
            return Err(GatewayError::integration(
                INTEGRATION_NAME,
                "submit_data",
                format!("failed to send airtime: {}", send.error_message),
            ));
        }
        let recipient = send.responses.first().ok_or_else(|| {
            GatewayError::integration(
                INTEGRATION_NAME,
                "submit_data",
                "airtime API returned no recipient response",
            )
        })?;

        info!(currency = currency_code, "airtime sent");
        Ok(TransactionResult {
            success: true,
            message: Some("Airtime sent successfully".to_owned()),
            transaction_reference: recipient.request_id.clone(),
        })
    }

    async fn handle_webhook<'a>(&'a self, _payload: &'a WebhookPayload) -> Result<TransactionResult> {
        Err(GatewayError::NotImplemented {
            integration: INTEGRATION_NAME,
            operation: "handle_webhook",
        })
    }

    fn validate_webhook_payload(&self, _payload: &WebhookPayload) -> bool {
        false
    }
}
