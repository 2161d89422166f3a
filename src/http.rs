//! Generic HTTP collaborator used by integrations.
//!
//! A thin pass-through over [`reqwest`]: integrations describe a request
//! with [`RequestConfig`] and get back the raw status and body. The gateway
//! core never calls this module directly. Timeout policy lives here, in the
//! shared client, not in the dispatch core.

use std::{sync::LazyLock, time::Duration};

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::{
    error::{GatewayError, Result},
    models::QueryParams,
};

/// Shared HTTP client with connection pooling enabled.
///
/// Using a singleton avoids recreating the client per integration instance,
/// preserving connection pooling across the construct-per-call lifecycle.
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .pool_max_idle_per_host(16)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create shared HTTP client")
});

/// Declarative description of one HTTP request.
#[derive(Debug, Clone)]
pub struct RequestConfig<'a> {
    /// HTTP method.
    pub method: Method,
    /// Request URL, absolute or relative to `base_url`.
    pub url: &'a str,
    /// Optional base URL the `url` is resolved against.
    pub base_url: Option<&'a str>,
    /// Additional request headers.
    pub headers: Vec<(&'a str, &'a str)>,
    /// Query parameters appended to the URL.
    pub query: Option<&'a QueryParams>,
    /// JSON request body.
    pub payload: Option<Value>,
}

impl<'a> RequestConfig<'a> {
    /// Creates a request description for the given method and URL.
    #[must_use]
    pub fn new(method: Method, url: &'a str) -> Self {
        Self { method, url, base_url: None, headers: Vec::new(), query: None, payload: None }
    }

    /// Creates a GET request description.
    #[must_use]
    pub fn get(url: &'a str) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST request description.
    #[must_use]
    pub fn post(url: &'a str) -> Self {
        Self::new(Method::POST, url)
    }

    /// Resolves `url` against the given base.
    #[must_use]
    pub fn with_base_url(mut self, base_url: &'a str) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: &'a str, value: &'a str) -> Self {
        self.headers.push((name, value));
        self
    }

    /// Appends query parameters to the URL.
    #[must_use]
    pub fn with_query(mut self, query: &'a QueryParams) -> Self {
        self.query = Some(query);
        self
    }

    /// Sets a JSON request body.
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Raw response from an HTTP request.
#[derive(Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Returns true for 2xx status codes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidResponse`] if the body is not valid
    /// JSON for the target type.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
    }
}

/// Resolves a request URL, honoring an optional base.
///
/// Unlike [`Url::join`], a relative path never discards the base's own path
/// segments; `https://host/api` + `/cards` resolves to
/// `https://host/api/cards`.
fn resolve_url(base_url: Option<&str>, url: &str) -> Result<Url> {
    let full = match base_url {
        Some(base) => format!("{}/{}", base.trim_end_matches('/'), url.trim_start_matches('/')),
        None => url.to_owned(),
    };
    Url::parse(&full).map_err(|e| GatewayError::InvalidUrl(format!("{full}: {e}")))
}

/// Stringifies a query value for URL encoding.
///
/// Strings pass through unquoted; everything else is JSON-encoded.
fn query_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// HTTP service wrapping the shared pooled client.
#[derive(Debug, Clone, Default)]
pub struct HttpService {
    client: Option<Client>,
}

impl HttpService {
    /// Creates a service backed by the shared pooled client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service backed by a custom client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client: Some(client) }
    }

    fn client(&self) -> &Client {
        self.client.as_ref().unwrap_or(&SHARED_CLIENT)
    }

    /// Executes a request described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] for unparseable URLs and
    /// [`GatewayError::Http`] for network failures. Non-2xx statuses are
    /// not errors; callers inspect [`HttpResponse::status`].
    pub async fn request(&self, config: RequestConfig<'_>) -> Result<HttpResponse> {
        let mut url = resolve_url(config.base_url, config.url)?;
        if let Some(query) = config.query {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, &query_value(value));
            }
        }

        let mut request = self.client().request(config.method, url);
        for (name, value) in &config.headers {
            request = request.header(*name, *value);
        }
        if let Some(payload) = &config.payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(HttpResponse { status, body })
    }

    /// Executes a GET request against `base_url` + `url`.
    ///
    /// # Errors
    ///
    /// See [`HttpService::request`].
    pub async fn get(&self, config: RequestConfig<'_>) -> Result<HttpResponse> {
        self.request(RequestConfig { method: Method::GET, ..config }).await
    }

    /// Executes a POST request against `base_url` + `url`.
    ///
    /// # Errors
    ///
    /// See [`HttpService::request`].
    pub async fn post(&self, config: RequestConfig<'_>) -> Result<HttpResponse> {
        self.request(RequestConfig { method: Method::POST, ..config }).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_resolve_url_absolute() {
        let url = resolve_url(None, "https://rates.example.com/live").unwrap();
        assert_eq!(url.as_str(), "https://rates.example.com/live");
    }

    #[test]
    fn test_resolve_url_with_base() {
        let url = resolve_url(Some("https://api.example.com"), "/cards").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/cards");
    }

    #[test]
    fn test_resolve_url_preserves_base_path() {
        let url = resolve_url(Some("https://api.example.com/v1/"), "cards").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/cards");
    }

    #[test]
    fn test_resolve_url_invalid() {
        let result = resolve_url(None, "not a url");
        assert!(matches!(result, Err(GatewayError::InvalidUrl(_))));
    }

    #[test]
    fn test_query_value_string_passthrough() {
        assert_eq!(query_value(&json!("KES")), "KES");
    }

    #[test]
    fn test_query_value_non_string_json_encoded() {
        assert_eq!(query_value(&json!(10)), "10");
        assert_eq!(query_value(&json!(["a", "b"])), r#"["a","b"]"#);
    }

    #[test]
    fn test_request_config_builder() {
        let query = QueryParams::new();
        let config = RequestConfig::post("/orders")
            .with_base_url("https://api.example.com")
            .with_header("X-Api-Key", "secret")
            .with_query(&query)
            .with_payload(json!({ "amount": 5 }));

        assert_eq!(config.method, Method::POST);
        assert_eq!(config.base_url, Some("https://api.example.com"));
        assert_eq!(config.headers, vec![("X-Api-Key", "secret")]);
        assert!(config.payload.is_some());
    }

    #[test]
    fn test_http_response_success_classification() {
        let ok = HttpResponse { status: 204, body: vec![] };
        let not_found = HttpResponse { status: 404, body: vec![] };
        assert!(ok.is_success());
        assert!(!not_found.is_success());
    }

    #[test]
    fn test_http_response_json_decode() {
        let response = HttpResponse { status: 200, body: br#"{"quotes":{}}"#.to_vec() };
        let value: Value = response.json().unwrap();
        assert!(value["quotes"].is_object());

        let garbage = HttpResponse { status: 200, body: b"<html>".to_vec() };
        let result: Result<Value> = garbage.json();
        assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
    }
}
