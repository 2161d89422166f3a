//! Gateway configuration.
//!
//! The configuration is a flat mapping of environment-style keys (provider
//! credentials, upstream base URLs) to opaque values. It is owned by the
//! application, built once at startup, and passed by shared reference into
//! every integration construction; integrations read it but cannot mutate
//! it.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{GatewayError, Result};

/// Flat, opaque configuration map.
///
/// # Examples
///
/// ```
/// use asset_gateway::config::GatewayConfig;
///
/// let config = GatewayConfig::from_toml(
///     r#"
///     AIRTIME_USERNAME = "sandbox"
///     AIRTIME_API_KEY = "atsk_test"
///     AIRTIME_RATES_API = "https://rates.example.com/live"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.get_str("AIRTIME_USERNAME"), Some("sandbox"));
/// assert!(config.get("MISSING").is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct GatewayConfig {
    values: BTreeMap<String, Value>,
}

impl GatewayConfig {
    /// Creates an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses configuration from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Config`] if the document is not valid TOML
    /// or is not a flat table.
    pub fn from_toml(document: &str) -> Result<Self> {
        toml::from_str(document).map_err(|e| GatewayError::Config(e.to_string()))
    }

    /// Sets a value, returning `self` for chaining.
    ///
    /// Only available while the application still owns the configuration
    /// exclusively; once shared with the gateway it is read-only.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns the raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Returns the value for a key as a string slice.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Returns the number of configured keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no keys are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all key/value pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
