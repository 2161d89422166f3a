//! Data model shared by all integrations.
//!
//! This module defines the structures exchanged between the application,
//! the dispatcher, and integration implementations: catalog entries, form
//! fields, submission payloads, and transaction results. Wire names are
//! camelCase to match the JSON shapes consumed by the application layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GatewayError, Result};

/// Free-form query parameters passed through to integrations.
///
/// The gateway does not validate their shape; each integration advertises
/// the parameters it understands via
/// [`AssetDataPage::supported_query_params`].
pub type QueryParams = Map<String, Value>;

/// An inbound webhook body, already parsed to a JSON object.
pub type WebhookPayload = Map<String, Value>;

/// Caller-supplied pagination options.
///
/// The gateway enforces no defaults or clamping; integrations decide how
/// (and whether) to apply these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number to retrieve, starting at 1.
    pub page: u32,
    /// Number of items per page.
    pub limit: u32,
}

impl Pagination {
    /// Creates pagination options.
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

/// Form field input types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldInputType {
    /// Single-line text input.
    Text,
    /// Numeric input.
    Number,
    /// Dropdown selection; requires options.
    Select,
    /// Checkbox.
    Checkbox,
    /// Radio group; requires options.
    Radio,
    /// Multi-line text input.
    Textarea,
    /// Date picker.
    Date,
    /// Time picker.
    Time,
    /// Combined date and time picker.
    Datetime,
    /// Phone number input.
    Phone,
}

impl FieldInputType {
    /// Returns true if this input type requires a non-empty options list.
    #[must_use]
    pub fn requires_options(self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

/// A form field an integration needs filled in before submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    /// Field label shown to the user.
    pub name: String,
    /// Input type.
    #[serde(rename = "type")]
    pub input_type: FieldInputType,
    /// Identifier, unique within the field list.
    pub key: String,
    /// Options for SELECT and RADIO fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Whether the field must be completed before submitting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// Asset price, denominated as a single value or a range.
///
/// Serializes to the `priceDenominationType` / `price` pair:
///
/// ```json
/// { "priceDenominationType": "FIXED", "price": 25 }
/// { "priceDenominationType": "RANGE", "price": { "min": 5, "max": 500 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "priceDenominationType", content = "price")]
pub enum AssetPrice {
    /// A single fixed price.
    #[serde(rename = "FIXED")]
    Fixed(Decimal),
    /// An inclusive price range; `min` must not exceed `max`.
    #[serde(rename = "RANGE")]
    Range {
        /// Lower bound.
        min: Decimal,
        /// Upper bound.
        max: Decimal,
    },
}

impl AssetPrice {
    /// Creates a range price, checking the bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Contract`] if `min > max`.
    pub fn range(min: Decimal, max: Decimal) -> Result<Self> {
        if min > max {
            return Err(GatewayError::Contract(format!(
                "RANGE price has min {min} > max {max}"
            )));
        }
        Ok(Self::Range { min, max })
    }

    /// Validates the price invariant.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Contract`] if a range price has `min > max`.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Fixed(_) => Ok(()),
            Self::Range { min, max } if min <= max => Ok(()),
            Self::Range { min, max } => Err(GatewayError::Contract(format!(
                "RANGE price has min {min} > max {max}"
            ))),
        }
    }
}

/// One entry in an integration's catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDescriptor {
    /// Asset name.
    pub name: String,
    /// Asset description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Image URL representing the asset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Asset price.
    #[serde(flatten)]
    pub price: AssetPrice,
    /// Additional form fields required for submission.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FormField>>,
    /// Opaque data to echo back through [`SubmitPayload`].
    pub data: Map<String, Value>,
}

impl AssetDescriptor {
    /// Validates the descriptor against the integration contract.
    ///
    /// Checks the price invariant, that SELECT/RADIO fields carry non-empty
    /// options, and that field keys are unique within the list.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Contract`] describing the first violation.
    pub fn validate(&self) -> Result<()> {
        self.price.validate()?;
        if let Some(fields) = &self.fields {
            let mut seen = std::collections::HashSet::new();
            for field in fields {
                if !seen.insert(field.key.as_str()) {
                    return Err(GatewayError::Contract(format!(
                        "duplicate field key {} in asset {}",
                        field.key, self.name
                    )));
                }
                if field.input_type.requires_options()
                    && field.options.as_ref().is_none_or(Vec::is_empty)
                {
                    return Err(GatewayError::Contract(format!(
                        "field {} in asset {} requires non-empty options",
                        field.key, self.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Result of a catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDataPage {
    /// Catalog entries for the requested page.
    #[serde(rename = "data")]
    pub assets: Vec<AssetDescriptor>,
    /// Query parameters the integration recognizes, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supported_query_params: Option<QueryParams>,
}

/// Payload for a submission.
///
/// Beyond the mandatory `amount`, the gateway treats the payload as opaque;
/// integration-specific fields are carried in `values`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitPayload {
    /// Amount of the asset to purchase, in USD.
    pub amount: Decimal,
    /// Integration-specific fields.
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl SubmitPayload {
    /// Creates a payload with no integration-specific fields.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self { amount, values: Map::new() }
    }

    /// Adds an integration-specific field.
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Returns an integration-specific string field, if present.
    #[must_use]
    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}

/// Result of a submission or webhook handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Optional message from the integration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Provider transaction reference for correlation.
    ///
    /// Always present, even on failure; may be empty but never absent.
    pub transaction_reference: String,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn fixed_asset() -> AssetDescriptor {
        AssetDescriptor {
            name: "Amazon Gift Card".to_owned(),
            description: Some("US storefront".to_owned()),
            image: None,
            price: AssetPrice::Fixed(Decimal::from(25)),
            fields: None,
            data: Map::new(),
        }
    }

    #[test]
    fn test_fixed_price_wire_shape() {
        let value = serde_json::to_value(fixed_asset()).unwrap();
        assert_eq!(value["priceDenominationType"], "FIXED");
        assert_eq!(value["price"], json!(25.0));
    }

    #[test]
    fn test_range_price_wire_shape() {
        let mut asset = fixed_asset();
        asset.price = AssetPrice::range(Decimal::from(5), Decimal::from(500)).unwrap();
        let value = serde_json::to_value(asset).unwrap();
        assert_eq!(value["priceDenominationType"], "RANGE");
        assert_eq!(value["price"]["min"], json!(5.0));
        assert_eq!(value["price"]["max"], json!(500.0));
    }

    #[test]
    fn test_price_roundtrip_through_flatten() {
        let asset = fixed_asset();
        let value = serde_json::to_value(&asset).unwrap();
        let back: AssetDescriptor = serde_json::from_value(value).unwrap();
        assert_eq!(back, asset);
    }

    #[test]
    fn test_range_price_rejects_inverted_bounds() {
        let result = AssetPrice::range(Decimal::from(10), Decimal::from(5));
        assert!(matches!(result, Err(GatewayError::Contract(_))));
    }

    #[test]
    fn test_validate_flags_inverted_range() {
        let price = AssetPrice::Range { min: Decimal::from(10), max: Decimal::from(5) };
        assert!(price.validate().is_err());
    }

    #[test]
    fn test_select_field_requires_options() {
        let mut asset = fixed_asset();
        asset.fields = Some(vec![FormField {
            name: "Denomination".to_owned(),
            input_type: FieldInputType::Select,
            key: "denomination".to_owned(),
            options: None,
            required: Some(true),
        }]);
        assert!(asset.validate().is_err());
    }

    #[test]
    fn test_select_field_with_options_is_valid() {
        let mut asset = fixed_asset();
        asset.fields = Some(vec![FormField {
            name: "Denomination".to_owned(),
            input_type: FieldInputType::Select,
            key: "denomination".to_owned(),
            options: Some(vec!["25".to_owned(), "50".to_owned()]),
            required: Some(true),
        }]);
        assert!(asset.validate().is_ok());
    }

    #[test]
    fn test_duplicate_field_keys_rejected() {
        let mut asset = fixed_asset();
        let field = FormField {
            name: "Email".to_owned(),
            input_type: FieldInputType::Text,
            key: "recipientEmail".to_owned(),
            options: None,
            required: None,
        };
        asset.fields = Some(vec![field.clone(), field]);
        assert!(asset.validate().is_err());
    }

    #[test]
    fn test_field_input_type_wire_names() {
        assert_eq!(serde_json::to_value(FieldInputType::Textarea).unwrap(), "TEXTAREA");
        assert_eq!(serde_json::to_value(FieldInputType::Datetime).unwrap(), "DATETIME");
        assert_eq!(serde_json::to_value(FieldInputType::Phone).unwrap(), "PHONE");
    }

    #[test]
    fn test_submit_payload_flattens_values() {
        let payload = SubmitPayload::new(Decimal::from(10))
            .with_value("currencyCode", "KES")
            .with_value("phoneNumber", "+254700000000");
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["amount"], json!(10.0));
        assert_eq!(value["currencyCode"], "KES");
        assert_eq!(payload.str_value("phoneNumber"), Some("+254700000000"));
        assert_eq!(payload.str_value("missing"), None);
    }

    #[test]
    fn test_submit_payload_deserializes_extra_fields() {
        let payload: SubmitPayload =
            serde_json::from_value(json!({ "amount": 5, "cardId": "card-1" })).unwrap();
        assert_eq!(payload.amount, Decimal::from(5));
        assert_eq!(payload.str_value("cardId"), Some("card-1"));
    }

    #[test]
    fn test_transaction_reference_always_serialized() {
        let result = TransactionResult {
            success: false,
            message: None,
            transaction_reference: String::new(),
        };
        let value = serde_json::to_value(result).unwrap();
        assert_eq!(value["transactionReference"], "");
        assert!(value.get("message").is_none());
    }

    #[test]
    fn test_asset_data_page_wire_shape() {
        let page = AssetDataPage {
            assets: vec![fixed_asset()],
            supported_query_params: Some(Map::from_iter([(
                "country".to_owned(),
                json!(["NGN", "KES"]),
            )])),
        };
        let value = serde_json::to_value(page).unwrap();
        assert!(value["data"].is_array());
        assert_eq!(value["supportedQueryParams"]["country"][0], "NGN");
    }
}
