//! Concrete integration implementations.
//!
//! The set of integrations is closed at compile time: each provider is a
//! variant of [`IntegrationHandler`], selected through the
//! [`registry`](crate::registry). Adding a provider means adding a module
//! here, a handler variant, and a registry entry.

pub mod airtime;
pub mod giftcard;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    config::GatewayConfig,
    contract::{Integration, sealed},
    error::{GatewayError, Result},
    models::{AssetDataPage, Pagination, QueryParams, SubmitPayload, TransactionResult, WebhookPayload},
};

pub use airtime::AirtimeIntegration;
pub use giftcard::GiftCardIntegration;

/// Key naming a registered integration.
///
/// Opaque, finite, and statically known; unique within the registry and
/// immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationKey {
    /// Airtime top-up.
    Airtime,
    /// Gift cards.
    Giftcards,
}

impl IntegrationKey {
    /// Returns the registry key string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Airtime => "airtime",
            Self::Giftcards => "giftcards",
        }
    }
}

impl fmt::Display for IntegrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntegrationKey {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "airtime" => Ok(Self::Airtime),
            "giftcards" => Ok(Self::Giftcards),
            other => Err(GatewayError::NotFound(other.to_owned())),
        }
    }
}

/// A constructed integration instance, one variant per provider.
///
/// Dispatch is a tagged union over the closed integration set, so no trait
/// objects or runtime reflection are involved; every call resolves to a
/// concrete implementation at the `match`.
#[derive(Debug, Clone)]
pub enum IntegrationHandler {
    /// Airtime top-up handler.
    Airtime(AirtimeIntegration),
    /// Gift-card handler.
    Giftcards(GiftCardIntegration),
}

impl IntegrationHandler {
    /// Constructs the handler for a key, bound to the given configuration.
    ///
    /// Cheap and synchronous; performs no I/O.
    #[must_use]
    pub fn construct(key: IntegrationKey, config: &GatewayConfig) -> Self {
        match key {
            IntegrationKey::Airtime => Self::Airtime(AirtimeIntegration::new(config)),
            IntegrationKey::Giftcards => Self::Giftcards(GiftCardIntegration::new(config)),
        }
    }

    /// Returns the key this handler was constructed for.
    #[must_use]
    pub fn key(&self) -> IntegrationKey {
        match self {
            Self::Airtime(_) => IntegrationKey::Airtime,
            Self::Giftcards(_) => IntegrationKey::Giftcards,
        }
    }
}

impl sealed::Sealed for IntegrationHandler {}

impl Integration for IntegrationHandler {
    fn name(&self) -> &'static str {
        match self {
            Self::Airtime(handler) => handler.name(),
            Self::Giftcards(handler) => handler.name(),
        }
    }

    async fn get_asset_data<'a>(
        &'a self,
        pagination: Pagination,
        query_params: Option<&'a QueryParams>,
    ) -> Result<AssetDataPage> {
        match self {
            Self::Airtime(handler) => handler.get_asset_data(pagination, query_params).await,
            Self::Giftcards(handler) => handler.get_asset_data(pagination, query_params).await,
        }
    }

    async fn submit_data<'a>(&'a self, payload: &'a SubmitPayload) -> Result<TransactionResult> {
        match self {
            Self::Airtime(handler) => handler.submit_data(payload).await,
            Self::Giftcards(handler) => handler.submit_data(payload).await,
        }
    }

    async fn handle_webhook<'a>(&'a self, payload: &'a WebhookPayload) -> Result<TransactionResult> {
        match self {
            Self::Airtime(handler) => handler.handle_webhook(payload).await,
            Self::Giftcards(handler) => handler.handle_webhook(payload).await,
        }
    }

    fn validate_webhook_payload(&self, payload: &WebhookPayload) -> bool {
        match self {
            Self::Airtime(handler) => handler.validate_webhook_payload(payload),
            Self::Giftcards(handler) => handler.validate_webhook_payload(payload),
        }
    }
}
