//! Key-based integration dispatch.
//!
//! [`IntegrationMapper`] is the application-facing façade: it owns the
//! shared configuration, resolves keys through the
//! [`registry`](crate::registry), constructs a fresh handler per call, and
//! forwards the operation. It adds no error semantics beyond key
//! resolution: handler errors propagate unchanged, and nothing is cached
//! between calls.
//!
//! # Examples
//!
//! ```no_run
//! use asset_gateway::{config::GatewayConfig, mapper::IntegrationMapper, models::Pagination};
//!
//! # async fn example() -> asset_gateway::Result<()> {
//! let config = GatewayConfig::from_toml(
//!     r#"
//!     AIRTIME_RATES_API = "https://rates.example.com/live"
//!     "#,
//! )?;
//! let mapper = IntegrationMapper::new(config);
//!
//! let page = mapper.get_data("airtime", Pagination::new(1, 10), None).await?;
//! println!("{} assets", page.assets.len());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use tracing::instrument;

use crate::{
    config::GatewayConfig,
    contract::Integration,
    error::Result,
    integrations::IntegrationKey,
    models::{AssetDataPage, Pagination, QueryParams, SubmitPayload, TransactionResult, WebhookPayload},
    registry, webhook,
};

/// One entry in the integration listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IntegrationListing {
    /// Registry key.
    pub key: IntegrationKey,
    /// Display name.
    pub name: &'static str,
}

/// Stateless dispatch façade holding only the shared configuration.
#[derive(Debug, Clone)]
pub struct IntegrationMapper {
    config: GatewayConfig,
}

impl IntegrationMapper {
    /// Creates a mapper around the application's configuration.
    ///
    /// The configuration is threaded unchanged, by shared reference, into
    /// every handler construction.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self { config }
    }

    /// Returns the shared configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Fetches a catalog page from the integration named by `key`.
    ///
    /// Every call re-instantiates the handler and re-fetches; nothing is
    /// cached.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`](crate::error::GatewayError::NotFound)
    /// for unknown keys (no handler is constructed); handler errors
    /// propagate unchanged.
    #[instrument(skip(self, pagination, query_params), fields(integration = key))]
    pub async fn get_data(
        &self,
        key: &str,
        pagination: Pagination,
        query_params: Option<&QueryParams>,
    ) -> Result<AssetDataPage> {
        let descriptor = registry::get(key)?;
        let handler = descriptor.construct(&self.config);
        handler.get_asset_data(pagination, query_params).await
    }

    /// Submits a transaction to the integration named by `key`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotFound`](crate::error::GatewayError::NotFound)
    /// for unknown keys (no handler is constructed); handler errors
    /// propagate unchanged.
    #[instrument(skip(self, payload), fields(integration = key))]
    pub async fn submit_data(
        &self,
        key: &str,
        payload: &SubmitPayload,
    ) -> Result<TransactionResult> {
        let descriptor = registry::get(key)?;
        let handler = descriptor.construct(&self.config);
        handler.submit_data(payload).await
    }

    /// Lists all registered integrations in registry enumeration order.
    #[must_use]
    pub fn integrations(&self) -> Vec<IntegrationListing> {
        registry::all()
            .iter()
            .map(|descriptor| IntegrationListing { key: descriptor.key, name: descriptor.name })
            .collect()
    }

    /// Resolves and handles an inbound webhook by payload content.
    ///
    /// # Errors
    ///
    /// Returns
    /// [`GatewayError::WebhookNotMatched`](crate::error::GatewayError::WebhookNotMatched)
    /// when no integration recognizes the payload; the matched handler's
    /// errors propagate unchanged.
    pub async fn handle_webhook(&self, payload: &WebhookPayload) -> Result<TransactionResult> {
        webhook::handle_webhook(&self.config, payload).await
    }
}
