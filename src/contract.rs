//! The integration contract.
//!
//! Every asset-monetization provider wired into the gateway implements
//! [`Integration`]: a four-operation capability set covering catalog
//! queries, submissions, and webhook handling. The trait is sealed; the set
//! of integrations is closed at compile time and extended by adding a
//! variant to [`IntegrationHandler`](crate::integrations::IntegrationHandler)
//! and a registry entry, not by external implementations.
//!
//! Instances are constructed fresh per logical operation with a shared
//! reference to the [`GatewayConfig`](crate::config::GatewayConfig);
//! construction must be cheap and synchronous, performing no network I/O.

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::{
    error::Result,
    models::{AssetDataPage, Pagination, QueryParams, SubmitPayload, TransactionResult, WebhookPayload},
};

pub(crate) mod sealed {
    /// Sealed trait marker.
    ///
    /// Keeps the integration set closed: new providers are added inside
    /// this crate, never implemented externally.
    pub trait Sealed {}
}

/// Capability set every integration must implement.
///
/// All I/O-bound operations are async and suspend the calling task without
/// blocking concurrent requests. The gateway adds no retries, timeouts, or
/// caching around these calls; failures surface unchanged to the caller.
pub trait Integration: sealed::Sealed + Send + Sync {
    /// Display name of this integration, used in listings and diagnostics.
    fn name(&self) -> &'static str;

    /// Returns a catalog page and the query parameters this integration
    /// recognizes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Integration`](crate::error::GatewayError::Integration)
    /// when the upstream source is unreachable or returns malformed data.
    fn get_asset_data<'a>(
        &'a self,
        pagination: Pagination,
        query_params: Option<&'a QueryParams>,
    ) -> impl Future<Output = Result<AssetDataPage>> + Send + 'a;

    /// Executes a purchase against the upstream provider.
    ///
    /// On error no partial success is visible to the caller; an `Err` and a
    /// `TransactionResult { success: false, .. }` are distinct outcomes.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Integration`](crate::error::GatewayError::Integration)
    /// when the upstream rejects the request or required data is missing.
    fn submit_data<'a>(
        &'a self,
        payload: &'a SubmitPayload,
    ) -> impl Future<Output = Result<TransactionResult>> + Send + 'a;

    /// Processes an inbound notification already known to belong to this
    /// integration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotImplemented`](crate::error::GatewayError::NotImplemented)
    /// for integrations without webhook support.
    fn handle_webhook<'a>(
        &'a self,
        payload: &'a WebhookPayload,
    ) -> impl Future<Output = Result<TransactionResult>> + Send + 'a;

    /// Pure predicate: does this payload belong to this integration?
    ///
    /// Must be side-effect free and must not fail for well-formed payloads
    /// that belong to another provider; it returns `false` for "not mine".
    fn validate_webhook_payload(&self, payload: &WebhookPayload) -> bool;
}
