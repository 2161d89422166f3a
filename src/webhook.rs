//! Content-based webhook resolution.
//!
//! Inbound provider callbacks arrive without an integration key, so the
//! payload itself decides the handler: every registered integration is
//! constructed and asked whether it recognizes the payload shape. The scan
//! keeps a single running match and overwrites it on every accepting
//! integration, so the **last** accepting integration in registry order
//! wins. That tie-break is preserved observed behavior, pinned by tests;
//! switching to first-match would be a one-line change in [`last_match`].

use tracing::{debug, instrument, warn};

use crate::{
    config::GatewayConfig,
    contract::Integration,
    error::{GatewayError, Result},
    integrations::IntegrationHandler,
    models::{TransactionResult, WebhookPayload},
    registry,
};

/// Scans handlers in order, keeping the last one whose predicate accepts.
///
/// No short-circuiting: every handler's predicate is evaluated exactly
/// once, an O(P) probe over P handlers.
fn last_match<P, I>(handlers: I, payload: &WebhookPayload) -> Option<P>
where
    P: Integration,
    I: IntoIterator<Item = P>,
{
    let mut matched = None;
    for handler in handlers {
        if handler.validate_webhook_payload(payload) {
            matched = Some(handler);
        }
    }
    matched
}

/// Finds the integration that recognizes a webhook payload.
///
/// Constructs a fresh instance of every registered integration and probes
/// each predicate; returns `None` when nothing matches.
#[must_use]
pub fn resolve(config: &GatewayConfig, payload: &WebhookPayload) -> Option<IntegrationHandler> {
    let handlers = registry::all().iter().map(|descriptor| descriptor.construct(config));
    let matched = last_match(handlers, payload);
    match &matched {
        Some(handler) => debug!(integration = handler.name(), "webhook payload matched"),
        None => warn!("webhook payload matched no integration"),
    }
    matched
}

/// Resolves and handles an inbound webhook.
///
/// # Errors
///
/// Returns [`GatewayError::WebhookNotMatched`] when no registered
/// integration recognizes the payload; in that case no integration's
/// `handle_webhook` is invoked. The matched integration's own errors
/// propagate unchanged.
#[instrument(skip_all)]
pub async fn handle_webhook(
    config: &GatewayConfig,
    payload: &WebhookPayload,
) -> Result<TransactionResult> {
    let handler = resolve(config, payload).ok_or(GatewayError::WebhookNotMatched)?;
    handler.handle_webhook(payload).await
}
