//! Error types for the asset gateway.
//!
//! This module defines all error kinds that can surface from dispatch,
//! webhook resolution, and integration calls. All errors implement the
//! standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Lookup errors** ([`GatewayError::NotFound`], [`GatewayError::WebhookNotMatched`]):
//!   no registered integration matches a key or payload; recoverable by the
//!   caller (typically mapped to a 404-equivalent).
//! - **Integration errors** ([`GatewayError::Integration`]): an upstream
//!   provider failed; carries the integration and operation names for
//!   correlation. Never retried by the gateway.
//! - **Capability gaps** ([`GatewayError::NotImplemented`]): the integration
//!   does not support the requested operation; permanent, not transient.
//! - **Transport errors** ([`GatewayError::Http`], [`GatewayError::InvalidUrl`],
//!   [`GatewayError::InvalidResponse`]): HTTP collaborator failures.

use thiserror::Error;

/// Result type alias for gateway operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur in the asset gateway.
///
/// The gateway performs no local recovery: every error from an integration
/// or from registry lookup is surfaced unchanged to the caller. An error is
/// never converted into a partially-successful
/// [`TransactionResult`](crate::models::TransactionResult); a returned error
/// and an explicit `success: false` result are distinct outcomes.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No integration is registered under the given key.
    ///
    /// Carries the offending key so callers can log and correlate. The
    /// gateway guarantees that no integration instance was constructed
    /// when this error is returned.
    #[error("integration {0} not found")]
    NotFound(String),

    /// No registered integration recognizes a webhook payload.
    ///
    /// Returned after every registered integration's
    /// [`validate_webhook_payload`](crate::contract::Integration::validate_webhook_payload)
    /// declined the payload. Like [`NotFound`](Self::NotFound) this is
    /// recoverable by the caller; see [`GatewayError::is_not_found`].
    #[error("no integration recognizes the webhook payload")]
    WebhookNotMatched,

    /// An integration-specific failure.
    ///
    /// Raised when an upstream source is unreachable, rejects a request, or
    /// returns data the integration cannot use (e.g., a missing exchange
    /// rate). Carries the failing integration's display name and the
    /// operation name for diagnostics, plus the underlying cause when one
    /// exists.
    #[error("{integration}.{operation}: {message}")]
    Integration {
        /// Display name of the failing integration.
        integration: &'static str,
        /// Name of the operation that failed.
        operation: &'static str,
        /// Human-readable failure description.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The integration declares but does not support an operation.
    ///
    /// A permanent capability gap, not a transient failure. For example, an
    /// integration without webhook support returns this from
    /// [`handle_webhook`](crate::contract::Integration::handle_webhook).
    #[error("{integration} does not support {operation}")]
    NotImplemented {
        /// Display name of the integration.
        integration: &'static str,
        /// Name of the unsupported operation.
        operation: &'static str,
    },

    /// A returned value violates the integration contract.
    ///
    /// For example, a RANGE price with `min > max`, or a SELECT field
    /// without options. Flagged instead of silently accepted.
    #[error("contract violation: {0}")]
    Contract(String),

    /// The gateway configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A request URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// An HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, connection refusals, DNS and TLS
    /// failures. The gateway does not retry; callers decide.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An upstream response body could not be decoded.
    #[error("invalid response payload: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Creates an integration error without an underlying cause.
    pub fn integration(
        integration: &'static str,
        operation: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::Integration { integration, operation, message: message.into(), source: None }
    }

    /// Creates an integration error wrapping an underlying cause.
    pub fn integration_with_source(
        integration: &'static str,
        operation: &'static str,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Integration {
            integration,
            operation,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns true for the "nothing matched" error class.
    ///
    /// Covers both an unknown integration key and an unmatched webhook
    /// payload; callers typically map this class to a 404-equivalent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::WebhookNotMatched)
    }
}
