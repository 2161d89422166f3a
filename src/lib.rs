//! Pluggable integration gateway for asset-monetization providers.
//!
//! This crate defines a uniform contract that third-party providers
//! (airtime top-up, gift cards, future providers) implement, and a dispatch
//! layer that routes application requests to the right provider by key —
//! or, for inbound webhooks, by content-based matching against every
//! registered provider.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐
//! │  Application / API   │
//! └─────────┬────────────┘
//!           │ get_data / submit_data / handle_webhook / integrations
//! ┌─────────▼────────────────────────────────────────┐
//! │          asset-gateway (this crate)              │
//! │  ┌───────────────────┐   ┌────────────────────┐  │
//! │  │ IntegrationMapper │   │  Webhook resolver  │  │
//! │  │  (dispatch by key)│   │ (match by payload) │  │
//! │  └─────────┬─────────┘   └─────────┬──────────┘  │
//! │            │      registry         │             │
//! │  ┌─────────▼─────────────────────▼───────────┐   │
//! │  │   Integration contract (closed set)       │   │
//! │  │   Airtime        Giftcards        ...     │   │
//! │  └─────────┬─────────────────┬───────────────┘   │
//! └────────────┼─────────────────┼───────────────────┘
//!              │ HTTPS           │ HTTPS
//!    ┌─────────▼──────┐  ┌───────▼────────┐
//!    │ Airtime / rate │  │ Gift-card      │
//!    │ upstreams      │  │ upstream       │
//!    └────────────────┘  └────────────────┘
//! ```
//!
//! # Design
//!
//! - **Closed provider set**: providers are statically known at build time.
//!   Dispatch is a tagged union
//!   ([`IntegrationHandler`](integrations::IntegrationHandler)) selected
//!   through a static registry; no runtime reflection or plugin loading.
//! - **Construct per call**: every operation builds a fresh provider
//!   instance bound to the shared, read-only
//!   [`GatewayConfig`](config::GatewayConfig). No pooling, no caching, no
//!   cross-request state.
//! - **No local recovery**: provider failures surface unchanged to the
//!   caller; the gateway adds no retries, rate limiting, or circuit
//!   breaking. An error and a `success: false` result are distinct
//!   outcomes.
//!
//! # Quick Start
//!
//! ```no_run
//! use asset_gateway::{IntegrationMapper, config::GatewayConfig, models::Pagination};
//!
//! # async fn example() -> asset_gateway::Result<()> {
//! let config = GatewayConfig::from_toml(
//!     r#"
//!     AIRTIME_USERNAME = "sandbox"
//!     AIRTIME_API_KEY = "atsk_live"
//!     AIRTIME_RATES_API = "https://rates.example.com/live"
//!     GIFTCARD_API_URL = "https://cards.example.com"
//!     GIFTCARD_API_KEY = "gc_live"
//!     "#,
//! )?;
//! let mapper = IntegrationMapper::new(config);
//!
//! // Catalog query, dispatched by key.
//! let page = mapper.get_data("airtime", Pagination::new(1, 10), None).await?;
//! for asset in &page.assets {
//!     println!("{}", asset.name);
//! }
//!
//! // Inbound webhook, dispatched by payload content.
//! let payload = serde_json::from_str(
//!     r#"{ "event": "giftcard.order.completed", "data": { "orderId": "ord-1" } }"#,
//! )
//! .unwrap();
//! let result = mapper.handle_webhook(&payload).await?;
//! println!("{} -> {}", result.transaction_reference, result.success);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T, GatewayError>`](error::Result).
//! Lookup misses ([`GatewayError::NotFound`](error::GatewayError::NotFound),
//! [`GatewayError::WebhookNotMatched`](error::GatewayError::WebhookNotMatched))
//! are recoverable and typically map to a 404; provider failures carry the
//! integration and operation names for correlation.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod contract;
pub mod error;
pub mod http;
pub mod integrations;
pub mod mapper;
pub mod models;
pub mod registry;
pub mod webhook;

pub use config::GatewayConfig;
pub use contract::Integration;
pub use error::{GatewayError, Result};
pub use integrations::{IntegrationHandler, IntegrationKey};
pub use mapper::{IntegrationListing, IntegrationMapper};
