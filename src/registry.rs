//! The integration registry.
//!
//! A static, read-only table mapping each [`IntegrationKey`] to its
//! descriptor: display name plus constructor. Built at compile time, safe
//! for unsynchronized concurrent reads, and enumerable in a stable order
//! for listings and webhook resolution.

use crate::{
    config::GatewayConfig,
    error::Result,
    integrations::{IntegrationHandler, IntegrationKey},
};

/// Descriptor for one registered integration.
#[derive(Debug, Clone, Copy)]
pub struct IntegrationDescriptor {
    /// Registry key.
    pub key: IntegrationKey,
    /// Display name.
    pub name: &'static str,
    construct: fn(&GatewayConfig) -> IntegrationHandler,
}

impl IntegrationDescriptor {
    /// Constructs a fresh handler instance bound to the given configuration.
    ///
    /// Instances are never pooled or cached; each logical operation gets
    /// its own.
    #[must_use]
    pub fn construct(&self, config: &GatewayConfig) -> IntegrationHandler {
        (self.construct)(config)
    }
}

/// All registered integrations, in enumeration order.
///
/// Order is part of the observable behavior: listings preserve it and
/// webhook resolution probes it front to back.
pub static REGISTRY: [IntegrationDescriptor; 2] = [
    IntegrationDescriptor {
        key: IntegrationKey::Airtime,
        name: crate::integrations::airtime::INTEGRATION_NAME,
        construct: construct_airtime,
    },
    IntegrationDescriptor {
        key: IntegrationKey::Giftcards,
        name: crate::integrations::giftcard::INTEGRATION_NAME,
        construct: construct_giftcards,
    },
];

fn construct_airtime(config: &GatewayConfig) -> IntegrationHandler {
    IntegrationHandler::construct(IntegrationKey::Airtime, config)
}

fn construct_giftcards(config: &GatewayConfig) -> IntegrationHandler {
    IntegrationHandler::construct(IntegrationKey::Giftcards, config)
}

/// Returns all registered descriptors in enumeration order.
#[must_use]
pub fn all() -> &'static [IntegrationDescriptor] {
    &REGISTRY
}

/// Looks up the descriptor for a key string.
///
/// # Errors
///
/// Returns [`GatewayError::NotFound`] carrying the offending key; no
/// integration instance is constructed in that case.
pub fn get(key: &str) -> Result<&'static IntegrationDescriptor> {
    let parsed: IntegrationKey = key.parse()?;
    Ok(get_by_key(parsed))
}

/// Looks up the descriptor for an already-parsed key.
#[must_use]
pub fn get_by_key(key: IntegrationKey) -> &'static IntegrationDescriptor {
    match key {
        IntegrationKey::Airtime => &REGISTRY[0],
        IntegrationKey::Giftcards => &REGISTRY[1],
    }
}
