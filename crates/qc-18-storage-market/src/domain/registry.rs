//! # Provider Registry
//!
//! Owns provider records keyed by principal. One record per principal;
//! a second registration is rejected, never merged or overwritten.

use super::entities::{Provider, ProviderView};
use super::value_objects::{BlockHeight, Principal};
use crate::errors::MarketError;
use std::collections::HashMap;

/// Registered storage providers.
#[derive(Debug, Default)]
pub struct ProviderRegistry {
    providers: HashMap<Principal, Provider>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `caller` as a provider.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if `caller` already has a record. The existing
    /// record is left untouched.
    pub fn register(
        &mut self,
        caller: Principal,
        price_per_gb: u64,
        available_space: u64,
        height: BlockHeight,
    ) -> Result<ProviderView, MarketError> {
        if self.providers.contains_key(&caller) {
            return Err(MarketError::AlreadyRegistered(caller));
        }
        let provider = Provider::new(caller, price_per_gb, available_space, height);
        let view = provider.view();
        self.providers.insert(caller, provider);
        Ok(view)
    }

    /// Snapshot of a provider, or `None` if unregistered.
    #[must_use]
    pub fn get(&self, principal: &Principal) -> Option<ProviderView> {
        self.providers.get(principal).map(Provider::view)
    }

    /// Returns true if `principal` is registered.
    #[must_use]
    pub fn contains(&self, principal: &Principal) -> bool {
        self.providers.contains_key(principal)
    }

    /// Borrow a provider record.
    pub(crate) fn record(&self, principal: &Principal) -> Option<&Provider> {
        self.providers.get(principal)
    }

    /// Mutable access for the capacity accountant.
    pub(crate) fn record_mut(&mut self, principal: &Principal) -> Option<&mut Provider> {
        self.providers.get_mut(principal)
    }

    /// Iterate over all provider records.
    pub fn iter(&self) -> impl Iterator<Item = &Provider> {
        self.providers.values()
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(byte: u8) -> Principal {
        Principal::new([byte; 20])
    }

    #[test]
    fn test_register_and_get() {
        let mut registry = ProviderRegistry::new();
        let view = registry.register(principal(1), 200, 1000, 3).unwrap();
        assert_eq!(view.available_space, 1000);

        let fetched = registry.get(&principal(1)).unwrap();
        assert_eq!(fetched, view);
        assert_eq!(fetched.price_per_gb, 200);
        assert_eq!(fetched.registered_at, 3);
    }

    #[test]
    fn test_unregistered_is_none() {
        let registry = ProviderRegistry::new();
        assert!(registry.get(&principal(9)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_double_registration_leaves_state_unchanged() {
        let mut registry = ProviderRegistry::new();
        registry.register(principal(1), 200, 1000, 1).unwrap();
        let before = registry.get(&principal(1));

        let err = registry.register(principal(1), 50, 5, 2).unwrap_err();
        assert_eq!(err, MarketError::AlreadyRegistered(principal(1)));
        assert_eq!(registry.get(&principal(1)), before);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_zero_capacity_registration_is_allowed() {
        let mut registry = ProviderRegistry::new();
        let view = registry.register(principal(4), 0, 0, 0).unwrap();
        assert_eq!(view.available_space, 0);
        assert!(registry.contains(&principal(4)));
    }
}
