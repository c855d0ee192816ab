//! # Market State
//!
//! The explicit store for the marketplace: provider registry plus request
//! ledger, owned together so that each operation is one transaction over
//! both. The service holds exactly one `MarketState` behind its lock.

use super::accountant::{CapacityAccountant, TransitionOutcome};
use super::entities::{ProviderView, RequestView};
use super::invariants::{check_all_invariants, InvariantViolation};
use super::ledger::RequestLedger;
use super::registry::ProviderRegistry;
use super::value_objects::{BlockHeight, Principal, RequestId};
use crate::errors::MarketError;

/// Provider registry and request ledger.
#[derive(Debug, Default)]
pub struct MarketState {
    registry: ProviderRegistry,
    ledger: RequestLedger,
}

impl MarketState {
    /// Creates an empty market accepting requests up to
    /// `max_request_size_gb`.
    #[must_use]
    pub fn new(max_request_size_gb: u64) -> Self {
        Self {
            registry: ProviderRegistry::new(),
            ledger: RequestLedger::new(max_request_size_gb),
        }
    }

    /// `register-provider`
    pub fn register_provider(
        &mut self,
        caller: Principal,
        price_per_gb: u64,
        available_space: u64,
        height: BlockHeight,
    ) -> Result<ProviderView, MarketError> {
        self.registry
            .register(caller, price_per_gb, available_space, height)
    }

    /// `get-provider-details`
    #[must_use]
    pub fn provider(&self, principal: &Principal) -> Option<ProviderView> {
        self.registry.get(principal)
    }

    /// `request-storage`
    pub fn request_storage(
        &mut self,
        client: Principal,
        provider: Principal,
        size_gb: u64,
        height: BlockHeight,
    ) -> Result<RequestView, MarketError> {
        let id = self
            .ledger
            .create_request(&self.registry, client, provider, size_gb, height)?;
        self.ledger.get(id).ok_or(MarketError::RequestNotFound(id))
    }

    /// `get-request`
    #[must_use]
    pub fn request(&self, id: RequestId) -> Option<RequestView> {
        self.ledger.get(id)
    }

    /// `accept-request`
    pub fn accept_request(
        &mut self,
        caller: &Principal,
        id: RequestId,
        height: BlockHeight,
    ) -> Result<TransitionOutcome, MarketError> {
        self.accountant().accept(caller, id, height)
    }

    /// `reject-request`
    pub fn reject_request(
        &mut self,
        caller: &Principal,
        id: RequestId,
        height: BlockHeight,
    ) -> Result<TransitionOutcome, MarketError> {
        self.accountant().reject(caller, id, height)
    }

    /// `release-request`
    pub fn release_request(
        &mut self,
        caller: &Principal,
        id: RequestId,
        height: BlockHeight,
    ) -> Result<TransitionOutcome, MarketError> {
        self.accountant().release(caller, id, height)
    }

    /// Rejects Pending requests older than `ttl` blocks.
    pub fn expire_pending(&mut self, now: BlockHeight, ttl: u64) -> Vec<RequestView> {
        self.accountant().expire_pending(now, ttl)
    }

    /// Requests addressed to `provider`.
    #[must_use]
    pub fn requests_for_provider(&self, provider: &Principal) -> Vec<RequestView> {
        self.ledger.requests_for_provider(provider)
    }

    /// Requests made by `client`.
    #[must_use]
    pub fn requests_for_client(&self, client: &Principal) -> Vec<RequestView> {
        self.ledger.requests_for_client(client)
    }

    /// Number of registered providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of requests ever created.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.ledger.len()
    }

    /// Runs every capacity invariant check.
    #[must_use]
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        check_all_invariants(&self.registry, &self.ledger)
    }

    fn accountant(&mut self) -> CapacityAccountant<'_> {
        CapacityAccountant::new(&mut self.registry, &mut self.ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RequestStatus;

    const PROVIDER: Principal = Principal::new([1; 20]);
    const CLIENT: Principal = Principal::new([2; 20]);

    #[test]
    fn test_end_to_end() {
        let mut state = MarketState::default();
        state.register_provider(PROVIDER, 200, 1000, 1).unwrap();
        assert_eq!(state.provider(&PROVIDER).unwrap().available_space, 1000);

        let request = state.request_storage(CLIENT, PROVIDER, 100, 2).unwrap();
        assert_eq!(request.id, RequestId(0));

        state.accept_request(&PROVIDER, request.id, 3).unwrap();
        assert_eq!(state.provider(&PROVIDER).unwrap().available_space, 900);
        assert_eq!(state.request(request.id).unwrap().status, RequestStatus::Accepted);
        assert!(state.check_invariants().is_empty());
    }

    #[test]
    fn test_counts_and_indices() {
        let mut state = MarketState::new(50);
        state.register_provider(PROVIDER, 1, 100, 0).unwrap();
        state.request_storage(CLIENT, PROVIDER, 10, 0).unwrap();
        assert!(state.request_storage(CLIENT, PROVIDER, 51, 0).is_err());

        assert_eq!(state.provider_count(), 1);
        assert_eq!(state.request_count(), 1);
        assert_eq!(state.requests_for_provider(&PROVIDER).len(), 1);
        assert_eq!(state.requests_for_client(&CLIENT).len(), 1);
    }
}
