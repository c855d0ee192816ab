//! # Capacity Accountant
//!
//! Applies request transitions against the registry and ledger together.
//!
//! Every method validates first and mutates last: once the first write
//! happens nothing can fail, so a returned error always means no state
//! changed.
//!
//! | Transition | Caller | From | Capacity |
//! |------------|--------|------|----------|
//! | accept | provider | Pending | `available -= size` |
//! | reject | provider or client | Pending | unchanged |
//! | release | provider or client | Accepted | `available += size` |
//! | expire | runtime sweep | Pending | unchanged |

use super::entities::{RequestStatus, RequestView, StorageRequest};
use super::guard;
use super::ledger::RequestLedger;
use super::registry::ProviderRegistry;
use super::value_objects::{BlockHeight, Principal, RequestId};
use crate::errors::MarketError;

/// Result of a committed transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionOutcome {
    /// Request after the transition.
    pub request: RequestView,
    /// Provider available space after the transition.
    pub available_space: u64,
}

/// Borrowing view over the registry and ledger for one logical transaction.
pub struct CapacityAccountant<'a> {
    registry: &'a mut ProviderRegistry,
    ledger: &'a mut RequestLedger,
}

impl<'a> CapacityAccountant<'a> {
    /// Creates an accountant over `registry` and `ledger`.
    pub fn new(registry: &'a mut ProviderRegistry, ledger: &'a mut RequestLedger) -> Self {
        Self { registry, ledger }
    }

    /// Provider accepts a Pending request and commits its capacity.
    ///
    /// # Errors
    ///
    /// In check order: `RequestNotFound`, `Unauthorized`, `InvalidState`,
    /// `InsufficientCapacity`.
    pub fn accept(
        &mut self,
        caller: &Principal,
        id: RequestId,
        height: BlockHeight,
    ) -> Result<TransitionOutcome, MarketError> {
        let request = guard::require_exists(self.ledger, id)?.clone();
        guard::require_provider(caller, &request)?;
        guard::require_status(&request, RequestStatus::Pending)?;

        let provider = self
            .registry
            .record_mut(&request.provider)
            .ok_or(MarketError::ProviderNotFound(request.provider))?;
        if !provider.can_fit(request.size_gb) {
            return Err(MarketError::InsufficientCapacity {
                requested: request.size_gb,
                available: provider.available_space,
            });
        }

        provider.available_space -= request.size_gb;
        let available_space = provider.available_space;
        self.ledger.set_status(id, RequestStatus::Accepted, height);

        Ok(outcome(&request, RequestStatus::Accepted, height, available_space))
    }

    /// Provider rejects, or client cancels, a Pending request.
    ///
    /// # Errors
    ///
    /// In check order: `RequestNotFound`, `Unauthorized`, `InvalidState`.
    pub fn reject(
        &mut self,
        caller: &Principal,
        id: RequestId,
        height: BlockHeight,
    ) -> Result<TransitionOutcome, MarketError> {
        let request = guard::require_exists(self.ledger, id)?.clone();
        guard::require_party(caller, &request)?;
        guard::require_status(&request, RequestStatus::Pending)?;

        self.ledger.set_status(id, RequestStatus::Rejected, height);
        let available_space = self.available_space(&request.provider);
        Ok(outcome(&request, RequestStatus::Rejected, height, available_space))
    }

    /// Provider or client releases an Accepted request, returning its
    /// capacity to the provider.
    ///
    /// # Errors
    ///
    /// In check order: `RequestNotFound`, `Unauthorized`, `InvalidState`,
    /// then `CapacityOverflow` if the provider's accounting is already
    /// inconsistent.
    pub fn release(
        &mut self,
        caller: &Principal,
        id: RequestId,
        height: BlockHeight,
    ) -> Result<TransitionOutcome, MarketError> {
        let request = guard::require_exists(self.ledger, id)?.clone();
        guard::require_party(caller, &request)?;
        guard::require_status(&request, RequestStatus::Accepted)?;

        let provider = self
            .registry
            .record_mut(&request.provider)
            .ok_or(MarketError::ProviderNotFound(request.provider))?;
        let restored = provider
            .available_space
            .checked_add(request.size_gb)
            .filter(|space| *space <= provider.total_space)
            .ok_or(MarketError::CapacityOverflow {
                provider: request.provider,
                available: provider.available_space,
                returned: request.size_gb,
                total: provider.total_space,
            })?;

        provider.available_space = restored;
        let available_space = restored;
        self.ledger.set_status(id, RequestStatus::Released, height);

        Ok(outcome(&request, RequestStatus::Released, height, available_space))
    }

    /// Rejects every Pending request created at least `ttl` blocks before
    /// `now`. Returns the expired requests.
    pub fn expire_pending(&mut self, now: BlockHeight, ttl: u64) -> Vec<RequestView> {
        let stale = self.ledger.stale_pending(now, ttl);
        stale
            .into_iter()
            .filter_map(|id| {
                self.ledger.set_status(id, RequestStatus::Rejected, now);
                self.ledger.get(id)
            })
            .collect()
    }

    fn available_space(&self, provider: &Principal) -> u64 {
        self.registry
            .record(provider)
            .map_or(0, |p| p.available_space)
    }
}

fn outcome(
    before: &StorageRequest,
    status: RequestStatus,
    height: BlockHeight,
    available_space: u64,
) -> TransitionOutcome {
    let mut request = before.view();
    request.status = status;
    request.updated_at = height;
    TransitionOutcome {
        request,
        available_space,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROVIDER: Principal = Principal::new([1; 20]);
    const CLIENT: Principal = Principal::new([2; 20]);
    const ATTACKER: Principal = Principal::new([3; 20]);

    struct Fixture {
        registry: ProviderRegistry,
        ledger: RequestLedger,
    }

    impl Fixture {
        fn new(space: u64) -> Self {
            let mut registry = ProviderRegistry::new();
            registry.register(PROVIDER, 200, space, 0).unwrap();
            Self {
                registry,
                ledger: RequestLedger::default(),
            }
        }

        fn request(&mut self, size: u64) -> RequestId {
            self.ledger
                .create_request(&self.registry, CLIENT, PROVIDER, size, 1)
                .unwrap()
        }

        fn accountant(&mut self) -> CapacityAccountant<'_> {
            CapacityAccountant::new(&mut self.registry, &mut self.ledger)
        }

        fn available(&self) -> u64 {
            self.registry.get(&PROVIDER).unwrap().available_space
        }

        fn status(&self, id: RequestId) -> RequestStatus {
            self.ledger.get(id).unwrap().status
        }
    }

    #[test]
    fn test_accept_commits_capacity() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(100);

        let outcome = fx.accountant().accept(&PROVIDER, id, 2).unwrap();
        assert_eq!(outcome.available_space, 900);
        assert_eq!(outcome.request.status, RequestStatus::Accepted);
        assert_eq!(outcome.request.updated_at, 2);
        assert_eq!(fx.available(), 900);
    }

    #[test]
    fn test_accept_missing_request_for_any_caller() {
        let mut fx = Fixture::new(1000);
        for caller in [PROVIDER, CLIENT, ATTACKER] {
            let err = fx.accountant().accept(&caller, RequestId(999), 2).unwrap_err();
            assert_eq!(err.code(), 101);
        }
    }

    #[test]
    fn test_accept_by_non_provider_changes_nothing() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(100);

        for caller in [CLIENT, ATTACKER] {
            let err = fx.accountant().accept(&caller, id, 2).unwrap_err();
            assert!(matches!(err, MarketError::Unauthorized { .. }));
        }
        assert_eq!(fx.available(), 1000);
        assert_eq!(fx.status(id), RequestStatus::Pending);
    }

    #[test]
    fn test_double_accept_is_invalid_state() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(100);
        fx.accountant().accept(&PROVIDER, id, 2).unwrap();

        let err = fx.accountant().accept(&PROVIDER, id, 3).unwrap_err();
        assert!(matches!(
            err,
            MarketError::InvalidState {
                actual: RequestStatus::Accepted,
                ..
            }
        ));
        assert_eq!(fx.available(), 900);
    }

    #[test]
    fn test_over_capacity_accept_changes_nothing() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(1001);

        let err = fx.accountant().accept(&PROVIDER, id, 2).unwrap_err();
        assert_eq!(
            err,
            MarketError::InsufficientCapacity {
                requested: 1001,
                available: 1000
            }
        );
        assert_eq!(fx.available(), 1000);
        assert_eq!(fx.status(id), RequestStatus::Pending);
    }

    #[test]
    fn test_accept_exact_fit_drains_to_zero() {
        let mut fx = Fixture::new(300);
        let a = fx.request(200);
        let b = fx.request(100);
        let c = fx.request(1);

        fx.accountant().accept(&PROVIDER, a, 2).unwrap();
        fx.accountant().accept(&PROVIDER, b, 2).unwrap();
        assert_eq!(fx.available(), 0);
        assert!(fx.accountant().accept(&PROVIDER, c, 2).is_err());
    }

    #[test]
    fn test_reject_by_provider_or_client() {
        let mut fx = Fixture::new(1000);
        let a = fx.request(100);
        let b = fx.request(100);

        fx.accountant().reject(&PROVIDER, a, 2).unwrap();
        fx.accountant().reject(&CLIENT, b, 2).unwrap();
        assert_eq!(fx.status(a), RequestStatus::Rejected);
        assert_eq!(fx.status(b), RequestStatus::Rejected);
        assert_eq!(fx.available(), 1000);

        // Rejected is terminal.
        assert!(fx.accountant().accept(&PROVIDER, a, 3).is_err());
    }

    #[test]
    fn test_reject_checks() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(100);

        assert_eq!(fx.accountant().reject(&ATTACKER, id, 2).unwrap_err().code(), 100);
        fx.accountant().accept(&PROVIDER, id, 2).unwrap();
        assert_eq!(fx.accountant().reject(&PROVIDER, id, 3).unwrap_err().code(), 105);
        assert_eq!(fx.available(), 900);
    }

    #[test]
    fn test_release_restores_capacity() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(100);
        fx.accountant().accept(&PROVIDER, id, 2).unwrap();

        let outcome = fx.accountant().release(&CLIENT, id, 3).unwrap();
        assert_eq!(outcome.available_space, 1000);
        assert_eq!(fx.status(id), RequestStatus::Released);

        let err = fx.accountant().release(&PROVIDER, id, 4).unwrap_err();
        assert_eq!(err.code(), 105);
        assert_eq!(fx.available(), 1000);
    }

    #[test]
    fn test_release_requires_accepted_and_party() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(100);

        assert_eq!(fx.accountant().release(&PROVIDER, id, 2).unwrap_err().code(), 105);
        fx.accountant().accept(&PROVIDER, id, 2).unwrap();
        assert_eq!(fx.accountant().release(&ATTACKER, id, 3).unwrap_err().code(), 100);
        assert_eq!(fx.available(), 900);
    }

    #[test]
    fn test_release_into_inconsistent_provider_is_refused() {
        let mut fx = Fixture::new(1000);
        let id = fx.request(100);
        fx.accountant().accept(&PROVIDER, id, 2).unwrap();
        fx.registry.record_mut(&PROVIDER).unwrap().available_space = 950;

        let err = fx.accountant().release(&CLIENT, id, 3).unwrap_err();
        assert_eq!(
            err,
            MarketError::CapacityOverflow {
                provider: PROVIDER,
                available: 950,
                returned: 100,
                total: 1000,
            }
        );
        assert_eq!(err.code(), 108);
        assert_eq!(fx.available(), 950);
        assert_eq!(fx.status(id), RequestStatus::Accepted);
    }

    #[test]
    fn test_expire_pending_only_touches_stale_pending() {
        let mut fx = Fixture::new(1000);
        let stale = fx.request(10);
        let accepted = fx.request(10);
        fx.accountant().accept(&PROVIDER, accepted, 1).unwrap();

        let expired = fx.accountant().expire_pending(20, 10);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, stale);
        assert_eq!(fx.status(stale), RequestStatus::Rejected);
        assert_eq!(fx.status(accepted), RequestStatus::Accepted);
        assert_eq!(fx.available(), 990);

        assert!(fx.accountant().expire_pending(20, 10).is_empty());
    }
}
