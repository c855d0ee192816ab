//! # Authorization Guard
//!
//! Existence and principal checks that run before any state transition.
//! Existence is always checked first: an unknown request id yields
//! `RequestNotFound` (code 101) for every caller.

use super::entities::{RequestStatus, StorageRequest};
use super::ledger::RequestLedger;
use super::value_objects::{Principal, RequestId};
use crate::errors::MarketError;

/// Fails with `RequestNotFound` unless `id` exists.
pub fn require_exists(
    ledger: &RequestLedger,
    id: RequestId,
) -> Result<&StorageRequest, MarketError> {
    ledger.record(id).ok_or(MarketError::RequestNotFound(id))
}

/// Fails with `Unauthorized` unless `caller` is the request's provider.
pub fn require_provider(caller: &Principal, request: &StorageRequest) -> Result<(), MarketError> {
    if request.provider == *caller {
        Ok(())
    } else {
        Err(MarketError::Unauthorized {
            caller: *caller,
            request_id: request.id,
        })
    }
}

/// Fails with `Unauthorized` unless `caller` is the provider or the client.
pub fn require_party(caller: &Principal, request: &StorageRequest) -> Result<(), MarketError> {
    if request.is_party(caller) {
        Ok(())
    } else {
        Err(MarketError::Unauthorized {
            caller: *caller,
            request_id: request.id,
        })
    }
}

/// Fails with `InvalidState` unless the request is in `expected`.
pub fn require_status(
    request: &StorageRequest,
    expected: RequestStatus,
) -> Result<(), MarketError> {
    if request.status == expected {
        Ok(())
    } else {
        Err(MarketError::InvalidState {
            request_id: request.id,
            expected,
            actual: request.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::ProviderRegistry;

    const PROVIDER: Principal = Principal::new([1; 20]);
    const CLIENT: Principal = Principal::new([2; 20]);
    const ATTACKER: Principal = Principal::new([3; 20]);

    fn ledger_with_request() -> RequestLedger {
        let mut registry = ProviderRegistry::new();
        registry.register(PROVIDER, 200, 1000, 0).unwrap();
        let mut ledger = RequestLedger::default();
        ledger.create_request(&registry, CLIENT, PROVIDER, 100, 1).unwrap();
        ledger
    }

    #[test]
    fn test_missing_request_is_101() {
        let ledger = RequestLedger::default();
        let err = require_exists(&ledger, RequestId(999)).unwrap_err();
        assert_eq!(err.code(), 101);
    }

    #[test]
    fn test_require_provider() {
        let ledger = ledger_with_request();
        let request = require_exists(&ledger, RequestId(0)).unwrap();
        assert!(require_provider(&PROVIDER, request).is_ok());
        assert!(matches!(
            require_provider(&CLIENT, request),
            Err(MarketError::Unauthorized { .. })
        ));
        assert!(require_provider(&ATTACKER, request).is_err());
    }

    #[test]
    fn test_require_party() {
        let ledger = ledger_with_request();
        let request = require_exists(&ledger, RequestId(0)).unwrap();
        assert!(require_party(&PROVIDER, request).is_ok());
        assert!(require_party(&CLIENT, request).is_ok());
        assert_eq!(require_party(&ATTACKER, request).unwrap_err().code(), 100);
    }

    #[test]
    fn test_require_status() {
        let ledger = ledger_with_request();
        let request = require_exists(&ledger, RequestId(0)).unwrap();
        assert!(require_status(request, RequestStatus::Pending).is_ok());
        let err = require_status(request, RequestStatus::Accepted).unwrap_err();
        assert_eq!(
            err,
            MarketError::InvalidState {
                request_id: RequestId(0),
                expected: RequestStatus::Accepted,
                actual: RequestStatus::Pending,
            }
        );
    }
}
