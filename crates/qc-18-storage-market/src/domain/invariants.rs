//! # Domain Invariants
//!
//! Capacity invariants that must hold between every committed transition.
//!
//! - INVARIANT-1: Bounded Capacity (`available_space <= total_space`)
//! - INVARIANT-2: Capacity Conservation
//!   (`available_space + Σ accepted size == total_space`)
//! - INVARIANT-3: Referential Integrity (every request names a registered
//!   provider)

use super::ledger::RequestLedger;
use super::registry::ProviderRegistry;
use super::value_objects::{Principal, RequestId};
use serde::Serialize;

/// A violated invariant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum InvariantViolation {
    /// Available space exceeds declared capacity.
    CapacityExceeded {
        /// Offending provider.
        provider: Principal,
        /// Recorded available space.
        available: u64,
        /// Declared total space.
        total: u64,
    },
    /// Available plus committed space does not add up to declared capacity.
    CapacityLeak {
        /// Offending provider.
        provider: Principal,
        /// Recorded available space.
        available: u64,
        /// Sum of accepted request sizes.
        committed: u128,
        /// Declared total space.
        total: u64,
    },
    /// Request references a provider with no record.
    DanglingProvider {
        /// Request holding the reference.
        request_id: RequestId,
        /// Provider with no record.
        provider: Principal,
    },
}

/// INVARIANT-1: Bounded Capacity
#[must_use]
pub fn check_bounded_capacity(registry: &ProviderRegistry) -> Vec<InvariantViolation> {
    registry
        .iter()
        .filter(|p| p.available_space > p.total_space)
        .map(|p| InvariantViolation::CapacityExceeded {
            provider: p.principal,
            available: p.available_space,
            total: p.total_space,
        })
        .collect()
}

/// INVARIANT-2: Capacity Conservation
#[must_use]
pub fn check_conservation(
    registry: &ProviderRegistry,
    ledger: &RequestLedger,
) -> Vec<InvariantViolation> {
    registry
        .iter()
        .filter_map(|p| {
            let committed = ledger.committed_for(&p.principal);
            let sum = u128::from(p.available_space) + committed;
            (sum != u128::from(p.total_space)).then_some(InvariantViolation::CapacityLeak {
                provider: p.principal,
                available: p.available_space,
                committed,
                total: p.total_space,
            })
        })
        .collect()
}

/// INVARIANT-3: Referential Integrity
#[must_use]
pub fn check_referential_integrity(
    registry: &ProviderRegistry,
    ledger: &RequestLedger,
) -> Vec<InvariantViolation> {
    ledger
        .iter()
        .filter(|r| !registry.contains(&r.provider))
        .map(|r| InvariantViolation::DanglingProvider {
            request_id: r.id,
            provider: r.provider,
        })
        .collect()
}

/// Check all invariants at once.
#[must_use]
pub fn check_all_invariants(
    registry: &ProviderRegistry,
    ledger: &RequestLedger,
) -> Vec<InvariantViolation> {
    let mut violations = check_bounded_capacity(registry);
    violations.extend(check_conservation(registry, ledger));
    violations.extend(check_referential_integrity(registry, ledger));
    violations
}
