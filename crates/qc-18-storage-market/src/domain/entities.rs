//! # Domain Entities
//!
//! Provider and storage request records, plus the read-only views handed
//! out to callers.

use super::value_objects::{BlockHeight, Principal, RequestId};
use serde::{Deserialize, Serialize};

// =============================================================================
// PROVIDER
// =============================================================================

/// A registered storage provider.
///
/// `price_per_gb` and `total_space` are fixed at registration. Only
/// `available_space` moves, and only through the capacity accountant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provider {
    /// Provider identity.
    pub principal: Principal,
    /// Price charged per GB.
    pub price_per_gb: u64,
    /// Capacity declared at registration.
    pub total_space: u64,
    /// Capacity not committed to accepted requests.
    pub available_space: u64,
    /// Block height of registration.
    pub registered_at: BlockHeight,
}

impl Provider {
    /// Creates a provider with all declared space available.
    #[must_use]
    pub fn new(
        principal: Principal,
        price_per_gb: u64,
        available_space: u64,
        registered_at: BlockHeight,
    ) -> Self {
        Self {
            principal,
            price_per_gb,
            total_space: available_space,
            available_space,
            registered_at,
        }
    }

    /// Capacity currently committed to accepted requests.
    #[must_use]
    pub fn committed_space(&self) -> u64 {
        self.total_space.saturating_sub(self.available_space)
    }

    /// Returns true if `size_gb` fits into the available space.
    #[must_use]
    pub fn can_fit(&self, size_gb: u64) -> bool {
        self.available_space >= size_gb
    }

    /// Read-only snapshot of this provider.
    #[must_use]
    pub fn view(&self) -> ProviderView {
        ProviderView {
            principal: self.principal,
            price_per_gb: self.price_per_gb,
            total_space: self.total_space,
            available_space: self.available_space,
            registered_at: self.registered_at,
        }
    }
}

/// Immutable snapshot of a provider, as returned by `get-provider-details`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderView {
    /// Provider identity.
    pub principal: Principal,
    /// Price charged per GB.
    pub price_per_gb: u64,
    /// Capacity declared at registration.
    pub total_space: u64,
    /// Remaining unreserved capacity.
    pub available_space: u64,
    /// Block height of registration.
    pub registered_at: BlockHeight,
}

// =============================================================================
// STORAGE REQUEST
// =============================================================================

/// Lifecycle status of a storage request.
///
/// ```text
/// [Pending] ──accept──→ [Accepted] ──release──→ [Released]
///     │
///     └── reject / expire ──→ [Rejected]
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Created, capacity not yet committed.
    Pending,
    /// Provider committed capacity.
    Accepted,
    /// Rejected, cancelled or expired before acceptance. Terminal.
    Rejected,
    /// Capacity returned to the provider. Terminal.
    Released,
}

impl RequestStatus {
    /// Returns true if the lifecycle allows moving from `self` to `next`.
    #[must_use]
    pub fn can_transition_to(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Accepted, Self::Released)
        )
    }

    /// Returns true for statuses with no outgoing transition.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Released)
    }

    /// Returns true if this status holds provider capacity.
    #[must_use]
    pub fn holds_capacity(self) -> bool {
        self == Self::Accepted
    }
}

/// A client's ask to reserve capacity from a provider.
///
/// Records are never deleted; only `status` and `updated_at` change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageRequest {
    /// Sequential identifier.
    pub id: RequestId,
    /// Requesting principal.
    pub client: Principal,
    /// Target provider.
    pub provider: Principal,
    /// Requested size in GB (> 0).
    pub size_gb: u64,
    /// Provider price captured at creation.
    pub price_per_gb: u64,
    /// `size_gb * price_per_gb`.
    pub total_price: u64,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Block height at creation.
    pub created_at: BlockHeight,
    /// Block height of the last status change.
    pub updated_at: BlockHeight,
}

impl StorageRequest {
    /// Returns true if `principal` is the request's provider or client.
    #[must_use]
    pub fn is_party(&self, principal: &Principal) -> bool {
        self.provider == *principal || self.client == *principal
    }

    /// Read-only snapshot of this request.
    #[must_use]
    pub fn view(&self) -> RequestView {
        RequestView {
            id: self.id,
            client: self.client,
            provider: self.provider,
            size_gb: self.size_gb,
            price_per_gb: self.price_per_gb,
            total_price: self.total_price,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Immutable snapshot of a storage request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
    /// Sequential identifier.
    pub id: RequestId,
    /// Requesting principal.
    pub client: Principal,
    /// Target provider.
    pub provider: Principal,
    /// Requested size in GB.
    pub size_gb: u64,
    /// Provider price captured at creation.
    pub price_per_gb: u64,
    /// `size_gb * price_per_gb`.
    pub total_price: u64,
    /// Lifecycle status.
    pub status: RequestStatus,
    /// Block height at creation.
    pub created_at: BlockHeight,
    /// Block height of the last status change.
    pub updated_at: BlockHeight,
}

// =============================================================================
// TESTS
// =============================================================================
