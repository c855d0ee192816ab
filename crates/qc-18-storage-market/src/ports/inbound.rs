//! # Driving Ports (API - Inbound)
//!
//! The public call surface of the storage marketplace. Each method takes
//! the caller principal explicitly; the hosting runtime is responsible for
//! it being unforgeable.
//!
//! | Operation | Success | Failure |
//! |-----------|---------|---------|
//! | `register_provider` | `true` | AlreadyRegistered |
//! | `get_provider_details` | `Some(view)` / `None` | - |
//! | `request_storage` | request id | ProviderNotFound, InvalidSize, PriceOverflow |
//! | `accept_request` | `true` | 101, Unauthorized, InvalidState, InsufficientCapacity |
//! | `reject_request` | `true` | 101, Unauthorized, InvalidState |
//! | `release_request` | `true` | 101, Unauthorized, InvalidState |

use crate::domain::entities::{ProviderView, RequestView};
use crate::domain::value_objects::{Principal, RequestId};
use crate::errors::MarketError;
use async_trait::async_trait;

/// Primary API for the storage marketplace.
#[async_trait]
pub trait StorageMarketApi: Send + Sync {
    /// Register `caller` as a provider.
    async fn register_provider(
        &self,
        caller: Principal,
        price_per_gb: u64,
        available_space: u64,
    ) -> Result<bool, MarketError>;

    /// Read-only provider snapshot.
    async fn get_provider_details(&self, principal: Principal) -> Option<ProviderView>;

    /// Create a Pending request from `caller` to `provider`.
    async fn request_storage(
        &self,
        caller: Principal,
        provider: Principal,
        size_gb: u64,
    ) -> Result<RequestId, MarketError>;

    /// Read-only request snapshot.
    async fn get_request(&self, request_id: RequestId) -> Option<RequestView>;

    /// Provider accepts a Pending request, committing capacity.
    async fn accept_request(
        &self,
        caller: Principal,
        request_id: RequestId,
    ) -> Result<bool, MarketError>;

    /// Provider rejects, or client cancels, a Pending request.
    async fn reject_request(
        &self,
        caller: Principal,
        request_id: RequestId,
    ) -> Result<bool, MarketError>;

    /// Provider or client releases an Accepted request.
    async fn release_request(
        &self,
        caller: Principal,
        request_id: RequestId,
    ) -> Result<bool, MarketError>;

    /// Requests addressed to `provider`, in id order.
    async fn requests_for_provider(&self, provider: Principal) -> Vec<RequestView>;

    /// Requests made by `client`, in id order.
    async fn requests_for_client(&self, client: Principal) -> Vec<RequestView>;
}
