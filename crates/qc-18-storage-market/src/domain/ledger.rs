//! # Request Ledger
//!
//! Owns storage request records keyed by id. Requests reference their
//! provider and client by principal only; provider capacity lives in the
//! registry and is never copied here.
//!
//! ## Data Structures
//!
//! - `requests`: id-ordered map, so snapshots come out in creation order
//! - `by_provider` / `by_client`: id lists for per-principal queries

use super::entities::{RequestStatus, RequestView, StorageRequest};
use super::registry::ProviderRegistry;
use super::value_objects::{BlockHeight, Principal, RequestId};
use crate::errors::MarketError;
use std::collections::{BTreeMap, HashMap};

/// Storage requests and their lifecycle state.
#[derive(Debug)]
pub struct RequestLedger {
    requests: BTreeMap<RequestId, StorageRequest>,
    by_provider: HashMap<Principal, Vec<RequestId>>,
    by_client: HashMap<Principal, Vec<RequestId>>,
    next_id: RequestId,
    max_request_size_gb: u64,
}

impl Default for RequestLedger {
    fn default() -> Self {
        Self::new(u64::MAX)
    }
}

impl RequestLedger {
    /// Creates an empty ledger accepting sizes in `1..=max_request_size_gb`.
    #[must_use]
    pub fn new(max_request_size_gb: u64) -> Self {
        Self {
            requests: BTreeMap::new(),
            by_provider: HashMap::new(),
            by_client: HashMap::new(),
            next_id: RequestId(0),
            max_request_size_gb,
        }
    }

    /// Records a new Pending request from `client` to `provider`.
    ///
    /// Capacity is not reserved here; it is checked and committed on accept.
    ///
    /// # Errors
    ///
    /// - `ProviderNotFound` if `provider` is not registered (checked first)
    /// - `InvalidSize` if `size_gb` is zero or above the maximum
    /// - `PriceOverflow` if the total price does not fit in 64 bits
    pub fn create_request(
        &mut self,
        registry: &ProviderRegistry,
        client: Principal,
        provider: Principal,
        size_gb: u64,
        height: BlockHeight,
    ) -> Result<RequestId, MarketError> {
        let record = registry
            .record(&provider)
            .ok_or(MarketError::ProviderNotFound(provider))?;

        if size_gb == 0 || size_gb > self.max_request_size_gb {
            return Err(MarketError::InvalidSize {
                size_gb,
                max_gb: self.max_request_size_gb,
            });
        }

        let price_per_gb = record.price_per_gb;
        let total_price = size_gb
            .checked_mul(price_per_gb)
            .ok_or(MarketError::PriceOverflow { size_gb, price_per_gb })?;

        let id = self.next_id;
        self.next_id = id.next();
        self.requests.insert(
            id,
            StorageRequest {
                id,
                client,
                provider,
                size_gb,
                price_per_gb,
                total_price,
                status: RequestStatus::Pending,
                created_at: height,
                updated_at: height,
            },
        );
        self.by_provider.entry(provider).or_default().push(id);
        self.by_client.entry(client).or_default().push(id);
        Ok(id)
    }

    /// Snapshot of a request, or `None` if the id was never created.
    #[must_use]
    pub fn get(&self, id: RequestId) -> Option<RequestView> {
        self.requests.get(&id).map(StorageRequest::view)
    }

    /// Borrow a request record.
    pub(crate) fn record(&self, id: RequestId) -> Option<&StorageRequest> {
        self.requests.get(&id)
    }

    /// Moves a request to `status`. Callers have already validated the
    /// transition.
    pub(crate) fn set_status(&mut self, id: RequestId, status: RequestStatus, height: BlockHeight) {
        if let Some(request) = self.requests.get_mut(&id) {
            debug_assert!(request.status.can_transition_to(status));
            request.status = status;
            request.updated_at = height;
        }
    }

    /// Requests addressed to `provider`, in id order.
    #[must_use]
    pub fn requests_for_provider(&self, provider: &Principal) -> Vec<RequestView> {
        self.collect(self.by_provider.get(provider))
    }

    /// Requests made by `client`, in id order.
    #[must_use]
    pub fn requests_for_client(&self, client: &Principal) -> Vec<RequestView> {
        self.collect(self.by_client.get(client))
    }

    /// Ids of Pending requests created at least `ttl` blocks before `now`.
    #[must_use]
    pub fn stale_pending(&self, now: BlockHeight, ttl: u64) -> Vec<RequestId> {
        self.requests
            .values()
            .filter(|r| r.status == RequestStatus::Pending)
            .filter(|r| r.created_at.saturating_add(ttl) <= now)
            .map(|r| r.id)
            .collect()
    }

    /// Sum of `size_gb` over Accepted requests for `provider`.
    #[must_use]
    pub fn committed_for(&self, provider: &Principal) -> u128 {
        self.by_provider
            .get(provider)
            .into_iter()
            .flatten()
            .filter_map(|id| self.requests.get(id))
            .filter(|r| r.status.holds_capacity())
            .map(|r| u128::from(r.size_gb))
            .sum()
    }

    /// Iterate over all requests in id order.
    pub fn iter(&self) -> impl Iterator<Item = &StorageRequest> {
        self.requests.values()
    }

    /// Number of requests ever created.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Returns true if no request was ever created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Id the next request will receive.
    #[must_use]
    pub fn next_id(&self) -> RequestId {
        self.next_id
    }

    fn collect(&self, ids: Option<&Vec<RequestId>>) -> Vec<RequestView> {
        ids.into_iter()
            .flatten()
            .filter_map(|id| self.requests.get(id))
            .map(StorageRequest::view)
            .collect()
    }
}
