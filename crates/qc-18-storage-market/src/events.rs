//! # Event Schema
//!
//! Committed marketplace transitions, published to the runtime's journal
//! through `MarketEventSink`. An event is emitted only after its transition
//! is applied; failed calls emit nothing.

use crate::domain::entities::{ProviderView, RequestView};
use crate::domain::value_objects::{BlockHeight, Principal, RequestId};
use serde::{Deserialize, Serialize};

/// A committed marketplace transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MarketEvent {
    /// A principal registered as provider.
    ProviderRegistered {
        /// Provider snapshot after registration.
        provider: ProviderView,
    },
    /// A client created a Pending request.
    StorageRequested {
        /// Request snapshot after creation.
        request: RequestView,
    },
    /// Provider accepted a request and committed capacity.
    RequestAccepted {
        /// Request snapshot after acceptance.
        request: RequestView,
        /// Provider available space after acceptance.
        available_space: u64,
    },
    /// A Pending request was rejected or cancelled by a party.
    RequestRejected {
        /// Request snapshot after rejection.
        request: RequestView,
        /// Principal who rejected.
        by: Principal,
    },
    /// Capacity of an Accepted request was returned to the provider.
    RequestReleased {
        /// Request snapshot after release.
        request: RequestView,
        /// Principal who released.
        by: Principal,
        /// Provider available space after release.
        available_space: u64,
    },
    /// A Pending request outlived its TTL.
    RequestExpired {
        /// Request snapshot after expiry.
        request: RequestView,
    },
}

impl MarketEvent {
    /// Block height at which the transition was committed.
    #[must_use]
    pub fn block_height(&self) -> BlockHeight {
        match self {
            Self::ProviderRegistered { provider } => provider.registered_at,
            Self::StorageRequested { request }
            | Self::RequestAccepted { request, .. }
            | Self::RequestRejected { request, .. }
            | Self::RequestReleased { request, .. }
            | Self::RequestExpired { request } => request.updated_at,
        }
    }

    /// Request the event refers to, if any.
    #[must_use]
    pub fn request_id(&self) -> Option<RequestId> {
        match self {
            Self::ProviderRegistered { .. } => None,
            Self::StorageRequested { request }
            | Self::RequestAccepted { request, .. }
            | Self::RequestRejected { request, .. }
            | Self::RequestReleased { request, .. }
            | Self::RequestExpired { request } => Some(request.id),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProviderRegistered { .. } => "provider_registered",
            Self::StorageRequested { .. } => "storage_requested",
            Self::RequestAccepted { .. } => "request_accepted",
            Self::RequestRejected { .. } => "request_rejected",
            Self::RequestReleased { .. } => "request_released",
            Self::RequestExpired { .. } => "request_expired",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::RequestStatus;

    fn request_view() -> RequestView {
        RequestView {
            id: RequestId(4),
            client: Principal::new([2; 20]),
            provider: Principal::new([1; 20]),
            size_gb: 100,
            price_per_gb: 200,
            total_price: 20_000,
            status: RequestStatus::Accepted,
            created_at: 3,
            updated_at: 9,
        }
    }

    #[test]
    fn test_event_metadata() {
        let event = MarketEvent::RequestAccepted {
            request: request_view(),
            available_space: 900,
        };
        assert_eq!(event.block_height(), 9);
        assert_eq!(event.request_id(), Some(RequestId(4)));
        assert_eq!(event.name(), "request_accepted");
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = MarketEvent::RequestExpired { request: request_view() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "request_expired");
        assert_eq!(json["request"]["status"], "accepted");
        assert_eq!(json["request"]["id"], 4);
    }
}
