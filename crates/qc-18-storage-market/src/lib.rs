//! # QC-18 Storage Market - Decentralized Storage Marketplace Subsystem
//!
//! **Subsystem ID:** 18
//!
//! ## Purpose
//!
//! Coordinates a storage marketplace: providers register a price and a
//! capacity, clients request storage from a provider, and the provider
//! accepts, which commits capacity. Capacity returns to the provider when
//! an accepted request is released.
//!
//! Consensus, block production, accounts and settlement belong to the
//! hosting runtime, which supplies caller identity, block height and a
//! durable journal.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Bounded Capacity | `domain/invariants.rs` - `check_bounded_capacity()` |
//! | INVARIANT-2 | Capacity Conservation | `domain/accountant.rs` - validate-then-commit |
//! | INVARIANT-3 | One Provider Per Principal | `domain/registry.rs` - `register()` |
//! | INVARIANT-4 | Forward-Only Lifecycle | `domain/guard.rs` - `require_status()` |
//! | INVARIANT-5 | No Over-Commit Under Concurrency | `service.rs` - single write lock |
//!
//! ## Request Lifecycle
//!
//! ```text
//! [Pending] ──accept──→ [Accepted] ──release──→ [Released]
//!     │
//!     └── reject / cancel / expire ──→ [Rejected]
//! ```
//!
//! ## Error Codes
//!
//! | Code | Error |
//! |------|-------|
//! | 100 | Unauthorized |
//! | 101 | RequestNotFound |
//! | 102 | AlreadyRegistered |
//! | 103 | ProviderNotFound |
//! | 104 | InvalidSize |
//! | 105 | InvalidState |
//! | 106 | InsufficientCapacity |
//! | 107 | PriceOverflow |
//! | 108 | CapacityOverflow |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      OUTER LAYER                                │
//! │  adapters/ - ManualBlockClock, InMemoryEventLog                 │
//! │  ipc/      - call envelopes, receipts, MarketCallHandler        │
//! │  node.rs   - MarketNode, line-oriented standalone runtime       │
//! │  service.rs - StorageMarketService (lock, events, stats)        │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MIDDLE LAYER                               │
//! │  ports/inbound.rs  - StorageMarketApi                           │
//! │  ports/outbound.rs - BlockHeightSource, MarketEventSink         │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      INNER LAYER                                │
//! │  domain/registry.rs   - ProviderRegistry                        │
//! │  domain/ledger.rs     - RequestLedger                           │
//! │  domain/guard.rs      - authorization checks                    │
//! │  domain/accountant.rs - CapacityAccountant                      │
//! │  domain/state.rs      - MarketState                             │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use qc_18_storage_market::prelude::*;
//!
//! let (market, _clock, _events) = create_test_service(MarketConfig::default());
//! market.register_provider(provider, 200, 1000).await?;
//! let id = market.request_storage(client, provider, 100).await?;
//! market.accept_request(provider, id).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ipc;
pub mod node;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::domain::entities::{
        Provider, ProviderView, RequestStatus, RequestView, StorageRequest,
    };
    pub use crate::domain::invariants::InvariantViolation;
    pub use crate::domain::state::MarketState;
    pub use crate::domain::value_objects::{BlockHeight, Principal, RequestId};

    pub use crate::ports::inbound::StorageMarketApi;
    pub use crate::ports::outbound::{BlockHeightSource, MarketEventSink, NullEventSink};

    pub use crate::adapters::{InMemoryEventLog, ManualBlockClock};
    pub use crate::config::MarketConfig;
    pub use crate::errors::{codes, ConfigError, IpcError, MarketError};
    pub use crate::events::MarketEvent;
    pub use crate::ipc::{
        CallError, CallReceipt, CallResult, MarketCall, MarketCallEnvelope, MarketCallHandler,
    };
    pub use crate::node::MarketNode;
    pub use crate::service::{create_test_service, ServiceStats, StorageMarketService};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subsystem ID.
pub const SUBSYSTEM_ID: u8 = 18;

/// Subsystem name.
pub const SUBSYSTEM_NAME: &str = "Storage Market";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_exports() {
        use prelude::*;
        let _ = MarketConfig::default();
        let _ = RequestId(0);
        assert_eq!(codes::REQUEST_NOT_FOUND, 101);
        assert_eq!(SUBSYSTEM_ID, 18);
    }
}
