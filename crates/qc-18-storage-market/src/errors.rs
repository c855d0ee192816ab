//! # Error Types
//!
//! All error types for the storage marketplace.
//!
//! Every market error carries a stable numeric code. Code 101
//! (`RequestNotFound`) is the one observed by existing contract clients.

use crate::domain::entities::RequestStatus;
use crate::domain::value_objects::{Principal, RequestId};
use thiserror::Error;

// =============================================================================
// MARKET ERRORS
// =============================================================================

/// Numeric error codes surfaced on the call interface.
pub mod codes {
    /// Caller is not permitted to perform the operation.
    pub const UNAUTHORIZED: u32 = 100;
    /// Referenced request does not exist.
    pub const REQUEST_NOT_FOUND: u32 = 101;
    /// Principal already has a provider record.
    pub const ALREADY_REGISTERED: u32 = 102;
    /// Referenced provider does not exist.
    pub const PROVIDER_NOT_FOUND: u32 = 103;
    /// Requested size is zero or above the configured maximum.
    pub const INVALID_SIZE: u32 = 104;
    /// Request is not in the status the operation requires.
    pub const INVALID_STATE: u32 = 105;
    /// Provider does not have enough available space.
    pub const INSUFFICIENT_CAPACITY: u32 = 106;
    /// `size_gb * price_per_gb` does not fit in 64 bits.
    pub const PRICE_OVERFLOW: u32 = 107;
    /// Returning capacity would push a provider past its declared space.
    pub const CAPACITY_OVERFLOW: u32 = 108;
}

/// Errors returned by marketplace operations.
///
/// Every operation either commits fully or returns one of these with no
/// state mutated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketError {
    /// Principal already has a provider record.
    #[error("provider already registered: {0}")]
    AlreadyRegistered(Principal),

    /// No provider record for the principal.
    #[error("provider not found: {0}")]
    ProviderNotFound(Principal),

    /// Requested size is zero or too large.
    #[error("invalid size: {size_gb} GB (max {max_gb})")]
    InvalidSize {
        /// Size asked for.
        size_gb: u64,
        /// Largest size accepted.
        max_gb: u64,
    },

    /// No request with this id.
    #[error("request not found: {0}")]
    RequestNotFound(RequestId),

    /// Caller is not the principal allowed to act on the request.
    #[error("unauthorized: {caller} cannot act on request {request_id}")]
    Unauthorized {
        /// Principal that made the call.
        caller: Principal,
        /// Request the call targeted.
        request_id: RequestId,
    },

    /// Request is not in the required status.
    #[error("invalid state for request {request_id}: expected {expected:?}, found {actual:?}")]
    InvalidState {
        /// Request the call targeted.
        request_id: RequestId,
        /// Status the operation requires.
        expected: RequestStatus,
        /// Status the request is in.
        actual: RequestStatus,
    },

    /// Provider cannot cover the request size.
    #[error("insufficient capacity: requested {requested} GB, available {available} GB")]
    InsufficientCapacity {
        /// Size of the request being accepted.
        requested: u64,
        /// Provider space still available.
        available: u64,
    },

    /// Total price overflows.
    #[error("price overflow: {size_gb} GB at {price_per_gb} per GB")]
    PriceOverflow {
        /// Size asked for.
        size_gb: u64,
        /// Provider price at request time.
        price_per_gb: u64,
    },

    /// Released capacity does not fit back under the provider's total.
    #[error("capacity overflow for {provider}: {available} + {returned} GB > {total} GB")]
    CapacityOverflow {
        /// Provider whose accounting is inconsistent.
        provider: Principal,
        /// Space available before the release.
        available: u64,
        /// Size being returned.
        returned: u64,
        /// Declared total space.
        total: u64,
    },
}

impl MarketError {
    /// Returns the numeric code for the call interface.
    #[must_use]
    pub fn code(&self) -> u32 {
        match self {
            Self::Unauthorized { .. } => codes::UNAUTHORIZED,
            Self::RequestNotFound(_) => codes::REQUEST_NOT_FOUND,
            Self::AlreadyRegistered(_) => codes::ALREADY_REGISTERED,
            Self::ProviderNotFound(_) => codes::PROVIDER_NOT_FOUND,
            Self::InvalidSize { .. } => codes::INVALID_SIZE,
            Self::InvalidState { .. } => codes::INVALID_STATE,
            Self::InsufficientCapacity { .. } => codes::INSUFFICIENT_CAPACITY,
            Self::PriceOverflow { .. } => codes::PRICE_OVERFLOW,
            Self::CapacityOverflow { .. } => codes::CAPACITY_OVERFLOW,
        }
    }
}

// =============================================================================
// IPC ERRORS
// =============================================================================

/// Errors on the JSON call surface, before a call reaches the market.
#[derive(Debug, Error)]
pub enum IpcError {
    /// The line was not a valid call envelope.
    #[error("malformed call envelope: {0}")]
    MalformedEnvelope(#[from] serde_json::Error),
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Configuration validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Pending TTL of zero would expire every request immediately.
    #[error("pending request TTL must be at least one block")]
    ZeroPendingTtl,

    /// Maximum request size of zero would reject every request.
    #[error("maximum request size must be at least 1 GB")]
    ZeroMaxRequestSize,
}

// =============================================================================
// TESTS
// =============================================================================
