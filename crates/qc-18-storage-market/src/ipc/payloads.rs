//! # Call Payloads
//!
//! JSON shapes of the marketplace call surface. One `MarketCallEnvelope`
//! per call, answered with one `CallReceipt`.
//!
//! ```text
//! {"caller":"0x01..","call":{"op":"accept-request","request_id":0}}
//! {"correlation_id":"..","caller":"0x01..","op":"accept-request","result":{"ok":true}}
//! {"correlation_id":"..","caller":"0x03..","op":"accept-request","result":{"err":{"code":101,"message":".."}}}
//! ```

use crate::domain::value_objects::{Principal, RequestId};
use crate::errors::{IpcError, MarketError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// A marketplace operation and its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum MarketCall {
    /// `register-provider`
    RegisterProvider {
        /// Price per GB.
        price_per_gb: u64,
        /// Capacity offered.
        available_space: u64,
    },
    /// `get-provider-details`
    GetProviderDetails {
        /// Provider to look up.
        principal: Principal,
    },
    /// `request-storage`
    RequestStorage {
        /// Target provider.
        provider: Principal,
        /// Requested size in GB.
        size_gb: u64,
    },
    /// `get-request`
    GetRequest {
        /// Request to look up.
        request_id: RequestId,
    },
    /// `accept-request`
    AcceptRequest {
        /// Request to accept.
        request_id: RequestId,
    },
    /// `reject-request`
    RejectRequest {
        /// Request to reject.
        request_id: RequestId,
    },
    /// `release-request`
    ReleaseRequest {
        /// Request to release.
        request_id: RequestId,
    },
}

impl MarketCall {
    /// Operation name as it appears on the wire.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            Self::RegisterProvider { .. } => "register-provider",
            Self::GetProviderDetails { .. } => "get-provider-details",
            Self::RequestStorage { .. } => "request-storage",
            Self::GetRequest { .. } => "get-request",
            Self::AcceptRequest { .. } => "accept-request",
            Self::RejectRequest { .. } => "reject-request",
            Self::ReleaseRequest { .. } => "release-request",
        }
    }

    /// Returns true for calls that never change state.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self, Self::GetProviderDetails { .. } | Self::GetRequest { .. })
    }
}

/// A call together with the principal making it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketCallEnvelope {
    /// Caller identity, supplied by the runtime.
    pub caller: Principal,
    /// Operation to perform.
    pub call: MarketCall,
}

impl FromStr for MarketCallEnvelope {
    type Err = IpcError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(line)?)
    }
}

/// Error half of a call result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallError {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable description.
    pub message: String,
}

impl From<&MarketError> for CallError {
    fn from(err: &MarketError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// `ok(value)` or `err(code)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallResult {
    /// Call committed (or read succeeded) with this value.
    Ok(serde_json::Value),
    /// Call aborted; nothing changed.
    Err(CallError),
}

impl CallResult {
    /// Returns the ok value, if any.
    #[must_use]
    pub fn ok(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    /// Returns the error code, if any.
    #[must_use]
    pub fn err_code(&self) -> Option<u32> {
        match self {
            Self::Ok(_) => None,
            Self::Err(err) => Some(err.code),
        }
    }
}

/// Response to one call envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CallReceipt {
    /// Correlation id for this call.
    pub correlation_id: Uuid,
    /// Caller identity from the envelope.
    pub caller: Principal,
    /// Operation name.
    pub op: String,
    /// Outcome.
    pub result: CallResult,
}
