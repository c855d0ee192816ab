//! # Call Handler
//!
//! Dispatches call envelopes to a `StorageMarketApi` and turns the outcome
//! into a receipt. Market errors become `err(code)` receipts; only a
//! malformed envelope is an `IpcError`.

use super::payloads::{CallError, CallReceipt, CallResult, MarketCall, MarketCallEnvelope};
use crate::errors::{IpcError, MarketError};
use crate::ports::inbound::StorageMarketApi;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Dispatcher from call envelopes to the market API.
pub struct MarketCallHandler<T: StorageMarketApi> {
    api: Arc<T>,
}

impl<T: StorageMarketApi> MarketCallHandler<T> {
    /// Create a new handler.
    pub fn new(api: Arc<T>) -> Self {
        Self { api }
    }

    /// Parse one JSON line and handle it.
    ///
    /// # Errors
    ///
    /// `MalformedEnvelope` if the line is not a valid envelope.
    pub async fn handle_line(&self, line: &str) -> Result<CallReceipt, IpcError> {
        let envelope = line.parse::<MarketCallEnvelope>()?;
        Ok(self.handle(envelope).await)
    }

    /// Handle one call envelope.
    #[instrument(skip(self, envelope), fields(caller = %envelope.caller, op = envelope.call.op()))]
    pub async fn handle(&self, envelope: MarketCallEnvelope) -> CallReceipt {
        let correlation_id = Uuid::new_v4();
        let MarketCallEnvelope { caller, call } = envelope;
        let op = call.op();

        let result = match call {
            MarketCall::RegisterProvider {
                price_per_gb,
                available_space,
            } => to_result(
                self.api
                    .register_provider(caller, price_per_gb, available_space)
                    .await,
            ),
            MarketCall::GetProviderDetails { principal } => {
                ok(&self.api.get_provider_details(principal).await)
            }
            MarketCall::RequestStorage { provider, size_gb } => {
                to_result(self.api.request_storage(caller, provider, size_gb).await)
            }
            MarketCall::GetRequest { request_id } => ok(&self.api.get_request(request_id).await),
            MarketCall::AcceptRequest { request_id } => {
                to_result(self.api.accept_request(caller, request_id).await)
            }
            MarketCall::RejectRequest { request_id } => {
                to_result(self.api.reject_request(caller, request_id).await)
            }
            MarketCall::ReleaseRequest { request_id } => {
                to_result(self.api.release_request(caller, request_id).await)
            }
        };

        debug!(%correlation_id, code = ?result.err_code(), "Call handled");
        CallReceipt {
            correlation_id,
            caller,
            op: op.to_string(),
            result,
        }
    }
}

fn ok<V: Serialize>(value: &V) -> CallResult {
    // Views and ids are plain data; serialization to Value cannot fail.
    CallResult::Ok(serde_json::to_value(value).unwrap_or(serde_json::Value::Null))
}

fn to_result<V: Serialize>(result: Result<V, MarketError>) -> CallResult {
    match result {
        Ok(value) => ok(&value),
        Err(err) => CallResult::Err(CallError::from(&err)),
    }
}
