//! # Driven Ports (SPI - Outbound)
//!
//! What the marketplace needs from its hosting runtime:
//! - a monotonic block height for ordering and expiry
//! - a journal that durably records each committed transition
//!
//! Caller identity is not a port: it arrives as an explicit `Principal`
//! argument on every operation.

use crate::domain::value_objects::BlockHeight;
use crate::events::MarketEvent;

/// Source of the runtime's current block height.
///
/// Heights must never decrease between calls.
pub trait BlockHeightSource: Send + Sync {
    /// Current block height.
    fn current_height(&self) -> BlockHeight;
}

/// Journal of committed marketplace transitions.
///
/// Called while the service still holds its write lock, so implementations
/// must not block on I/O. Durable adapters should buffer and flush
/// elsewhere.
pub trait MarketEventSink: Send + Sync {
    /// Record a committed transition.
    fn publish(&self, event: MarketEvent);
}

/// Sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventSink;

impl MarketEventSink for NullEventSink {
    fn publish(&self, _event: MarketEvent) {}
}
