//! # In-Memory Event Log
//!
//! `MarketEventSink` that keeps every committed event in order. Used by
//! tests and by the standalone binary in place of the runtime's journal.

use crate::events::MarketEvent;
use crate::ports::outbound::MarketEventSink;
use parking_lot::Mutex;
use tracing::trace;

/// Ordered, append-only event log.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<MarketEvent>>,
}

impl InMemoryEventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<MarketEvent> {
        self.events.lock().clone()
    }

    /// Removes and returns all recorded events.
    pub fn drain(&self) -> Vec<MarketEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl MarketEventSink for InMemoryEventLog {
    fn publish(&self, event: MarketEvent) {
        trace!(event = event.name(), height = event.block_height(), "Journaled market event");
        self.events.lock().push(event);
    }
}
