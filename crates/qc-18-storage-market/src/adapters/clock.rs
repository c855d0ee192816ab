//! # Block Clock Adapter
//!
//! Manually driven block height, for tests and for the standalone binary
//! where every call advances the height by one.

use crate::domain::value_objects::BlockHeight;
use crate::ports::outbound::BlockHeightSource;
use std::sync::atomic::{AtomicU64, Ordering};

/// Block height advanced explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualBlockClock {
    height: AtomicU64,
}

impl ManualBlockClock {
    /// Creates a clock starting at `height`.
    #[must_use]
    pub fn new(height: BlockHeight) -> Self {
        Self {
            height: AtomicU64::new(height),
        }
    }

    /// Mines `blocks` blocks and returns the new height.
    pub fn advance(&self, blocks: u64) -> BlockHeight {
        self.height.fetch_add(blocks, Ordering::SeqCst) + blocks
    }

    /// Moves the clock forward to `height`. Never moves it backwards.
    pub fn set(&self, height: BlockHeight) {
        self.height.fetch_max(height, Ordering::SeqCst);
    }
}

impl BlockHeightSource for ManualBlockClock {
    fn current_height(&self) -> BlockHeight {
        self.height.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance() {
        let clock = ManualBlockClock::new(10);
        assert_eq!(clock.current_height(), 10);
        assert_eq!(clock.advance(5), 15);
        assert_eq!(clock.current_height(), 15);
    }

    #[test]
    fn test_set_is_monotonic() {
        let clock = ManualBlockClock::default();
        clock.set(7);
        clock.set(3);
        assert_eq!(clock.current_height(), 7);
    }
}
