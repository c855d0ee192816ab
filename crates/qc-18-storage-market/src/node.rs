//! # Standalone Node
//!
//! Line-oriented runtime behind `storage-market-node`. Each well-formed
//! call envelope is mined in its own block:
//!
//! 1. advance the clock by one block
//! 2. expire stale Pending requests (when a TTL is configured)
//! 3. dispatch the call and emit one receipt line
//!
//! Blank lines are ignored. Malformed lines are logged and skipped without
//! mining a block.

use crate::adapters::{InMemoryEventLog, ManualBlockClock};
use crate::config::MarketConfig;
use crate::domain::value_objects::BlockHeight;
use crate::ipc::{CallReceipt, MarketCallEnvelope, MarketCallHandler};
use crate::ports::outbound::BlockHeightSource;
use crate::service::{create_test_service, StorageMarketService};

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

/// Service type driven by the standalone node.
pub type NodeService = StorageMarketService<ManualBlockClock, InMemoryEventLog>;

/// One market, one clock, one call handler.
pub struct MarketNode {
    service: Arc<NodeService>,
    clock: Arc<ManualBlockClock>,
    events: Arc<InMemoryEventLog>,
    handler: MarketCallHandler<NodeService>,
}

impl MarketNode {
    /// Creates a node over an empty market starting at `config.start_height`.
    pub fn new(config: MarketConfig) -> Self {
        let (service, clock, events) = create_test_service(config);
        let service = Arc::new(service);
        Self {
            handler: MarketCallHandler::new(Arc::clone(&service)),
            service,
            clock,
            events,
        }
    }

    /// The market service.
    pub fn service(&self) -> &NodeService {
        &self.service
    }

    /// The committed-transition journal.
    pub fn events(&self) -> &InMemoryEventLog {
        &self.events
    }

    /// Current block height.
    pub fn height(&self) -> BlockHeight {
        self.clock.current_height()
    }

    /// Mines one block for `line` and returns its receipt.
    ///
    /// Returns `None` for blank or malformed lines; neither advances the
    /// clock.
    pub async fn process_line(&self, line: &str) -> Option<CallReceipt> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let envelope = match line.parse::<MarketCallEnvelope>() {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(error = %err, "Skipping malformed call");
                return None;
            }
        };

        let height = self.clock.advance(1);
        let expired = self.service.expire_stale_requests().await;
        if !expired.is_empty() {
            debug!(height, expired = expired.len(), "Expired stale requests");
        }
        Some(self.handler.handle(envelope).await)
    }

    /// Reads envelopes from `input` until EOF, writing one JSON receipt per
    /// line to `output`.
    ///
    /// # Errors
    ///
    /// I/O failures on either side, or a receipt that cannot be encoded.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await.context("reading input")? {
            let Some(receipt) = self.process_line(&line).await else {
                continue;
            };
            let mut out = serde_json::to_vec(&receipt).context("encoding receipt")?;
            out.push(b'\n');
            output.write_all(&out).await.context("writing receipt")?;
            output.flush().await.context("flushing output")?;
        }
        Ok(())
    }
}
