//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `StorageMarketApi`
//! - **Driven Ports (Outbound)**: `BlockHeightSource`, `MarketEventSink`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
