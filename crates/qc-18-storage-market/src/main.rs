//! # Storage Market Node
//!
//! Standalone runtime for the storage marketplace. Reads one JSON call
//! envelope per line from stdin and writes one JSON receipt per line to
//! stdout. Every call is mined in its own block. Logs go to stderr.
//!
//! ```text
//! $ echo '{"caller":"0x01..","call":{"op":"register-provider","price_per_gb":200,"available_space":1000}}' \
//!     | storage-market-node
//! ```

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use qc_18_storage_market::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = MarketConfig::from_env();

    // Initialize logging
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    config.validate().context("invalid market configuration")?;

    info!("===========================================");
    info!("  Quantum-Chain Storage Market v{}", qc_18_storage_market::VERSION);
    info!("===========================================");

    let node = MarketNode::new(config);
    node.run(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await?;

    let stats = node.service().stats().await;
    info!(
        height = node.height(),
        providers = stats.providers_registered,
        requests = stats.requests_created,
        accepted = stats.requests_accepted,
        expired = stats.requests_expired,
        failed = stats.failed_calls,
        "Input closed, shutting down"
    );
    Ok(())
}
