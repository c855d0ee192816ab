//! # Market Configuration
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `QC_MARKET_MAX_REQUEST_GB` | unlimited | Largest accepted `size_gb` |
//! | `QC_MARKET_PENDING_TTL_BLOCKS` | unset (no expiry) | Blocks before a Pending request expires; `0`/`off` also disable it |
//! | `QC_MARKET_START_HEIGHT` | `0` | Initial block height for the standalone node |
//! | `QC_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter |
//!
//! Pending requests never expire unless a TTL is configured. In the
//! environment `0` means "disabled"; a `MarketConfig` built in code with
//! `Some(0)` is refused by `validate()`.

use crate::errors::ConfigError;
use std::env;

/// Storage marketplace configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    /// Largest `size_gb` accepted by `request-storage`.
    pub max_request_size_gb: u64,
    /// Blocks after which a Pending request is expired. `None` (the default)
    /// disables expiry.
    pub pending_request_ttl_blocks: Option<u64>,
    /// Initial block height for the standalone node.
    pub start_height: u64,
    /// Log filter (trace, debug, info, warn, error or a full directive).
    pub log_level: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            max_request_size_gb: u64::MAX,
            pending_request_ttl_blocks: None,
            start_height: 0,
            log_level: "info".to_string(),
        }
    }
}

impl MarketConfig {
    /// Create configuration from environment variables.
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_request_size_gb: lookup("QC_MARKET_MAX_REQUEST_GB")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_request_size_gb),

            pending_request_ttl_blocks: match lookup("QC_MARKET_PENDING_TTL_BLOCKS") {
                Some(v) if v == "0" || v.eq_ignore_ascii_case("off") => None,
                Some(v) => v.parse().ok().or(defaults.pending_request_ttl_blocks),
                None => defaults.pending_request_ttl_blocks,
            },

            start_height: lookup("QC_MARKET_START_HEIGHT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.start_height),

            log_level: lookup("QC_LOG_LEVEL")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or(defaults.log_level),
        }
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// `ZeroPendingTtl` for `Some(0)`, `ZeroMaxRequestSize` for a zero
    /// maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pending_request_ttl_blocks == Some(0) {
            return Err(ConfigError::ZeroPendingTtl);
        }
        if self.max_request_size_gb == 0 {
            return Err(ConfigError::ZeroMaxRequestSize);
        }
        Ok(())
    }
}
