//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! monitor. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

use crate::watch::types::{
    DEFAULT_CONFIRMATION_DEPTH, DEFAULT_POLL_INTERVAL, DEFAULT_WATCH_DEADLINE,
};

/// Root configuration for the transaction monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Watch cadence and finality settings.
    pub watch: WatchConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RpcConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs.
    #[serde(default)]
    pub failover_urls: Vec<String>,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            failover_urls: Vec::new(),
            chain_id: 1,
            rpc_timeout_secs: 10,
        }
    }
}

/// Watch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Blocks appended after inclusion before a transaction is final.
    pub confirmation_depth: u64,

    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,

    /// Overall watch deadline in seconds.
    pub deadline_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            confirmation_depth: DEFAULT_CONFIRMATION_DEPTH,
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            deadline_secs: DEFAULT_WATCH_DEADLINE.as_secs(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
