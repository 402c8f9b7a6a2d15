//! Watch-specific types and error definitions.

use std::time::Duration;

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;

/// Confirmation depth suitable for a public, high-latency chain.
pub const DEFAULT_CONFIRMATION_DEPTH: u64 = 3;

/// Interval between two polls of the same transaction.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// How long a watch keeps polling before giving up.
pub const DEFAULT_WATCH_DEADLINE: Duration = Duration::from_secs(2 * 60 * 60);

/// Errors that can occur when starting or ending a watch.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatchError {
    /// A watch for this transaction is already active.
    #[error("transaction {0} is already being watched")]
    AlreadyWatched(TxHash),

    /// Release was requested for a transaction that has no active watch.
    #[error("transaction {0} is not being watched")]
    NotWatched(TxHash),
}

/// Lifecycle state of one watched transaction at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// No observation yet.
    Unknown,
    /// Not yet included in a block, or inclusion could not be determined.
    Pending,
    /// Included with a successful outcome, waiting for confirmation depth.
    IncludedAwaitingDepth,
    /// Included, successful, and buried under the required depth. Terminal.
    Confirmed,
    /// The deadline elapsed (or the watch was cancelled) first. Terminal.
    TimedOut,
    /// The chain-read capability failed after inclusion was known. Terminal.
    InfrastructureError,
}

impl TxStatus {
    /// Whether this status ends the watch.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TxStatus::Confirmed | TxStatus::TimedOut | TxStatus::InfrastructureError
        )
    }
}

impl std::fmt::Display for TxStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TxStatus::Unknown => "unknown",
            TxStatus::Pending => "pending",
            TxStatus::IncludedAwaitingDepth => "included_awaiting_depth",
            TxStatus::Confirmed => "confirmed",
            TxStatus::TimedOut => "timed_out",
            TxStatus::InfrastructureError => "infrastructure_error",
        };
        f.write_str(s)
    }
}

/// Message sent to the caller over the watch channel.
///
/// Every watch delivers exactly one message with a terminal status;
/// intermediate messages are informational and may be dropped under
/// backpressure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    /// The watched transaction.
    pub tx_hash: TxHash,
    /// Status at the time of emission.
    pub status: TxStatus,
    /// Detail for negative terminal statuses and rejected admissions.
    pub error: Option<String>,
}

/// Parameters for one watch.
#[derive(Debug, Clone)]
pub struct WatchRequest {
    /// Hash of the transaction to monitor.
    pub tx_hash: TxHash,
    /// Blocks that must be appended after inclusion before the
    /// transaction counts as confirmed. Zero confirms on inclusion.
    pub required_depth: u64,
    /// Time between polls.
    pub poll_interval: Duration,
    /// Overall deadline for the watch.
    pub deadline: Duration,
}

impl WatchRequest {
    /// A request with the public-chain defaults.
    pub fn new(tx_hash: TxHash) -> Self {
        Self {
            tx_hash,
            required_depth: DEFAULT_CONFIRMATION_DEPTH,
            poll_interval: DEFAULT_POLL_INTERVAL,
            deadline: DEFAULT_WATCH_DEADLINE,
        }
    }
}
