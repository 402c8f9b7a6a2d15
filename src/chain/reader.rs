//! Read-only chain capability consumed by the watch subsystem.
//!
//! The monitor never talks to a node directly; it goes through this trait
//! so tests can script observations and alternative transports can be
//! plugged in without touching the polling logic.

use alloy::primitives::TxHash;
use async_trait::async_trait;

use crate::chain::types::ChainResult;

/// Where a transaction currently stands relative to the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InclusionState {
    /// The node does not know the transaction.
    NotFound,
    /// Known to the node but not yet inside a block.
    Pending,
    /// Recorded inside a mined block.
    Included,
}

/// Post-inclusion execution record, as far as the node reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptState {
    /// No receipt available yet.
    Absent,
    /// Receipt available; `success` is the execution outcome.
    Present { success: bool },
}

/// Read-only view of a chain, scoped to what one confirmation check needs.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Height of the most recently known block.
    async fn current_head(&self) -> ChainResult<u64>;

    /// Inclusion state of a transaction.
    async fn inclusion_state(&self, tx_hash: TxHash) -> ChainResult<InclusionState>;

    /// Execution receipt of a transaction, if one exists.
    async fn receipt(&self, tx_hash: TxHash) -> ChainResult<ReceiptState>;
}
