//! Lifecycle classification of a single chain observation.
//!
//! One call performs one observation: inclusion lookup, receipt lookup,
//! then a confirmation-depth check against the chain head. Read failures
//! in the first two stages are transient by definition (the transaction
//! may simply not have propagated) and come back as `Pending`; a head
//! lookup failure after inclusion is known is escalated, because at that
//! point a silent `Pending` would misreport a transaction the caller has
//! already learned is mined.

use alloy::primitives::TxHash;

use crate::chain::reader::{ChainReader, InclusionState, ReceiptState};
use crate::chain::types::ChainResult;
use crate::watch::types::TxStatus;

/// Result of classifying one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Lifecycle status after this observation.
    pub status: TxStatus,
    /// Height anchoring the depth count. Set on the first successful
    /// observation and carried unchanged from then on.
    pub inclusion_height: Option<u64>,
}

/// Outcome of the inclusion and receipt stages, before any depth check.
enum ExecutionCheck {
    Pending,
    Succeeded,
}

/// Classify one observation of `tx_hash`.
///
/// `anchor` is the inclusion height recorded by an earlier observation,
/// if any; it is never overwritten once set. The depth bound is
/// inclusive: a head of exactly `anchor + required_depth` confirms.
///
/// A receipt reporting failed execution is treated the same as a missing
/// receipt and keeps the transaction `Pending`; a reverted transaction
/// therefore polls until the watch deadline instead of failing fast.
pub async fn classify<R: ChainReader + ?Sized>(
    reader: &R,
    tx_hash: TxHash,
    anchor: Option<u64>,
    required_depth: u64,
) -> ChainResult<Observation> {
    match check_execution(reader, tx_hash).await {
        ExecutionCheck::Pending => Ok(Observation {
            status: TxStatus::Pending,
            inclusion_height: anchor,
        }),
        ExecutionCheck::Succeeded => {
            let head = reader.current_head().await?;
            let inclusion = anchor.unwrap_or(head);
            let status = if head.saturating_sub(inclusion) >= required_depth {
                TxStatus::Confirmed
            } else {
                TxStatus::IncludedAwaitingDepth
            };
            Ok(Observation {
                status,
                inclusion_height: Some(inclusion),
            })
        }
    }
}

/// Determine whether the transaction is included with a successful
/// execution outcome. Every failure mode here folds into `Pending`.
async fn check_execution<R: ChainReader + ?Sized>(
    reader: &R,
    tx_hash: TxHash,
) -> ExecutionCheck {
    match reader.inclusion_state(tx_hash).await {
        Err(e) => {
            tracing::debug!(tx_hash = %tx_hash, error = %e, "Inclusion lookup failed, treating as pending");
            ExecutionCheck::Pending
        }
        Ok(InclusionState::NotFound) | Ok(InclusionState::Pending) => ExecutionCheck::Pending,
        Ok(InclusionState::Included) => match reader.receipt(tx_hash).await {
            Err(e) => {
                tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed, treating as pending");
                ExecutionCheck::Pending
            }
            Ok(ReceiptState::Absent) => ExecutionCheck::Pending,
            Ok(ReceiptState::Present { success: false }) => ExecutionCheck::Pending,
            Ok(ReceiptState::Present { success: true }) => ExecutionCheck::Succeeded,
        },
    }
}
