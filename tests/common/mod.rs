//! Shared utilities for integration testing: a scripted chain reader.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::primitives::TxHash;
use async_trait::async_trait;
use txwatch::chain::reader::{ChainReader, InclusionState, ReceiptState};
use txwatch::chain::types::{ChainError, ChainResult};

/// Scripted reader whose answers tests can change mid-watch.
///
/// Every `current_head` call advances the head by `head_step`, simulating
/// block production at polling speed.
pub struct ScriptedReader {
    head: AtomicU64,
    head_step: u64,
    fail_head: AtomicBool,
    inclusion: Mutex<InclusionState>,
    receipt: Mutex<ReceiptState>,
}

impl ScriptedReader {
    /// A reader for a transaction that is already included and
    /// successful, with the head at `head` and advancing by `head_step`
    /// per observation.
    pub fn included_success(head: u64, head_step: u64) -> Self {
        Self {
            head: AtomicU64::new(head),
            head_step,
            fail_head: AtomicBool::new(false),
            inclusion: Mutex::new(InclusionState::Included),
            receipt: Mutex::new(ReceiptState::Present { success: true }),
        }
    }

    /// A reader that never finds the transaction.
    pub fn never_found() -> Self {
        Self {
            head: AtomicU64::new(0),
            head_step: 0,
            fail_head: AtomicBool::new(false),
            inclusion: Mutex::new(InclusionState::NotFound),
            receipt: Mutex::new(ReceiptState::Absent),
        }
    }

    pub fn set_inclusion(&self, state: InclusionState) {
        *self.inclusion.lock().unwrap() = state;
    }

    pub fn set_receipt(&self, state: ReceiptState) {
        *self.receipt.lock().unwrap() = state;
    }

    pub fn set_fail_head(&self, fail: bool) {
        self.fail_head.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChainReader for ScriptedReader {
    async fn current_head(&self) -> ChainResult<u64> {
        if self.fail_head.load(Ordering::SeqCst) {
            return Err(ChainError::Rpc("head lookup unavailable".into()));
        }
        Ok(self.head.fetch_add(self.head_step, Ordering::SeqCst))
    }

    async fn inclusion_state(&self, _tx_hash: TxHash) -> ChainResult<InclusionState> {
        Ok(*self.inclusion.lock().unwrap())
    }

    async fn receipt(&self, _tx_hash: TxHash) -> ChainResult<ReceiptState> {
        Ok(*self.receipt.lock().unwrap())
    }
}
