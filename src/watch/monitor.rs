//! Polling state machine for one watched transaction.
//!
//! # Responsibilities
//! - Admit the watch through the registry (duplicates are rejected up front)
//! - Poll the classifier on a fixed cadence, first poll immediate
//! - Race every wait against the deadline and the cancellation signal
//! - Deliver exactly one terminal message per watch
//!
//! # Design Decisions
//! - Each watch runs as its own tokio task; watches share no state
//!   beyond the registry and the reader
//! - In-flight chain reads are abandoned on cancellation, not awaited
//! - Intermediate status changes are informational and may be dropped
//!   under backpressure; the terminal send is awaited

use std::sync::Arc;

use alloy::primitives::TxHash;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, sleep, MissedTickBehavior};

use crate::chain::reader::ChainReader;
use crate::lifecycle::Shutdown;
use crate::watch::classifier::classify;
use crate::watch::registry::{WatchGuard, WatchRegistry};
use crate::watch::types::{StatusMessage, TxStatus, WatchRequest};

/// Capacity of the per-watch message channel. Holds the terminal message
/// plus a burst of informational updates.
const WATCH_CHANNEL_CAPACITY: usize = 16;

/// Handle to an active (or rejected) watch.
///
/// Receives status messages and can cancel the watch. Dropping the handle
/// also cancels: a watch nobody can observe has no reason to keep polling.
pub struct WatchHandle {
    tx_hash: TxHash,
    rx: mpsc::Receiver<StatusMessage>,
    cancel: Shutdown,
}

impl WatchHandle {
    /// The transaction this handle watches.
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }

    /// Receive the next status message. Returns `None` once the watch has
    /// delivered its terminal message and ended.
    pub async fn recv(&mut self) -> Option<StatusMessage> {
        self.rx.recv().await
    }

    /// Cancel the watch. The terminal message will be `TimedOut`.
    pub fn cancel(&self) {
        self.cancel.trigger();
    }

    /// Wait for the terminal message, discarding informational ones.
    ///
    /// Returns `None` only if the watch task disappeared without a
    /// terminal message, which the monitor guarantees not to happen.
    pub async fn wait(mut self) -> Option<StatusMessage> {
        while let Some(msg) = self.rx.recv().await {
            if msg.status.is_terminal() || msg.error.is_some() {
                return Some(msg);
            }
        }
        None
    }
}

/// Watch orchestrator. Cheap to clone via the shared reader and registry.
#[derive(Clone)]
pub struct TxMonitor {
    reader: Arc<dyn ChainReader>,
    registry: Arc<WatchRegistry>,
}

impl TxMonitor {
    /// Create a monitor over an injected reader and registry.
    pub fn new(reader: Arc<dyn ChainReader>, registry: Arc<WatchRegistry>) -> Self {
        Self { reader, registry }
    }

    /// The registry this monitor admits watches through.
    pub fn registry(&self) -> &Arc<WatchRegistry> {
        &self.registry
    }

    /// Start watching a transaction.
    ///
    /// If a watch for the same hash is already active, the returned handle
    /// yields a single message carrying the admission error and no polling
    /// happens; the active watch is unaffected. Otherwise a background
    /// task polls until a terminal state, the deadline, or cancellation.
    pub fn watch(&self, request: WatchRequest) -> WatchHandle {
        let (msg_tx, msg_rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
        let cancel = Shutdown::new();
        let tx_hash = request.tx_hash;

        match self.registry.try_acquire(tx_hash) {
            Err(e) => {
                tracing::warn!(tx_hash = %tx_hash, "Watch rejected: already active");
                // Capacity is non-zero and the channel is fresh, so this
                // cannot fail to enqueue.
                let _ = msg_tx.try_send(StatusMessage {
                    tx_hash,
                    status: TxStatus::Unknown,
                    error: Some(e.to_string()),
                });
            }
            Ok(guard) => {
                tracing::info!(
                    tx_hash = %tx_hash,
                    required_depth = request.required_depth,
                    deadline_secs = request.deadline.as_secs(),
                    "Watch started"
                );
                let reader = Arc::clone(&self.reader);
                let cancel_rx = cancel.subscribe();
                tokio::spawn(run_watch(reader, guard, request, msg_tx, cancel_rx));
            }
        }

        WatchHandle {
            tx_hash,
            rx: msg_rx,
            cancel,
        }
    }
}

/// The polling loop of one admitted watch.
///
/// Holds the registry guard for its whole lifetime; every return path
/// drops it, releasing the entry exactly once.
async fn run_watch(
    reader: Arc<dyn ChainReader>,
    guard: WatchGuard,
    request: WatchRequest,
    messages: mpsc::Sender<StatusMessage>,
    mut cancel: broadcast::Receiver<()>,
) {
    let tx_hash = guard.tx_hash();
    let deadline = sleep(request.deadline);
    tokio::pin!(deadline);

    let mut ticker = interval(request.poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut anchor: Option<u64> = None;
    let mut last_status = TxStatus::Unknown;

    let (status, error) = loop {
        // The first tick completes immediately; later ones pace the polls.
        tokio::select! {
            _ = &mut deadline => {
                break (
                    TxStatus::TimedOut,
                    Some(format!(
                        "watch timed out after {:?} with status {}",
                        request.deadline, last_status
                    )),
                );
            }
            _ = cancel.recv() => {
                break (
                    TxStatus::TimedOut,
                    Some(format!("watch cancelled with status {}", last_status)),
                );
            }
            _ = ticker.tick() => {}
        }

        let observed = tokio::select! {
            _ = &mut deadline => {
                break (
                    TxStatus::TimedOut,
                    Some(format!(
                        "watch timed out after {:?} with status {}",
                        request.deadline, last_status
                    )),
                );
            }
            _ = cancel.recv() => {
                break (
                    TxStatus::TimedOut,
                    Some(format!("watch cancelled with status {}", last_status)),
                );
            }
            result = classify(reader.as_ref(), tx_hash, anchor, request.required_depth) => result,
        };

        match observed {
            Err(e) => break (TxStatus::InfrastructureError, Some(e.to_string())),
            Ok(obs) => {
                anchor = obs.inclusion_height;
                if obs.status == TxStatus::Confirmed {
                    break (TxStatus::Confirmed, None);
                }
                if obs.status != last_status {
                    tracing::debug!(
                        tx_hash = %tx_hash,
                        status = %obs.status,
                        inclusion_height = ?anchor,
                        "Watch status changed"
                    );
                    let _ = messages.try_send(StatusMessage {
                        tx_hash,
                        status: obs.status,
                        error: None,
                    });
                    last_status = obs.status;
                }
            }
        }
    };

    match status {
        TxStatus::Confirmed => {
            tracing::info!(tx_hash = %tx_hash, inclusion_height = ?anchor, "Watch confirmed")
        }
        TxStatus::TimedOut => tracing::warn!(tx_hash = %tx_hash, "Watch timed out"),
        _ => tracing::error!(tx_hash = %tx_hash, error = ?error, "Watch failed"),
    }

    // Awaited so the terminal message is never lost to backpressure. If
    // the handle is gone the send fails and the watch just ends.
    let _ = messages
        .send(StatusMessage {
            tx_hash,
            status,
            error,
        })
        .await;
}
