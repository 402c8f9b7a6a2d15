//! Exclusive admission of watches per transaction hash.
//!
//! At most one watch may be active for a given hash at any time. The table
//! is the only shared mutable state in the crate; a single mutex keeps
//! acquire/release for the same hash strictly ordered.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use alloy::primitives::TxHash;

use crate::watch::types::WatchError;

/// Table of transaction hashes with an active watch.
pub struct WatchRegistry {
    active: Mutex<HashSet<TxHash>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self {
            active: Mutex::new(HashSet::new()),
        }
    }

    /// Admit a watch for `tx_hash`.
    ///
    /// Fails with [`WatchError::AlreadyWatched`] if a watch is active, in
    /// which case the table is not mutated. The returned guard releases
    /// the entry when dropped.
    pub fn try_acquire(self: &Arc<Self>, tx_hash: TxHash) -> Result<WatchGuard, WatchError> {
        let mut active = self.active.lock().expect("watch registry mutex poisoned");
        if !active.insert(tx_hash) {
            return Err(WatchError::AlreadyWatched(tx_hash));
        }
        Ok(WatchGuard {
            registry: Arc::clone(self),
            tx_hash,
        })
    }

    /// Remove the entry for `tx_hash`.
    ///
    /// Fails with [`WatchError::NotWatched`] if no watch is active. That is
    /// an invariant violation in the caller, not a runtime condition; the
    /// guard logs it rather than panicking.
    pub fn release(&self, tx_hash: TxHash) -> Result<(), WatchError> {
        let mut active = self.active.lock().expect("watch registry mutex poisoned");
        if active.remove(&tx_hash) {
            Ok(())
        } else {
            Err(WatchError::NotWatched(tx_hash))
        }
    }

    /// Whether a watch is currently active for `tx_hash`.
    pub fn is_watched(&self, tx_hash: TxHash) -> bool {
        let active = self.active.lock().expect("watch registry mutex poisoned");
        active.contains(&tx_hash)
    }

    /// Number of active watches.
    pub fn len(&self) -> usize {
        let active = self.active.lock().expect("watch registry mutex poisoned");
        active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for WatchRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Ownership of one registry entry.
///
/// Dropping the guard releases the entry, so every exit path of a watch
/// task pairs the acquire with exactly one release.
pub struct WatchGuard {
    registry: Arc<WatchRegistry>,
    tx_hash: TxHash,
}

impl WatchGuard {
    pub fn tx_hash(&self) -> TxHash {
        self.tx_hash
    }
}

impl Drop for WatchGuard {
    fn drop(&mut self) {
        if let Err(e) = self.registry.release(self.tx_hash) {
            tracing::error!(tx_hash = %self.tx_hash, error = %e, "Watch released twice");
        }
    }
}
