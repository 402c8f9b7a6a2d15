//! Transaction confirmation watching — the core of the crate.
//!
//! # Data Flow
//! ```text
//! WatchRequest
//!     → registry.rs (exclusive admission per tx hash)
//!     → monitor.rs (polling loop, deadline / cancel race)
//!     → classifier.rs (one chain observation → lifecycle status)
//!     → StatusMessage channel (exactly one terminal message)
//! ```
//!
//! # Design Decisions
//! - The registry is injected, not ambient; at most one watch per hash
//! - Transient read failures never surface individually, only the
//!   eventual outcome or the deadline does
//! - Timeout and cancellation share the TimedOut terminal status

pub mod classifier;
pub mod monitor;
pub mod registry;
pub mod types;

pub use classifier::{classify, Observation};
pub use monitor::{TxMonitor, WatchHandle};
pub use registry::{WatchGuard, WatchRegistry};
pub use types::{
    StatusMessage, TxStatus, WatchError, WatchRequest, DEFAULT_CONFIRMATION_DEPTH,
    DEFAULT_POLL_INTERVAL, DEFAULT_WATCH_DEADLINE,
};
