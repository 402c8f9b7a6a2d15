//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Caller cancel / SIGINT
//!     → shutdown.rs (broadcast signal)
//!     → watch tasks observe the signal and terminate with TimedOut
//! ```
//!
//! # Design Decisions
//! - One signal per watch; process-level shutdown fans out by cloning
//! - Tasks race the signal against their timers, never poll for it

pub mod shutdown;

pub use shutdown::Shutdown;
