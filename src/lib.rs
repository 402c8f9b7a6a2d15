//! Confirmation monitoring for Ethereum transactions.
//!
//! Given a transaction hash, a [`watch::TxMonitor`] polls a chain until
//! the transaction is included with a successful receipt and buried under
//! the required confirmation depth, then delivers exactly one terminal
//! status message. Duplicate watches of the same hash are rejected while
//! the first is active.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ── WatchRequest ──▶ watch::TxMonitor
//!                                 │  admit (watch::WatchRegistry)
//!                                 │  poll every interval
//!                                 ▼
//!                             watch::classifier ──▶ chain::ChainReader
//!                                 │                   (alloy RpcReader
//!                                 │                    or any impl)
//!                                 ▼
//!                             StatusMessage channel ──▶ caller
//! ```
//!
//! The chain is reached only through the [`chain::ChainReader`] trait, so
//! the polling logic is testable against scripted readers and independent
//! of the transport.

// Core subsystems
pub mod chain;
pub mod watch;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;

pub use chain::{ChainError, ChainReader, RpcReader};
pub use config::MonitorConfig;
pub use watch::{StatusMessage, TxMonitor, TxStatus, WatchRegistry, WatchRequest};
