//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (RPC URLs, chain id, timeout)
//!     → client.rs (alloy providers with failover)
//!     → reader.rs (ChainReader capability trait)
//!     → consumed by the watch subsystem, one observation per poll
//! ```
//!
//! # Design Decisions
//! - The watch subsystem depends only on the `ChainReader` trait
//! - All RPC calls have configurable timeouts
//! - Failover endpoints are tried in order on every call

pub mod client;
pub mod reader;
pub mod types;

pub use client::RpcReader;
pub use reader::{ChainReader, InclusionState, ReceiptState};
pub use types::{ChainError, ChainId};
