//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! watch / chain subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!
//! Consumers:
//!     → stdout (fmt layer), filterable via RUST_LOG
//! ```

pub mod logging;
