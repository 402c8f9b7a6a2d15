//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, URLs parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the parsed config

use crate::config::schema::MonitorConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Field path, e.g. "watch.poll_interval_ms".
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.rpc.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError {
            field: "rpc.rpc_url".into(),
            message: format!("not a valid URL: '{}'", config.rpc.rpc_url),
        });
    }
    for (i, url) in config.rpc.failover_urls.iter().enumerate() {
        if url.parse::<url::Url>().is_err() {
            errors.push(ValidationError {
                field: format!("rpc.failover_urls[{}]", i),
                message: format!("not a valid URL: '{}'", url),
            });
        }
    }
    if config.rpc.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "rpc.rpc_timeout_secs".into(),
            message: "must be positive".into(),
        });
    }
    if config.watch.poll_interval_ms == 0 {
        errors.push(ValidationError {
            field: "watch.poll_interval_ms".into(),
            message: "must be positive".into(),
        });
    }
    if config.watch.deadline_secs == 0 {
        errors.push(ValidationError {
            field: "watch.deadline_secs".into(),
            message: "must be positive".into(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
