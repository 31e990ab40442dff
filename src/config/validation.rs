//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window, threshold and request timeout > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - `cb_timeout_secs = 0` is allowed: the breaker probes one second after opening

use std::fmt;
use crate::config::schema::{GuardConfig, RegistryConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `guards.billing.threshold`.
    pub field: String,
    pub message: &'static str,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a single guard configuration.
pub fn validate_guard(config: &GuardConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_guard("", config, &mut errors);

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate the defaults and every per-guard entry.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_guard("defaults.", &config.defaults, &mut errors);

    for (name, guard) in &config.guards {
        if name.trim().is_empty() {
            errors.push(ValidationError {
                field: "guards".to_string(),
                message: "guard name must not be empty",
            });
        }
        check_guard(&format!("guards.{}.", name), guard, &mut errors);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_guard(prefix: &str, config: &GuardConfig, errors: &mut Vec<ValidationError>) {
    let mut reject = |field: &str, message| {
        errors.push(ValidationError {
            field: format!("{}{}", prefix, field),
            message,
        });
    };

    if config.window_secs == 0 {
        reject("window_secs", "must be at least 1 second");
    }
    if config.threshold == 0 {
        reject("threshold", "must be at least 1 failure");
    }
    if config.request_timeout_secs == 0 {
        reject("request_timeout_secs", "must be at least 1 second");
    }
}
