//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Field aliases accept the short names (`window`, `request_timeout`,
//! `cb_timeout`) used by older guard configurations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Effective configuration of a single guard.
///
/// Fixed at first registration; later registrations under the same name
/// keep this snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Width in seconds of the sliding failure-count window.
    #[serde(alias = "window")]
    pub window_secs: u64,

    /// Failures within the window required to open the breaker.
    pub threshold: u64,

    /// Seconds before an unanswered call is treated as failed.
    #[serde(alias = "request_timeout")]
    pub request_timeout_secs: u64,

    /// Seconds the breaker stays open before a probe is allowed.
    #[serde(alias = "cb_timeout")]
    pub cb_timeout_secs: u64,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            window_secs: 5,
            threshold: 10,
            request_timeout_secs: 30,
            cb_timeout_secs: 60,
        }
    }
}

impl GuardConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Root configuration: defaults plus per-guard overrides.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Applied to any guard without its own entry.
    pub defaults: GuardConfig,

    /// Per-guard configuration keyed by guard name.
    pub guards: BTreeMap<String, GuardConfig>,
}

impl RegistryConfig {
    /// Configuration for `name`, falling back to the defaults.
    pub fn config_for(&self, name: &str) -> GuardConfig {
        self.guards.get(name).copied().unwrap_or(self.defaults)
    }
}
