//! Guard registration and introspection.

use std::sync::Arc;
use serde::Serialize;
use crate::config::validation::validate_guard;
use crate::config::{ConfigError, GuardConfig, RegistryConfig};
use crate::policy::state::GuardStatus;
use crate::resilience::circuit_breaker::Guard;
use crate::store::{transact, MemoryStore, StateStore, StoreResult};

/// Point-in-time view of one guard's raw counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardSnapshot {
    pub name: String,
    pub status: GuardStatus,
    pub failures_in_window: u64,
    pub probe_calls: u64,
    pub seconds_since_transition: u64,
    pub config: GuardConfig,
}

/// Application-owned registry of guards, backed by one shared store.
///
/// Clones share the same store. Guards with different names are fully
/// independent; handles registered under the same name share one state.
#[derive(Debug, Clone)]
pub struct GuardRegistry {
    store: Arc<dyn StateStore>,
}

impl GuardRegistry {
    /// Create a registry over an in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Create a registry over any store backend.
    pub fn with_store(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Wrap `operation` in the guard called `name`.
    ///
    /// The first registration of a name fixes its config; later ones get a
    /// handle to the existing state and their `config` is ignored. The
    /// supplied config is validated either way.
    pub fn register<F>(
        &self,
        name: &str,
        operation: F,
        config: GuardConfig,
    ) -> Result<Guard<F>, ConfigError> {
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        validate_guard(&config).map_err(ConfigError::Validation)?;

        if self.store.create(name, config) {
            tracing::info!(
                guard = %name,
                window_secs = config.window_secs,
                threshold = config.threshold,
                request_timeout_secs = config.request_timeout_secs,
                cb_timeout_secs = config.cb_timeout_secs,
                "Guard registered"
            );
        } else {
            match self.store.config(name) {
                Ok(existing) if existing != config => tracing::warn!(
                    guard = %name,
                    "Guard already registered; keeping its original configuration"
                ),
                _ => tracing::debug!(guard = %name, "Reusing registered guard"),
            }
        }

        Ok(Guard::new(Arc::from(name), operation, self.store.clone()))
    }

    /// Register `name` with its entry from a loaded configuration.
    pub fn register_from<F>(
        &self,
        name: &str,
        operation: F,
        config: &RegistryConfig,
    ) -> Result<Guard<F>, ConfigError> {
        self.register(name, operation, config.config_for(name))
    }

    pub fn status(&self, name: &str) -> StoreResult<GuardStatus> {
        self.store.status(name)
    }

    /// Failures recorded for `name` inside its window.
    pub fn error_count(&self, name: &str) -> StoreResult<u64> {
        self.store.failures_in_window(name)
    }

    pub fn snapshot(&self, name: &str) -> StoreResult<GuardSnapshot> {
        transact(&*self.store, name, |state, now| GuardSnapshot {
            name: name.to_string(),
            status: state.status(),
            failures_in_window: state.failures_in_window(now),
            probe_calls: state.probe_calls(),
            seconds_since_transition: state.seconds_since_transition(now),
            config: state.config(),
        })
    }

    /// Registered guard names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names = self.store.names();
        names.sort();
        names
    }
}

impl Default for GuardRegistry {
    fn default() -> Self {
        Self::new()
    }
}
