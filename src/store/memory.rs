//! In-memory state store.

use std::sync::{Arc, Mutex};
use dashmap::DashMap;
use crate::config::GuardConfig;
use crate::store::clock::{Clock, SystemClock};
use crate::store::state::GuardState;
use crate::store::{StateStore, StoreError, StoreResult};

/// Process-local store: one mutex per guard name.
///
/// The map's shard locks are only held long enough to clone the entry
/// handle, so a slow update on one name never stalls another.
#[derive(Debug)]
pub struct MemoryStore {
    states: DashMap<String, Arc<Mutex<GuardState>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create a store driven by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create a store driven by `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            states: DashMap::new(),
            clock,
        }
    }

    fn entry(&self, name: &str) -> StoreResult<Arc<Mutex<GuardState>>> {
        self.states
            .get(name)
            .map(|r| r.value().clone())
            .ok_or_else(|| StoreError::UnknownGuard(name.to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for MemoryStore {
    fn create(&self, name: &str, config: GuardConfig) -> bool {
        let mut created = false;
        self.states.entry(name.to_string()).or_insert_with(|| {
            created = true;
            Arc::new(Mutex::new(GuardState::new(config, self.clock.now_secs())))
        });
        created
    }

    fn exists(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        self.states.iter().map(|r| r.key().clone()).collect()
    }

    fn update(&self, name: &str, f: &mut dyn FnMut(&mut GuardState, u64)) -> StoreResult<()> {
        let entry = self.entry(name)?;
        let mut state = entry
            .lock()
            .map_err(|_| StoreError::Poisoned(name.to_string()))?;

        f(&mut *state, self.clock.now_secs());
        Ok(())
    }
}
