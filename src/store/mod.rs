//! Guard state storage subsystem.
//!
//! # Data Flow
//! ```text
//! GuardRegistry::register
//!     → StateStore::create (atomic per name, first registration wins)
//!
//! Guard::execute / outcome processing
//!     → StateStore::update (one closure per decision, under the name's lock)
//!     → policy::engine reads and writes the GuardState inside the closure
//! ```
//!
//! # Design Decisions
//! - Backends implement one mutation primitive (`update`); every finer
//!   operation is derived from it so a new backend cannot get them subtly wrong
//! - Time comes from the store's `Clock`, in whole seconds
//! - Stale failure buckets are purged lazily on read, never by a sweeper
//! - Store operations never block on I/O and are O(window) or better

pub mod clock;
pub mod memory;
pub mod state;

use std::fmt::Debug;
use thiserror::Error;
use crate::config::GuardConfig;
use crate::policy::state::{GuardStatus, Transition};

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::MemoryStore;
pub use state::GuardState;

/// Errors raised by a state store backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record exists for the name.
    #[error("unknown guard '{0}'")]
    UnknownGuard(String),

    /// A writer panicked while holding the record's lock.
    #[error("state for guard '{0}' is poisoned")]
    Poisoned(String),

    /// Backend-specific failure.
    #[error("state store backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Swappable storage for guard state.
///
/// Every call is atomic with respect to other calls on the same name.
/// Names are independent of each other.
pub trait StateStore: Debug + Send + Sync {
    /// Create a closed record for `name` unless one exists.
    ///
    /// Returns `true` when this call created the record. Concurrent first
    /// registrations create exactly one.
    fn create(&self, name: &str, config: GuardConfig) -> bool;

    fn exists(&self, name: &str) -> bool;

    /// Names of every record, in no particular order.
    fn names(&self) -> Vec<String>;

    /// Run `f` against the record for `name` while holding its lock.
    ///
    /// `f` receives the record and the current second.
    fn update(&self, name: &str, f: &mut dyn FnMut(&mut GuardState, u64)) -> StoreResult<()>;

    fn config(&self, name: &str) -> StoreResult<GuardConfig> {
        transact(self, name, |state, _| state.config())
    }

    fn status(&self, name: &str) -> StoreResult<GuardStatus> {
        transact(self, name, |state, _| state.status())
    }

    /// Write a status; returns the transition when it was a genuine change.
    fn set_status(&self, name: &str, status: GuardStatus) -> StoreResult<Option<Transition>> {
        transact(self, name, |state, now| state.set_status(status, now))
    }

    fn record_failure(&self, name: &str) -> StoreResult<()> {
        transact(self, name, |state, now| state.record_failure(now))
    }

    fn failures_in_window(&self, name: &str) -> StoreResult<u64> {
        transact(self, name, |state, now| state.failures_in_window(now))
    }

    fn increment_probe_calls(&self, name: &str) -> StoreResult<u64> {
        transact(self, name, |state, _| state.increment_probe_calls())
    }

    fn probe_calls(&self, name: &str) -> StoreResult<u64> {
        transact(self, name, |state, _| state.probe_calls())
    }

    fn reset_probe_calls(&self, name: &str) -> StoreResult<()> {
        transact(self, name, |state, _| state.reset_probe_calls())
    }

    fn seconds_since_transition(&self, name: &str) -> StoreResult<u64> {
        transact(self, name, |state, now| state.seconds_since_transition(now))
    }
}

/// Run `f` through [`StateStore::update`] and hand back its result.
pub fn transact<S, R>(
    store: &S,
    name: &str,
    f: impl FnOnce(&mut GuardState, u64) -> R,
) -> StoreResult<R>
where
    S: StateStore + ?Sized,
{
    let mut f = Some(f);
    let mut output = None;

    store.update(name, &mut |state: &mut GuardState, now: u64| {
        if let Some(f) = f.take() {
            output = Some(f(state, now));
        }
    })?;

    output.ok_or_else(|| StoreError::Backend(format!("update for '{}' never ran", name)))
}
