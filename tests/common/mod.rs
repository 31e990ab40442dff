//! Shared utilities for guard integration tests.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use circuit_guard::store::{ManualClock, MemoryStore};
use circuit_guard::{GuardConfig, GuardRegistry};
use tokio::sync::Semaphore;

/// Start of simulated time for every test registry.
pub const START_SECS: u64 = 1_700_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("mock error")]
pub struct MockError;

/// Registry over an in-memory store with a manual clock.
pub fn registry() -> (GuardRegistry, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_SECS));
    let store = MemoryStore::with_clock(clock.clone());
    (GuardRegistry::with_store(Arc::new(store)), clock)
}

pub fn config(threshold: u64, cb_timeout_secs: u64) -> GuardConfig {
    GuardConfig {
        window_secs: 5,
        threshold,
        request_timeout_secs: 30,
        cb_timeout_secs,
    }
}

/// A programmable dependency: counts invocations, fails while `failing` is
/// set, and holds successful calls until the gate hands out a permit.
#[derive(Debug, Clone)]
pub struct MockDependency {
    calls: Arc<AtomicU32>,
    failing: Arc<AtomicBool>,
    gate: Arc<Semaphore>,
}

impl MockDependency {
    /// Fails every call, never blocks.
    pub fn failing() -> Self {
        Self::build(true, Semaphore::MAX_PERMITS)
    }

    /// Succeeds every call, never blocks.
    pub fn succeeding() -> Self {
        Self::build(false, Semaphore::MAX_PERMITS)
    }

    /// Starts failing; once switched to success, calls wait for `release`.
    pub fn gated() -> Self {
        Self::build(true, 0)
    }

    fn build(failing: bool, permits: usize) -> Self {
        Self {
            calls: Arc::new(AtomicU32::new(0)),
            failing: Arc::new(AtomicBool::new(failing)),
            gate: Arc::new(Semaphore::new(permits)),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Let `n` held calls finish.
    pub fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    /// The wrapped operation: multiplies its arguments.
    pub fn multiply(
        &self,
    ) -> impl Fn((u64, u64)) -> std::pin::Pin<Box<dyn Future<Output = Result<u64, MockError>> + Send>>
           + Send
           + Sync
           + 'static {
        let dep = self.clone();
        move |(x, y)| {
            dep.calls.fetch_add(1, Ordering::SeqCst);
            let failing = dep.failing.load(Ordering::SeqCst);
            let gate = dep.gate.clone();
            Box::pin(async move {
                if failing {
                    return Err(MockError);
                }
                // each released permit lets exactly one call through
                gate.acquire().await.map_err(|_| MockError)?.forget();
                Ok(x * y)
            })
        }
    }
}
