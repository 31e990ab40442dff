//! Circuit breaker around an unreliable operation.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: operation assumed down, calls fail fast
//! - Half-Open: testing if the operation recovered
//!
//! # Call Path
//! ```text
//! execute(args)
//!     → admission (store update: maybe Open → HalfOpen + claim probe)
//!     → rejected? resolve BreakerOpen now, operation never runs
//!     → spawn operation, supervise against request_timeout
//!     → first of {completion, timeout} → process_result → caller
//! ```
//!
//! # Design Decisions
//! - Per-name breaker state lives in the shared store, not in the handle
//! - Fail fast in Open state (no waiting for timeout)
//! - Single probe in Half-Open (prevents hammering a recovering operation)
//! - `execute` never blocks; the outcome is delivered through `Execution`

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::GuardConfig;
use crate::policy::engine;
use crate::policy::state::{GuardStatus, Transition};
use crate::resilience::execution::Execution;
use crate::resilience::timeouts::{supervise, Settled};
use crate::resilience::types::{GuardError, GuardResult};
use crate::store::{transact, StateStore, StoreResult};

/// Handle to a registered guard and the operation it wraps.
///
/// Cheap to clone; every clone shares the guard's state through the store.
pub struct Guard<F> {
    name: Arc<str>,
    operation: Arc<F>,
    store: Arc<dyn StateStore>,
}

impl<F> Clone for Guard<F> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            operation: self.operation.clone(),
            store: self.store.clone(),
        }
    }
}

impl<F> std::fmt::Debug for Guard<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("name", &self.name)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl<F> Guard<F> {
    pub(crate) fn new(name: Arc<str>, operation: F, store: Arc<dyn StateStore>) -> Self {
        Self {
            name,
            operation: Arc::new(operation),
            store,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current status. No side effects.
    pub fn status(&self) -> StoreResult<GuardStatus> {
        self.store.status(&self.name)
    }

    /// Failures inside the current window.
    pub fn error_count(&self) -> StoreResult<u64> {
        self.store.failures_in_window(&self.name)
    }

    /// Dispatch one call through the guard.
    ///
    /// Returns as soon as the call is admitted and spawned, or rejected.
    /// Awaiting the returned [`Execution`] yields the outcome. Must be called
    /// from within a tokio runtime.
    pub fn execute<A, Fut, T, E>(&self, args: A) -> GuardResult<Execution<T, E>, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|_| GuardError::NoRuntime)?;

        let (admission, config) = transact(&*self.store, &self.name, |state, now| {
            (engine::admit(state, now), state.config())
        })?;

        if let Some(transition) = admission.transition {
            log_transition(&self.name, transition, None, &config);
        }

        let call_id = Uuid::new_v4();
        let status = admission.status_at_call_time;
        let (execution, tx) = Execution::new(self.name.clone(), call_id, status);

        if !admission.admitted {
            tracing::debug!(guard = %self.name, %call_id, status = %status, "Call rejected");
            let _ = tx.send(Err(GuardError::BreakerOpen {
                name: self.name.to_string(),
                status,
            }));
            return Ok(execution);
        }

        let span = tracing::debug_span!("guarded_call", guard = %self.name, %call_id, status = %status);

        // a panic while building the future must still settle the admission
        let operation = &self.operation;
        let future = match panic::catch_unwind(AssertUnwindSafe(|| (**operation)(args))) {
            Ok(future) => future,
            Err(_) => {
                let outcome = settle(self.store.as_ref(), &self.name, Settled::Panicked, status, &config);
                let _ = tx.send(outcome);
                return Ok(execution);
            }
        };
        let task = runtime.spawn(future.instrument(span.clone()));

        let store = self.store.clone();
        let name = self.name.clone();
        runtime.spawn(
            async move {
                let settled = supervise(task, config.request_timeout()).await;
                let outcome = settle(store.as_ref(), &name, settled, status, &config);
                // caller may have stopped listening
                let _ = tx.send(outcome);
            }
            .instrument(span),
        );

        Ok(execution)
    }

    /// Dispatch one call and wait for its outcome.
    pub async fn call<A, Fut, T, E>(&self, args: A) -> GuardResult<T, E>
    where
        F: Fn(A) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.execute(args)?.await
    }
}

/// Turn a settled call into the caller's outcome and feed it to the policy.
fn settle<T, E>(
    store: &dyn StateStore,
    name: &str,
    settled: Settled<T, E>,
    status_at_call_time: GuardStatus,
    config: &GuardConfig,
) -> GuardResult<T, E> {
    let outcome = match settled {
        Settled::Completed(Ok(value)) => Ok(value),
        Settled::Completed(Err(e)) => Err(GuardError::Operation(e)),
        Settled::TimedOut => {
            tracing::debug!(guard = %name, timeout_secs = config.request_timeout_secs, "Call timed out");
            Err(GuardError::Timeout {
                name: name.to_string(),
                timeout_secs: config.request_timeout_secs,
            })
        }
        Settled::Panicked => {
            tracing::warn!(guard = %name, "Guarded operation panicked");
            Err(GuardError::Panicked { name: name.to_string() })
        }
        Settled::Cancelled => Err(GuardError::Abandoned { name: name.to_string() }),
    };

    let failed = outcome.is_err();
    let processed = transact(store, name, |state, now| {
        let transition = engine::process_result(state, failed, status_at_call_time, now);
        (transition, state.failures_in_window(now))
    });

    match processed {
        Ok((Some(transition), failures)) => log_transition(name, transition, Some(failures), config),
        Ok((None, _)) => {}
        Err(e) => {
            tracing::error!(guard = %name, error = %e, "Failed to record call outcome");
            return Err(GuardError::Store(e));
        }
    }

    outcome
}

fn log_transition(name: &str, transition: Transition, failures: Option<u64>, config: &GuardConfig) {
    let Transition { from, to } = transition;
    match (from, to) {
        (GuardStatus::Closed, GuardStatus::Open) => tracing::warn!(
            guard = %name,
            failures = failures.unwrap_or_default(),
            threshold = config.threshold,
            window_secs = config.window_secs,
            "Failure threshold reached, guard opened"
        ),
        (GuardStatus::HalfOpen, GuardStatus::Open) => tracing::warn!(
            guard = %name,
            cb_timeout_secs = config.cb_timeout_secs,
            "Probe failed, guard reopened"
        ),
        (GuardStatus::Open, GuardStatus::HalfOpen) => tracing::info!(
            guard = %name,
            "Cooldown elapsed, admitting probe"
        ),
        _ => tracing::info!(guard = %name, from = %from, to = %to, "Guard status changed"),
    }
}
