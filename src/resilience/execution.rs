//! Pending outcome of a guarded call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use futures_util::ready;
use tokio::sync::oneshot;
use uuid::Uuid;
use crate::policy::state::GuardStatus;
use crate::resilience::types::{GuardError, GuardResult};

/// Handle returned by [`Guard::execute`](crate::resilience::Guard::execute).
///
/// Carries the status observed when the call was made and resolves, when
/// awaited, to the call's single outcome. Rejected calls resolve immediately.
/// Dropping an `Execution` only stops listening; the operation and the
/// outcome bookkeeping still run.
#[derive(Debug)]
pub struct Execution<T, E> {
    name: Arc<str>,
    call_id: Uuid,
    status_at_call_time: GuardStatus,
    outcome: oneshot::Receiver<GuardResult<T, E>>,
}

impl<T, E> Execution<T, E> {
    pub(crate) fn new(
        name: Arc<str>,
        call_id: Uuid,
        status_at_call_time: GuardStatus,
    ) -> (Self, oneshot::Sender<GuardResult<T, E>>) {
        let (tx, outcome) = oneshot::channel();
        let execution = Self {
            name,
            call_id,
            status_at_call_time,
            outcome,
        };
        (execution, tx)
    }

    /// Status of the guard when this call was admitted or rejected.
    pub fn status_at_call_time(&self) -> GuardStatus {
        self.status_at_call_time
    }

    /// Correlation id, also recorded on the call's tracing span.
    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T, E> Future for Execution<T, E> {
    type Output = GuardResult<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        let outcome = ready!(Pin::new(&mut this.outcome).poll(cx));

        Poll::Ready(outcome.unwrap_or_else(|_| {
            Err(GuardError::Abandoned {
                name: this.name.to_string(),
            })
        }))
    }
}
