//! Timeout enforcement.
//!
//! # Responsibilities
//! - Race a running operation against its request timeout
//! - Stop waiting on timeout without cancelling the operation
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - The operation runs as its own task; on timeout its join handle is
//!   dropped, which detaches the task instead of aborting it
//! - Exactly one of {completion, timeout} settles a call

use std::time::Duration;
use tokio::task::JoinHandle;

/// How a supervised operation settled.
#[derive(Debug)]
pub enum Settled<T, E> {
    /// The operation finished before the deadline.
    Completed(Result<T, E>),
    /// The deadline passed first.
    TimedOut,
    /// The operation's task panicked.
    Panicked,
    /// The operation's task was cancelled by the runtime.
    Cancelled,
}

/// Wait for `task` for at most `timeout`.
pub async fn supervise<T, E>(task: JoinHandle<Result<T, E>>, timeout: Duration) -> Settled<T, E> {
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => Settled::Completed(result),
        Ok(Err(e)) if e.is_panic() => Settled::Panicked,
        Ok(Err(_)) => Settled::Cancelled,
        Err(_) => Settled::TimedOut,
    }
}
