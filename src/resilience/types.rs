//! Call outcome errors.

use thiserror::Error;
use crate::policy::state::GuardStatus;
use crate::store::StoreError;

/// Errors delivered to the caller of a guarded operation.
///
/// `E` is the wrapped operation's own error type, surfaced unchanged in
/// [`GuardError::Operation`].
#[derive(Debug, Error)]
pub enum GuardError<E> {
    /// Call rejected without running the operation: the guard is open, or
    /// half-open with its probe slot taken.
    #[error("circuit breaker '{name}' rejected the call while {status}")]
    BreakerOpen { name: String, status: GuardStatus },

    /// No outcome arrived within the request timeout. Counted as a failure.
    #[error("call to '{name}' timed out after {timeout_secs} seconds")]
    Timeout { name: String, timeout_secs: u64 },

    /// The wrapped operation returned an error.
    #[error("operation failed: {0}")]
    Operation(#[source] E),

    /// The wrapped operation panicked. Counted as a failure.
    #[error("operation guarded by '{name}' panicked")]
    Panicked { name: String },

    /// The state store could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// `execute` was called outside a tokio runtime.
    #[error("no tokio runtime available to run the operation")]
    NoRuntime,

    /// The call was dropped before settling, e.g. during runtime shutdown.
    #[error("call to '{name}' was abandoned before it settled")]
    Abandoned { name: String },
}

impl<E> GuardError<E> {
    /// True for calls the guard refused to run.
    pub fn is_rejection(&self) -> bool {
        matches!(self, GuardError::BreakerOpen { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GuardError::Timeout { .. })
    }

    /// The wrapped operation's error, if that is what failed.
    pub fn operation_error(&self) -> Option<&E> {
        match self {
            GuardError::Operation(e) => Some(e),
            _ => None,
        }
    }
}

/// Result type for guarded calls.
pub type GuardResult<T, E> = Result<T, GuardError<E>>;
