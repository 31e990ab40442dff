//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to a guarded operation:
//!     → registry.rs (name → shared state in the store)
//!     → circuit_breaker.rs (admission gate, dispatch)
//!     → timeouts.rs (race completion against request_timeout)
//!     → execution.rs (single outcome delivered to the caller)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every guarded call has a deadline
//! - No retries: a failed call is reported, never re-invoked
//! - Circuit breaker prevents cascading failures
//! - The registry is an explicit object, not a process global

pub mod circuit_breaker;
pub mod execution;
pub mod registry;
pub mod timeouts;
pub mod types;

pub use circuit_breaker::Guard;
pub use execution::Execution;
pub use registry::{GuardRegistry, GuardSnapshot};
pub use types::{GuardError, GuardResult};
