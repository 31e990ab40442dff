//! Circuit guards for unreliable async operations.
//!
//! # Architecture Overview
//!
//! ```text
//!     caller
//!       │ execute(args)
//!       ▼
//!  ┌──────────────────────┐   admit / process_result   ┌──────────────┐
//!  │ resilience           │ ─────────────────────────▶ │ policy       │
//!  │  Guard + timeouts    │                            │  engine      │
//!  └──────────┬───────────┘                            └──────┬───────┘
//!             │ spawn + supervise                             │ runs inside
//!             ▼                                               ▼ update()
//!     wrapped operation                               ┌──────────────┐
//!                                                     │ store        │
//!                                                     │  per-name    │
//!                                                     │  GuardState  │
//!                                                     └──────────────┘
//! ```
//!
//! A guard tracks failures per second over a sliding window. Reaching the
//! threshold opens it; after `cb_timeout` the next call is let through as a
//! single probe whose outcome closes or reopens it.
//!
//! ```no_run
//! use circuit_guard::{GuardConfig, GuardRegistry};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = GuardRegistry::new();
//! let guard = registry.register(
//!     "multiply",
//!     |(x, y): (u64, u64)| async move { Ok::<_, std::io::Error>(x * y) },
//!     GuardConfig::default(),
//! )?;
//!
//! let execution = guard.execute((3, 5))?;
//! println!("status at call time: {}", execution.status_at_call_time());
//! assert_eq!(execution.await?, 15);
//! # Ok(())
//! # }
//! ```

// Core subsystems
pub mod config;
pub mod policy;
pub mod store;

// Call path
pub mod resilience;

// Cross-cutting concerns
pub mod observability;

pub use config::{ConfigError, GuardConfig, RegistryConfig};
pub use policy::GuardStatus;
pub use resilience::{Execution, Guard, GuardError, GuardRegistry, GuardResult, GuardSnapshot};
pub use store::{MemoryStore, StateStore, StoreError};
