//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Guards produce:
//!     → structured tracing events (registration, transitions, rejections)
//!     → a `guarded_call` span per admitted call, tagged with its call id
//!
//! Consumers:
//!     → logging.rs installs a fmt subscriber filtered by RUST_LOG
//!     → GuardRegistry::snapshot exposes raw counters on demand
//! ```
//!
//! # Design Decisions
//! - The library only emits events; installing a subscriber is the application's call
//! - No metrics exporter: counters are read through snapshots

pub mod logging;

pub use logging::init_logging;
