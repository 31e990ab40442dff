//! Guard policy subsystem.
//!
//! # Data Flow
//! ```text
//! Call arrives:
//!     → engine::admit (Open timed out? promote to HalfOpen + claim probe)
//!     → Admission { status_at_call_time, admitted }
//!
//! Call settles (result, error or timeout):
//!     → engine::process_result
//!     → state.rs transition, if the table allows one
//! ```
//!
//! # Design Decisions
//! - No timers: Open → HalfOpen is evaluated lazily when a call arrives
//! - Exactly one probe in flight while HalfOpen
//! - The engine is pure; locking belongs to the store

pub mod engine;
pub mod state;

pub use engine::{admit, process_result, Admission};
pub use state::{GuardStatus, Transition};
