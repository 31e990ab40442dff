//! Guard status definitions.
//!
//! # States
//! - Closed: normal operation, calls pass through and failures are counted
//! - Open: operation assumed down, calls fail fast
//! - HalfOpen: a single probe call tests whether the operation recovered
//!
//! # State Transitions
//! ```text
//! Closed   → Open:     failures in window >= threshold
//! Open     → HalfOpen: seconds since transition > cb_timeout (checked at call time)
//! HalfOpen → Closed:   probe call succeeds
//! HalfOpen → Open:     probe call fails or times out
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a single guard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GuardStatus {
    #[default]
    Closed,
    Open,
    HalfOpen,
}

impl GuardStatus {
    /// Stable uppercase label, also used in log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardStatus::Closed => "CLOSED",
            GuardStatus::Open => "OPEN",
            GuardStatus::HalfOpen => "HALF_OPEN",
        }
    }
}

impl fmt::Display for GuardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status change performed by the policy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: GuardStatus,
    pub to: GuardStatus,
}

impl Transition {
    pub fn new(from: GuardStatus, to: GuardStatus) -> Self {
        Self { from, to }
    }

    /// True when the guard started blocking calls.
    pub fn is_trip(&self) -> bool {
        self.to == GuardStatus::Open
    }
}
