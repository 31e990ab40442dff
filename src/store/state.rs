//! Per-guard state record.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::config::GuardConfig;
use crate::policy::state::{GuardStatus, Transition};

/// Everything the store keeps for one guard name.
///
/// All methods take `now` in whole seconds from the owning store's clock;
/// the record itself never reads time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardState {
    status: GuardStatus,
    last_transition_secs: u64,
    probe_calls: u64,
    /// second → failures observed in that second
    failure_buckets: BTreeMap<u64, u64>,
    config: GuardConfig,
}

impl GuardState {
    /// A fresh, closed record.
    pub fn new(config: GuardConfig, now: u64) -> Self {
        Self {
            status: GuardStatus::Closed,
            last_transition_secs: now,
            probe_calls: 0,
            failure_buckets: BTreeMap::new(),
            config,
        }
    }

    pub fn status(&self) -> GuardStatus {
        self.status
    }

    pub fn config(&self) -> GuardConfig {
        self.config
    }

    pub fn last_transition_secs(&self) -> u64 {
        self.last_transition_secs
    }

    /// Move to `status`, stamping the transition time.
    ///
    /// Writing the current status is a no-op and returns `None`. Leaving
    /// HalfOpen for Closed clears the probe counter.
    pub fn set_status(&mut self, status: GuardStatus, now: u64) -> Option<Transition> {
        if self.status == status {
            return None;
        }

        let transition = Transition::new(self.status, status);
        if transition.from == GuardStatus::HalfOpen && transition.to == GuardStatus::Closed {
            self.probe_calls = 0;
        }

        self.status = status;
        self.last_transition_secs = now;
        Some(transition)
    }

    /// Count a failure in the bucket for `now`.
    pub fn record_failure(&mut self, now: u64) {
        *self.failure_buckets.entry(now).or_insert(0) += 1;
    }

    /// Drop buckets older than the window, then sum the rest.
    pub fn failures_in_window(&mut self, now: u64) -> u64 {
        self.purge_stale(now);
        self.failure_buckets.values().sum()
    }

    fn purge_stale(&mut self, now: u64) {
        let cutoff = now.saturating_sub(self.config.window_secs);
        // keeps every bucket at or after the cutoff
        self.failure_buckets = self.failure_buckets.split_off(&cutoff);
    }

    pub fn increment_probe_calls(&mut self) -> u64 {
        self.probe_calls += 1;
        self.probe_calls
    }

    pub fn probe_calls(&self) -> u64 {
        self.probe_calls
    }

    pub fn reset_probe_calls(&mut self) {
        self.probe_calls = 0;
    }

    pub fn seconds_since_transition(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_transition_secs)
    }

    #[cfg(test)]
    fn bucket_count(&self) -> usize {
        self.failure_buckets.len()
    }
}
