//! `std::time` backed external handler.
//!
//! Only available when the `std` feature is enabled.

use std::time::Instant;

use super::{ExternalHandler, IntervalCallback};
use crate::prelude::{IndexMap, index_map_new};

struct Interval {
    period_ms: u64,
    next_due_ms: u64,
    callback: IntervalCallback,
}

/// Interval table driven by a monotonic clock.
///
/// Intervals fire only when the host polls them through
/// [`ExternalHandler::take_due_intervals`] (usually via
/// `Avm::run_due_intervals` once per frame).
pub struct StdExternalHandler {
    /// Reference instant for `get_time`
    epoch: Instant,
    next_id: u32,
    intervals: IndexMap<u32, Interval>,
}

impl StdExternalHandler {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            next_id: 1,
            intervals: index_map_new(),
        }
    }

    /// Number of scheduled intervals
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }
}

impl Default for StdExternalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ExternalHandler for StdExternalHandler {
    fn set_interval(&mut self, interval_ms: u32, callback: IntervalCallback) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        let period_ms = interval_ms as u64;
        self.intervals.insert(
            id,
            Interval {
                period_ms,
                next_due_ms: self.get_time() + period_ms,
                callback,
            },
        );
        id
    }

    fn clear_interval(&mut self, id: u32) {
        self.intervals.shift_remove(&id);
    }

    fn get_time(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn take_due_intervals(&mut self) -> Vec<IntervalCallback> {
        let now = self.get_time();
        let mut due = Vec::new();
        for interval in self.intervals.values_mut() {
            if interval.next_due_ms <= now {
                due.push(interval.callback.clone());
                interval.next_due_ms = now + interval.period_ms.max(1);
            }
        }
        due
    }
}
