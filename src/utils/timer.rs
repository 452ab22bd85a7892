//! Timer utilities
//!
//! Wall-clock measurement of runs and individual tests. A timer keeps the
//! local start time for reports next to a monotonic clock for durations.

use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Timer for one run or one test
#[derive(Debug)]
pub struct Timer {
    label: String,
    started_at: DateTime<Local>,
    start: Instant,
}

impl Timer {
    /// Create and start a new timer
    pub fn start(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            started_at: Local::now(),
            start: Instant::now(),
        }
    }

    /// Local time at which the timer was started
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer; the duration keeps its sub-millisecond part
    pub fn stop(self) -> Duration {
        let elapsed = self.elapsed();
        tracing::debug!(
            "{} took {:.3}ms",
            self.label,
            elapsed.as_secs_f64() * 1000.0
        );
        elapsed
    }
}
