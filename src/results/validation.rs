//! Run validation
//!
//! Tracks per-test wall-clock durations and error counts across a run and
//! renders the pass/fail verdict. The accumulator moves through three
//! states: [`ValidationAccumulator`] (not started), [`RunningValidation`]
//! and the finalized [`RunStatistics`].

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::models::{TestId, TestResult, DATE_TIME_FORMAT};
use crate::utils::Timer;

/// Misuse of the per-test bookkeeping
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Test {0} ended but no test was started")]
    NotStarted(TestId),

    #[error("Test {ended} ended while test {started} was in progress")]
    Mismatched { started: TestId, ended: TestId },
}

/// Aggregate verdict over a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "VALIDATION_SUCCESS")]
    Success,
    #[serde(rename = "VALIDATION_ERROR")]
    Error,
}

impl Verdict {
    pub fn is_success(self) -> bool {
        matches!(self, Verdict::Success)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success => write!(f, "VALIDATION_SUCCESS"),
            Verdict::Error => write!(f, "VALIDATION_ERROR"),
        }
    }
}

/// Wall-clock timing of one test
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestTiming {
    pub id: TestId,
    pub start_time: String,
    pub end_time: String,
    pub duration_ms: u64,
    pub is_error: bool,
}

/// Validation accumulator before the run has begun
#[derive(Clone, Debug)]
pub struct ValidationAccumulator {
    max_duration: Duration,
}

impl ValidationAccumulator {
    /// Accumulator allowing tests to take at most `max_duration`
    pub fn new(max_duration: Duration) -> Self {
        Self { max_duration }
    }

    /// Record the run start and reset all counters
    pub fn begin_run(self) -> RunningValidation {
        RunningValidation {
            max_duration: self.max_duration,
            run_timer: Timer::start("run"),
            current: None,
            tests: Vec::new(),
            error_count: 0,
            max_test_duration: Duration::ZERO,
        }
    }
}

/// Validation accumulator while tests are running
#[derive(Debug)]
pub struct RunningValidation {
    max_duration: Duration,
    run_timer: Timer,
    current: Option<(TestId, Timer)>,
    tests: Vec<TestTiming>,
    error_count: usize,
    max_test_duration: Duration,
}

impl RunningValidation {
    /// Record the start of a test
    pub fn begin_test(&mut self, id: &TestId) {
        self.current = Some((id.clone(), Timer::start(format!("Test {id}"))));
    }

    /// Record the end of the test in progress
    pub fn end_test(&mut self, id: &TestId, result: &TestResult) -> Result<(), ValidationError> {
        let (started_id, timer) = self
            .current
            .take()
            .ok_or_else(|| ValidationError::NotStarted(id.clone()))?;

        if &started_id != id {
            return Err(ValidationError::Mismatched {
                started: started_id,
                ended: id.clone(),
            });
        }

        let started_at = timer.started_at();
        self.record(id.clone(), started_at, timer.stop(), result.is_error());
        Ok(())
    }

    /// Fold one finished test into the counters
    pub(crate) fn record(
        &mut self,
        id: TestId,
        started_at: DateTime<Local>,
        duration: Duration,
        is_error: bool,
    ) {
        if duration > self.max_test_duration {
            self.max_test_duration = duration;
        }
        if is_error {
            self.error_count += 1;
        }

        let ended_at = started_at
            + chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        self.tests.push(TestTiming {
            id,
            start_time: format_local(&started_at),
            end_time: format_local(&ended_at),
            duration_ms: duration.as_millis() as u64,
            is_error,
        });
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn max_test_duration(&self) -> Duration {
        self.max_test_duration
    }

    /// Record the run end and freeze the statistics
    pub fn end_run(self) -> RunStatistics {
        let started_at = self.run_timer.started_at();
        let duration = self.run_timer.stop();
        RunStatistics {
            start_time: format_local(&started_at),
            end_time: format_local(&Local::now()),
            duration_ms: duration.as_millis() as u64,
            test_count: self.tests.len(),
            error_count: self.error_count,
            max_test_duration_ms: self.max_test_duration.as_millis() as u64,
            max_allowed_duration_ms: self.max_duration.as_millis() as u64,
            within_duration_limit: self.max_test_duration <= self.max_duration,
            tests: self.tests,
        }
    }
}

/// Finalized statistics of a run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatistics {
    pub start_time: String,
    pub end_time: String,
    pub duration_ms: u64,
    pub test_count: usize,
    pub error_count: usize,
    pub max_test_duration_ms: u64,
    pub max_allowed_duration_ms: u64,
    /// Exact comparison; the millisecond fields above are truncated
    pub within_duration_limit: bool,
    pub tests: Vec<TestTiming>,
}

impl RunStatistics {
    /// Success when no test failed and none took longer than allowed
    pub fn verdict(&self) -> Verdict {
        if self.error_count == 0 && self.within_duration_limit {
            Verdict::Success
        } else {
            Verdict::Error
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} tests in {}ms | Errors: {} | Max duration: {}ms (limit {}ms) | {}",
            self.test_count,
            self.duration_ms,
            self.error_count,
            self.max_test_duration_ms,
            self.max_allowed_duration_ms,
            self.verdict()
        )
    }
}

fn format_local(time: &DateTime<Local>) -> String {
    time.format(DATE_TIME_FORMAT).to_string()
}
