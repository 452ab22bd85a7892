//! Test result models
//!
//! Normalized per-test records written to the result array.

use serde::{Serialize, Serializer};
use std::fmt;

use super::TestId;

/// One segment of a journey
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Leg {
    pub departure_time: String,
    pub arrival_time: String,
    /// `walk`, or `<route> (<headsign>)` for transit legs
    pub line: String,
}

/// Result of a test the planner answered with an itinerary
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryResult {
    pub id: TestId,
    #[serde(rename = "OTPTotalComputationTime")]
    pub computation_time: Option<u64>,
    #[serde(rename = "OTPTimedout")]
    pub timed_out: Option<bool>,
    pub transfers: u32,
    pub departure_time: String,
    pub arrival_time: String,
    /// Journey duration in minutes
    pub duration: f64,
    pub legs: Vec<Leg>,
}

/// Result of a test that failed at the planner or in transport
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorResult {
    pub id: TestId,
    #[serde(rename = "OTPTotalComputationTime")]
    pub computation_time: Option<u64>,
    #[serde(rename = "OTPTimedout")]
    pub timed_out: Option<bool>,
    pub error: Option<String>,
}

impl ErrorResult {
    /// Error result for a test that never got a response
    pub fn no_response(id: TestId) -> Self {
        Self {
            id,
            computation_time: None,
            timed_out: None,
            error: None,
        }
    }
}

/// Outcome of a single test case
#[derive(Clone, Debug, PartialEq)]
pub enum TestResult {
    Itinerary(ItineraryResult),
    Error(ErrorResult),
}

impl TestResult {
    pub fn id(&self) -> &TestId {
        match self {
            TestResult::Itinerary(r) => &r.id,
            TestResult::Error(r) => &r.id,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TestResult::Error(_))
    }
}

impl Serialize for TestResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Flagged<'a, T> {
            #[serde(rename = "isError")]
            is_error: bool,
            #[serde(flatten)]
            inner: &'a T,
        }

        match self {
            TestResult::Itinerary(r) => Flagged {
                is_error: false,
                inner: r,
            }
            .serialize(serializer),
            TestResult::Error(r) => Flagged {
                is_error: true,
                inner: r,
            }
            .serialize(serializer),
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Itinerary(r) => write!(
                f,
                "✓ Test {} - {:.1} min, {} transfers ({} → {})",
                r.id, r.duration, r.transfers, r.departure_time, r.arrival_time
            ),
            TestResult::Error(r) => write!(
                f,
                "✗ Test {} - {}",
                r.id,
                r.error.as_deref().unwrap_or("no response")
            ),
        }
    }
}
