//! Data models for OpenTripPlanner testing
//!
//! Test input, planner responses and normalized results.

mod plan_response;
mod test_case;
mod test_result;

pub use plan_response::{Itinerary, ItineraryLeg, PlanResponse};
pub use test_case::{TestCase, TestId, DATE_TIME_FORMAT};
#[cfg(test)]
pub use test_case::{Place, TimeType};
pub use test_result::{ErrorResult, ItineraryResult, Leg, TestResult};
