//! Planner response normalization
//!
//! Reshapes a raw planner response into a [`TestResult`].

use chrono::{Local, TimeZone};
use std::fmt;
use thiserror::Error;
use tracing::debug;

use crate::models::{
    ErrorResult, Itinerary, ItineraryLeg, ItineraryResult, Leg, PlanResponse, TestId, TestResult,
    DATE_TIME_FORMAT,
};

/// Malformed planner responses; these abort the run
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("Invalid JSON from planner for test {id}: {source}")]
    InvalidJson {
        id: TestId,
        #[source]
        source: serde_json::Error,
    },

    #[error("Planner response for test {0} has neither a plan nor an error")]
    MissingPlan(TestId),

    #[error("Planner response for test {0} contains no itineraries")]
    NoItineraries(TestId),

    #[error("Timestamp {0}ms is out of range")]
    TimestampOutOfRange(i64),
}

/// Format a millisecond epoch timestamp in the given time zone
pub fn format_timestamp<Tz>(millis: i64, tz: &Tz) -> Result<String, NormalizeError>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    tz.timestamp_millis_opt(millis)
        .single()
        .map(|t| t.format(DATE_TIME_FORMAT).to_string())
        .ok_or(NormalizeError::TimestampOutOfRange(millis))
}

/// Converts planner responses into result records
#[derive(Clone, Debug)]
pub struct ResponseNormalizer<Tz: TimeZone = Local> {
    tz: Tz,
}

impl ResponseNormalizer<Local> {
    /// Normalizer formatting timestamps in the local time zone
    pub fn local() -> Self {
        Self::new(Local)
    }
}

impl<Tz> ResponseNormalizer<Tz>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Normalize a raw body; `None` or blank means the call produced nothing
    pub fn normalize_body(
        &self,
        id: &TestId,
        body: Option<&str>,
    ) -> Result<TestResult, NormalizeError> {
        let response = match body.map(str::trim).filter(|b| !b.is_empty()) {
            Some(body) => Some(serde_json::from_str::<PlanResponse>(body).map_err(|source| {
                NormalizeError::InvalidJson {
                    id: id.clone(),
                    source,
                }
            })?),
            None => None,
        };
        self.normalize(id, response)
    }

    pub fn normalize(
        &self,
        id: &TestId,
        response: Option<PlanResponse>,
    ) -> Result<TestResult, NormalizeError> {
        let Some(response) = response else {
            return Ok(TestResult::Error(ErrorResult::no_response(id.clone())));
        };

        if let Some(error) = &response.error {
            debug!("Planner error {:?} for test {}", error.id, id);
            return Ok(TestResult::Error(ErrorResult {
                id: id.clone(),
                computation_time: response.total_time(),
                timed_out: response.timed_out(),
                error: error.msg.clone(),
            }));
        }

        let plan = response
            .plan
            .as_ref()
            .ok_or_else(|| NormalizeError::MissingPlan(id.clone()))?;
        let itinerary = plan
            .itineraries
            .first()
            .ok_or_else(|| NormalizeError::NoItineraries(id.clone()))?;

        self.itinerary_result(id, &response, itinerary)
            .map(TestResult::Itinerary)
    }

    fn itinerary_result(
        &self,
        id: &TestId,
        response: &PlanResponse,
        itinerary: &Itinerary,
    ) -> Result<ItineraryResult, NormalizeError> {
        let legs = itinerary
            .legs
            .iter()
            .map(|leg| self.leg(leg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ItineraryResult {
            id: id.clone(),
            computation_time: response.total_time(),
            timed_out: response.timed_out(),
            transfers: itinerary.transfers,
            departure_time: format_timestamp(itinerary.start_time, &self.tz)?,
            arrival_time: format_timestamp(itinerary.end_time, &self.tz)?,
            duration: itinerary.duration / 60.0,
            legs,
        })
    }

    fn leg(&self, leg: &ItineraryLeg) -> Result<Leg, NormalizeError> {
        Ok(Leg {
            departure_time: format_timestamp(leg.start_time, &self.tz)?,
            arrival_time: format_timestamp(leg.end_time, &self.tz)?,
            line: leg_label(leg),
        })
    }
}

/// `walk` for walking legs, `<route> (<headsign>)` otherwise
pub fn leg_label(leg: &ItineraryLeg) -> String {
    if leg.is_walk() {
        "walk".to_string()
    } else {
        format!(
            "{} ({})",
            leg.route.as_deref().unwrap_or_default(),
            leg.headsign.as_deref().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    // 2024-01-01T07:00:00Z
    const START_MS: i64 = 1_704_092_400_000;

    fn utc() -> ResponseNormalizer<Utc> {
        ResponseNormalizer::new(Utc)
    }

    fn success_body(duration_secs: u64) -> String {
        json!({
            "plan": {
                "itineraries": [{
                    "duration": duration_secs,
                    "startTime": START_MS,
                    "endTime": START_MS + duration_secs as i64 * 1000,
                    "transfers": 1,
                    "legs": [
                        {"mode": "WALK", "startTime": START_MS, "endTime": START_MS + 240_000},
                        {"mode": "TRAM", "route": "5", "headsign": "Amstelveen Binnenhof",
                         "startTime": START_MS + 240_000, "endTime": START_MS + duration_secs as i64 * 1000}
                    ]
                }]
            },
            "error": null,
            "debug": {"totalTime": 42, "timedOut": false}
        })
        .to_string()
    }

    #[test]
    fn test_format_timestamp_fixed_zones() {
        assert_eq!(format_timestamp(START_MS, &Utc).unwrap(), "2024-01-01T07:00:00");

        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(format_timestamp(START_MS, &cet).unwrap(), "2024-01-01T08:00:00");

        // sub-second part is dropped
        assert_eq!(
            format_timestamp(START_MS + 999, &Utc).unwrap(),
            "2024-01-01T07:00:00"
        );
    }

    #[test]
    fn test_success_normalization() {
        let id = TestId::Number(1);
        let result = utc().normalize_body(&id, Some(success_body(1800).as_str())).unwrap();

        let TestResult::Itinerary(itinerary) = result else {
            panic!("Expected itinerary result");
        };
        assert_eq!(itinerary.id, id);
        assert_eq!(itinerary.duration, 30.0);
        assert_eq!(itinerary.transfers, 1);
        assert_eq!(itinerary.computation_time, Some(42));
        assert_eq!(itinerary.timed_out, Some(false));
        assert_eq!(itinerary.departure_time, "2024-01-01T07:00:00");
        assert_eq!(itinerary.arrival_time, "2024-01-01T07:30:00");
        assert_eq!(itinerary.legs.len(), 2);
        assert_eq!(itinerary.legs[0].line, "walk");
        assert_eq!(itinerary.legs[0].arrival_time, "2024-01-01T07:04:00");
        assert_eq!(itinerary.legs[1].line, "5 (Amstelveen Binnenhof)");
    }

    #[test]
    fn test_duration_is_minutes() {
        let id = TestId::Number(1);
        for secs in [60, 90, 1800, 5425] {
            let result = utc().normalize_body(&id, Some(success_body(secs).as_str())).unwrap();
            match result {
                TestResult::Itinerary(r) => assert_eq!(r.duration, secs as f64 / 60.0),
                TestResult::Error(_) => panic!("Expected itinerary result"),
            }
        }
    }

    #[test]
    fn test_error_object_wins() {
        let body = json!({
            "plan": {"itineraries": []},
            "error": {"id": 404, "msg": "No trip found. There may be no transit service within the maximum specified distance or at the specified time, or your start or end point might not be safely accessible."},
            "debug": {"totalTime": 1500, "timedOut": true}
        })
        .to_string();

        let result = utc()
            .normalize_body(&TestId::Number(2), Some(body.as_str()))
            .unwrap();
        assert!(result.is_error());

        let TestResult::Error(error) = result else {
            panic!("Expected error result");
        };
        assert!(error.error.unwrap().starts_with("No trip found."));
        assert_eq!(error.computation_time, Some(1500));
        assert_eq!(error.timed_out, Some(true));
    }

    #[test]
    fn test_empty_error_object_is_error() {
        let body = r#"{"error": {}}"#;
        let result = utc().normalize_body(&TestId::Number(3), Some(body)).unwrap();
        assert!(result.is_error());
    }

    #[test]
    fn test_empty_body_is_error() {
        let id = TestId::Number(4);
        for body in [None, Some(""), Some("  \n")] {
            let result = utc().normalize_body(&id, body).unwrap();
            assert_eq!(
                result,
                TestResult::Error(ErrorResult::no_response(id.clone()))
            );
        }
    }

    #[test]
    fn test_malformed_responses_are_fatal() {
        let id = TestId::Number(5);
        assert!(matches!(
            utc().normalize_body(&id, Some("<html>502 Bad Gateway</html>")),
            Err(NormalizeError::InvalidJson { .. })
        ));
        assert!(matches!(
            utc().normalize_body(&id, Some(r#"{"error": null}"#)),
            Err(NormalizeError::MissingPlan(_))
        ));
        assert!(matches!(
            utc().normalize_body(&id, Some(r#"{"plan": {"itineraries": []}}"#)),
            Err(NormalizeError::NoItineraries(_))
        ));
    }

    #[test]
    fn test_leg_labels() {
        let walk: ItineraryLeg = serde_json::from_value(json!({
            "mode": "WALK", "route": "ignored", "headsign": "ignored",
            "startTime": START_MS, "endTime": START_MS
        }))
        .unwrap();
        assert_eq!(leg_label(&walk), "walk");

        let rail: ItineraryLeg = serde_json::from_value(json!({
            "mode": "RAIL", "route": "IC", "headsign": "Den Haag Centraal",
            "startTime": START_MS, "endTime": START_MS
        }))
        .unwrap();
        assert_eq!(leg_label(&rail), "IC (Den Haag Centraal)");

        let bus: ItineraryLeg = serde_json::from_value(json!({
            "mode": "BUS", "route": "N81",
            "startTime": START_MS, "endTime": START_MS
        }))
        .unwrap();
        assert_eq!(leg_label(&bus), "N81 ()");
    }
}
