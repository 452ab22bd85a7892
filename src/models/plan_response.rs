//! OpenTripPlanner plan response
//!
//! Typed view of the JSON body returned by the planning endpoint. Only the
//! fields the runner reads are modelled; everything else is ignored.

use serde::Deserialize;

/// Top-level planner response
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlanResponse {
    #[serde(default)]
    pub plan: Option<Plan>,

    /// Non-null when the planner could not produce a plan
    #[serde(default)]
    pub error: Option<PlanError>,

    #[serde(default)]
    pub debug: Option<DebugOutput>,
}

impl PlanResponse {
    pub fn total_time(&self) -> Option<u64> {
        self.debug.as_ref().and_then(|d| d.total_time)
    }

    pub fn timed_out(&self) -> Option<bool> {
        self.debug.as_ref().and_then(|d| d.timed_out)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
}

/// One proposed journey
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Journey duration in seconds
    pub duration: f64,
    /// Departure, milliseconds since the epoch
    pub start_time: i64,
    /// Arrival, milliseconds since the epoch
    pub end_time: i64,
    pub transfers: u32,
    #[serde(default)]
    pub legs: Vec<ItineraryLeg>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryLeg {
    pub mode: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub headsign: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
}

impl ItineraryLeg {
    pub fn is_walk(&self) -> bool {
        self.mode == "WALK"
    }
}

/// Planner-reported failure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlanError {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Planner self-reported timing
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugOutput {
    /// Total computation time in milliseconds
    #[serde(default)]
    pub total_time: Option<u64>,
    #[serde(default)]
    pub timed_out: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_response() {
        let body = json!({
            "plan": {
                "itineraries": [{
                    "duration": 1800,
                    "startTime": 1_704_092_400_000_i64,
                    "endTime": 1_704_094_200_000_i64,
                    "transfers": 1,
                    "walkDistance": 312.5,
                    "legs": [
                        {"mode": "WALK", "startTime": 1_704_092_400_000_i64, "endTime": 1_704_092_700_000_i64},
                        {"mode": "BUS", "route": "22", "headsign": "Station Sloterdijk",
                         "startTime": 1_704_092_700_000_i64, "endTime": 1_704_094_200_000_i64}
                    ]
                }]
            },
            "error": null,
            "debug": {"totalTime": 87, "timedOut": false}
        });

        let response: PlanResponse = serde_json::from_value(body).unwrap();
        assert!(response.error.is_none());
        assert_eq!(response.total_time(), Some(87));
        assert_eq!(response.timed_out(), Some(false));

        let plan = response.plan.unwrap();
        let itinerary = &plan.itineraries[0];
        assert_eq!(itinerary.duration, 1800.0);
        assert_eq!(itinerary.legs.len(), 2);
        assert!(itinerary.legs[0].is_walk());
        assert_eq!(itinerary.legs[1].route.as_deref(), Some("22"));
    }

    #[test]
    fn test_error_response() {
        let body = json!({
            "plan": null,
            "error": {"id": 404, "msg": "No trip found.", "noPath": true}
        });

        let response: PlanResponse = serde_json::from_value(body).unwrap();
        assert!(response.debug.is_none());
        assert_eq!(response.total_time(), None);

        let error = response.error.as_ref().unwrap();
        assert_eq!(error.id, Some(404));
        assert_eq!(error.msg.as_deref(), Some("No trip found."));
    }
}
