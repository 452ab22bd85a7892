//! Planning request builder
//!
//! Turns a test case plus the shared planner options into a query URL.

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Url;

use crate::config::PlannerOptions;
use crate::models::TestCase;

/// Read-only view of one planning query
#[derive(Debug)]
pub struct PlanningRequest<'a> {
    test: &'a TestCase,
    options: &'a PlannerOptions,
    time: NaiveDateTime,
}

impl<'a> PlanningRequest<'a> {
    /// Build the request; `today` replaces the test date but keeps its clock time
    pub fn new(test: &'a TestCase, options: &'a PlannerOptions, today: Option<NaiveDate>) -> Self {
        let time = match today {
            Some(date) => date.and_time(test.time.time()),
            None => test.time,
        };
        Self {
            test,
            options,
            time,
        }
    }

    /// Effective date and time of the query
    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("fromPlace", self.test.from.coordinates()),
            ("toPlace", self.test.to.coordinates()),
            ("date", self.time.format("%Y-%m-%d").to_string()),
            ("time", self.time.format("%H:%M:%S").to_string()),
            ("arriveBy", self.test.time_type.is_arrive_by().to_string()),
            (
                "maxWalkDistance",
                self.options.max_walk_distance.to_string(),
            ),
            ("optimize", self.options.optimize.clone()),
            ("mode", self.options.mode.clone()),
            ("walkSpeed", self.options.walk_speed.to_string()),
            ("numItineraries", self.options.num_itineraries.to_string()),
        ]
    }

    /// Full query URL against the planner base URL
    pub fn url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        url.query_pairs_mut().extend_pairs(self.query_params());
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Place, TestId, TimeType};
    use std::collections::HashMap;

    fn test_case(time_type: TimeType) -> TestCase {
        TestCase {
            id: TestId::Number(1),
            from: Place::new("A", 52.0, 4.0),
            to: Place::new("B", 52.1, 4.1),
            time: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            time_type,
        }
    }

    fn params(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn test_query_url() {
        let test = test_case(TimeType::DepartBy);
        let options = PlannerOptions::default();
        let base = Url::parse("http://localhost:8080/otp/routers/default/plan").unwrap();

        let url = PlanningRequest::new(&test, &options, None).url(&base);
        assert_eq!(url.path(), "/otp/routers/default/plan");

        let params = params(&url);
        assert_eq!(params["fromPlace"], "52.000000,4.000000");
        assert_eq!(params["toPlace"], "52.100000,4.100000");
        assert_eq!(params["date"], "2024-01-01");
        assert_eq!(params["time"], "08:00:00");
        assert_eq!(params["arriveBy"], "false");
        assert_eq!(params["maxWalkDistance"], "5000");
        assert_eq!(params["optimize"], "QUICK");
        assert_eq!(params["mode"], "WALK,TRANSIT");
        assert_eq!(params["walkSpeed"], "1.389");
        assert_eq!(params["numItineraries"], "1");
        assert_eq!(params.len(), 10);
    }

    #[test]
    fn test_arrive_by() {
        let test = test_case(TimeType::ArriveBy);
        let options = PlannerOptions::default();
        let request = PlanningRequest::new(&test, &options, None);
        let params: HashMap<_, _> = request.query_params().into_iter().collect();
        assert_eq!(params["arriveBy"], "true");
    }

    #[test]
    fn test_today_keeps_clock_time() {
        let test = test_case(TimeType::DepartBy);
        let options = PlannerOptions::default();
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();

        let request = PlanningRequest::new(&test, &options, Some(today));
        assert_eq!(
            request.time(),
            today.and_hms_opt(8, 0, 0).unwrap()
        );

        let params: HashMap<_, _> = request.query_params().into_iter().collect();
        assert_eq!(params["date"], "2026-10-17");
        assert_eq!(params["time"], "08:00:00");
    }

    #[test]
    fn test_base_query_preserved() {
        let test = test_case(TimeType::DepartBy);
        let options = PlannerOptions::default();
        let base = Url::parse("http://otp.example.org/plan?router=nl").unwrap();

        let url = PlanningRequest::new(&test, &options, None).url(&base);
        assert_eq!(params(&url)["router"], "nl");
    }
}
