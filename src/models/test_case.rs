//! Test case models
//!
//! Journey requests loaded from the test input file.

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};

/// Date/time layout used for input times and all formatted timestamps
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Test case identifier, echoed back verbatim in the results
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestId {
    Number(i64),
    Text(String),
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestId::Number(n) => write!(f, "{n}"),
            TestId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for TestId {
    fn from(n: i64) -> Self {
        TestId::Number(n)
    }
}

impl From<&str> for TestId {
    fn from(s: &str) -> Self {
        TestId::Text(s.to_string())
    }
}

/// Origin or destination of a journey
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Place {
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Place {
    #[cfg(test)]
    pub fn new(description: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            description: description.into(),
            latitude,
            longitude,
        }
    }

    /// Coordinates in the `lat,lon` form the planner expects
    pub fn coordinates(&self) -> String {
        format!("{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.6}, {:.6})",
            self.description, self.latitude, self.longitude
        )
    }
}

/// Whether the requested time is a departure or an arrival time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TimeType {
    DepartBy,
    ArriveBy,
}

impl TimeType {
    /// `A` means arrive-by, anything else depart-by
    pub fn from_code(code: &str) -> Self {
        if code == "A" {
            TimeType::ArriveBy
        } else {
            TimeType::DepartBy
        }
    }

    pub fn is_arrive_by(self) -> bool {
        matches!(self, TimeType::ArriveBy)
    }
}

impl From<String> for TimeType {
    fn from(code: String) -> Self {
        TimeType::from_code(&code)
    }
}

/// A single scripted journey request
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TestCase {
    pub id: TestId,
    pub from: Place,
    pub to: Place,
    #[serde(deserialize_with = "deserialize_date_time")]
    pub time: NaiveDateTime,
    #[serde(rename = "timeType")]
    pub time_type: TimeType,
}

impl TestCase {
    /// Parse the test list from a JSON array
    pub fn load_all(reader: impl Read) -> Result<Vec<TestCase>> {
        serde_json::from_reader(BufReader::new(reader)).context("Failed to parse test cases")
    }

    /// Load the test list from a file, or from stdin when the path is `-`
    pub fn load_from(path: &str) -> Result<Vec<TestCase>> {
        if path == "-" {
            Self::load_all(io::stdin().lock())
        } else {
            let file =
                File::open(path).with_context(|| format!("Failed to open test input: {path}"))?;
            Self::load_all(file).with_context(|| format!("Invalid test input: {path}"))
        }
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {}: from {} to {}", self.id, self.from, self.to)
    }
}

fn deserialize_date_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, DATE_TIME_FORMAT).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = r#"[
        {"id": 1,
         "from": {"description": "A", "latitude": 52.0, "longitude": 4.0},
         "to": {"description": "B", "latitude": 52.1, "longitude": 4.1},
         "time": "2024-01-01T08:00:00", "timeType": "D"},
        {"id": "amsterdam-utrecht",
         "from": {"description": "Amsterdam", "latitude": 52.379, "longitude": 4.9},
         "to": {"description": "Utrecht", "latitude": 52.089, "longitude": 5.11},
         "time": "2024-03-15T17:45:30", "timeType": "A"}
    ]"#;

    #[test]
    fn test_load_all() {
        let tests = TestCase::load_all(SAMPLE.as_bytes()).unwrap();
        assert_eq!(tests.len(), 2);

        assert_eq!(tests[0].id, TestId::Number(1));
        assert_eq!(tests[0].time_type, TimeType::DepartBy);
        assert_eq!(
            tests[0].time,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap()
        );

        assert_eq!(tests[1].id, TestId::Text("amsterdam-utrecht".to_string()));
        assert!(tests[1].time_type.is_arrive_by());
    }

    #[test]
    fn test_invalid_time_rejected() {
        let input = r#"[{"id": 1,
            "from": {"description": "A", "latitude": 52.0, "longitude": 4.0},
            "to": {"description": "B", "latitude": 52.1, "longitude": 4.1},
            "time": "01-01-2024 08:00", "timeType": "D"}]"#;
        assert!(TestCase::load_all(input.as_bytes()).is_err());
    }

    #[test]
    fn test_time_type_codes() {
        assert_eq!(TimeType::from_code("A"), TimeType::ArriveBy);
        assert_eq!(TimeType::from_code("D"), TimeType::DepartBy);
        assert_eq!(TimeType::from_code("a"), TimeType::DepartBy);
        assert_eq!(TimeType::from_code(""), TimeType::DepartBy);
    }

    #[test]
    fn test_place_formatting() {
        let place = Place::new("Centraal", 52.379189, 4.899431);
        assert_eq!(place.coordinates(), "52.379189,4.899431");
        assert_eq!(place.to_string(), "Centraal (52.379189, 4.899431)");
    }

    #[test]
    fn test_load_from_missing_file() {
        assert!(TestCase::load_from("/nonexistent/tests.json").is_err());
    }
}
