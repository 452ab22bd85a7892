//! Test execution runner
//!
//! Runs the test cases one after another against the planner.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, TimeZone};
use reqwest::Url;
use std::fmt;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::normalize::ResponseNormalizer;
use super::request::PlanningRequest;
use crate::config::{AppConfig, PlannerOptions};
use crate::http::{HttpError, HttpResponse, PlanTransport};
use crate::models::{PlanResponse, TestCase, TestResult};
use crate::output::ResultWriter;
use crate::results::{RunStatistics, RunningValidation, ValidationAccumulator};

/// Sequential test runner
pub struct TestRunner<T, Tz: TimeZone = Local> {
    transport: T,
    base_url: Url,
    options: PlannerOptions,
    use_today: bool,
    max_duration: Duration,
    normalizer: ResponseNormalizer<Tz>,
}

impl<T: PlanTransport> TestRunner<T, Local> {
    /// Create a runner that reports times in the local time zone
    pub fn new(transport: T, config: &AppConfig) -> Result<Self> {
        let base_url = Url::parse(&config.url)
            .with_context(|| format!("Invalid planner URL: {}", config.url))?;

        Ok(Self {
            transport,
            base_url,
            options: config.planner.clone(),
            use_today: config.use_today,
            max_duration: Duration::from_millis(config.max_duration_ms),
            normalizer: ResponseNormalizer::local(),
        })
    }
}

impl<T, Tz> TestRunner<T, Tz>
where
    T: PlanTransport,
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    /// Format result timestamps in another time zone
    #[cfg(test)]
    pub fn with_time_zone<Tz2>(self, tz: Tz2) -> TestRunner<T, Tz2>
    where
        Tz2: TimeZone,
        Tz2::Offset: fmt::Display,
    {
        TestRunner {
            transport: self.transport,
            base_url: self.base_url,
            options: self.options,
            use_today: self.use_today,
            max_duration: self.max_duration,
            normalizer: ResponseNormalizer::new(tz),
        }
    }

    fn today(&self) -> Option<NaiveDate> {
        self.use_today.then(|| Local::now().date_naive())
    }

    /// Run a single test case
    pub async fn run_test(
        &self,
        test: &TestCase,
        validation: &mut RunningValidation,
    ) -> Result<TestResult> {
        info!(test_id = %test.id, "{}", test);

        let request = PlanningRequest::new(test, &self.options, self.today());
        let url = request.url(&self.base_url);
        debug!("Planning for {}, calling URL: {}", request.time(), url);

        validation.begin_test(&test.id);

        let fetched = self.transport.fetch(&url).await;
        let result = match planner_body(test, fetched) {
            PlannerBody::Usable(body) => {
                self.normalizer.normalize_body(&test.id, Some(body.as_str()))
            }
            PlannerBody::Rejected(response) => self.normalizer.normalize(&test.id, response),
        }
        .with_context(|| format!("Unusable planner response for test {}", test.id))?;

        validation.end_test(&test.id, &result)?;
        debug!(
            "{} errors so far, slowest test {}ms",
            validation.error_count(),
            validation.max_test_duration().as_millis()
        );
        Ok(result)
    }

    /// Run all test cases in order, streaming each result to `writer`
    pub async fn run_all<W: Write>(
        &self,
        tests: &[TestCase],
        mut writer: ResultWriter<W>,
    ) -> Result<RunStatistics> {
        info!("Running {} tests against {}", tests.len(), self.base_url);

        let mut validation = ValidationAccumulator::new(self.max_duration).begin_run();

        for test in tests {
            let result = self.run_test(test, &mut validation).await?;
            info!(
                test_id = %result.id(),
                is_error = result.is_error(),
                "  {}",
                result
            );
            writer.write_result(&result)?;
        }
        let written = writer.written();
        writer.finish()?;
        debug!("Wrote {} results", written);

        let statistics = validation.end_run();
        info!("Run completed: {}", statistics);
        Ok(statistics)
    }
}

/// What the transport produced for one test
enum PlannerBody {
    /// A 2xx body; anything unparseable here is fatal
    Usable(String),
    /// No body worth parsing, or a planner error carried by a non-2xx status
    Rejected(Option<PlanResponse>),
}

/// Sort a transport outcome into a body to normalize or a degraded result
fn planner_body(test: &TestCase, fetched: Result<HttpResponse, HttpError>) -> PlannerBody {
    let response = match fetched {
        Ok(response) => response,
        Err(e) => {
            warn!(test_id = %test.id, "Test {} request failed: {}", test.id, e);
            return PlannerBody::Rejected(None);
        }
    };
    debug!(
        "Planner answered test {} in {}ms",
        test.id, response.duration_ms
    );

    if response.is_success() {
        return PlannerBody::Usable(response.body);
    }

    warn!(
        test_id = %test.id,
        "Test {} got HTTP {} from planner",
        test.id,
        response.status_code
    );
    // proxies answer with HTML error pages while the planner restarts
    let planner_error = serde_json::from_str::<PlanResponse>(&response.body)
        .ok()
        .filter(|r| r.error.is_some());
    PlannerBody::Rejected(planner_error)
}
