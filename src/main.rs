//! test-otp - OpenTripPlanner batch test runner
//!
//! Drives an OpenTripPlanner instance with a list of scripted journey
//! requests, records the first itinerary (or error) of every response and
//! checks that the run stays within error and latency bounds.
//!
//! ## Usage
//!
//! ```bash
//! # Run tests from a file, results to stdout
//! test-otp tests.json
//!
//! # Against a specific planner, shifting all tests to today
//! test-otp tests.json results.json --url http://otp:8080/otp/routers/default/plan --today
//!
//! # Validate: fail when any test errors or takes longer than 2s
//! test-otp tests.json results.json --validate --max-duration 2000
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{info, warn};

mod cli;
mod config;
mod executor;
mod http;
mod models;
mod output;
mod results;
mod utils;

use cli::Args;
use config::{AppConfig, EnvConfig};
use executor::TestRunner;
use http::HttpClient;
use models::TestCase;
use output::ResultWriter;
use results::{report_path, write_report, ValidationReport, Verdict};
use utils::{init_logger, GelfLayer, LogLevel};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let gelf = match &config.gelf {
        Some(endpoint) => Some(
            GelfLayer::connect(endpoint)
                .with_context(|| format!("Failed to connect GELF endpoint {endpoint}"))?,
        ),
        None => None,
    };
    let level = if args.debug {
        LogLevel::Debug
    } else {
        LogLevel::from_str(&args.log_level).unwrap_or(LogLevel::Info)
    };
    init_logger(level, gelf);

    run(&args, &config).await
}

/// Defaults, then config file, then environment, then command line
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    config.apply_env(&EnvConfig::load());
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

async fn run(args: &Args, config: &AppConfig) -> Result<ExitCode> {
    let tests = TestCase::load_from(&args.input)?;
    let writer = ResultWriter::open(&args.output)?;

    let client = HttpClient::with_timeout(config.timeout_ms)?;
    let runner = TestRunner::new(client, config)?;

    let statistics = runner.run_all(&tests, writer).await?;
    let verdict: Verdict = statistics.verdict();

    if !config.validate {
        return Ok(ExitCode::SUCCESS);
    }

    let path = args
        .report
        .clone()
        .unwrap_or_else(|| report_path(&args.input));
    write_report(&path, &ValidationReport::new(statistics))?;

    if verdict.is_success() {
        info!("{}", verdict);
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("{}", verdict);
        Ok(ExitCode::FAILURE)
    }
}
