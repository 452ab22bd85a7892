//! CLI argument parsing
//!
//! Defines command-line interface using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;

/// Test OpenTripPlanner using planning data from a test file
#[derive(Parser, Debug)]
#[command(name = "test-otp")]
#[command(author = "tech@goabout.com")]
#[command(version)]
#[command(about = "Test OpenTripPlanner using planning data from a test file")]
#[command(long_about = None)]
pub struct Args {
    /// Test input file (`-` for stdin)
    #[arg(value_name = "INPUT", default_value = "-")]
    pub input: String,

    /// Test output file (`-` for stdout)
    #[arg(value_name = "OUTPUT", default_value = "-")]
    pub output: String,

    /// OpenTripPlanner plan endpoint URL
    #[arg(short, long)]
    pub url: Option<String>,

    /// Request timeout in milliseconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Maximum allowed duration of a single test in milliseconds
    #[arg(short, long)]
    pub max_duration: Option<u64>,

    /// Replace the date of every test with today's date
    #[arg(long)]
    pub today: bool,

    /// Validate the run and write the validation report
    #[arg(short, long)]
    pub validate: bool,

    /// Validation report path (default: <input>_validation.json)
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Configuration file (JSON or YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ship logs to a GELF UDP endpoint (host:port)
    #[arg(long)]
    pub gelf: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Show debugging output
    #[arg(short, long)]
    pub debug: bool,
}

impl Args {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout_ms = timeout;
        }
        if let Some(max_duration) = self.max_duration {
            config.max_duration_ms = max_duration;
        }
        if self.today {
            config.use_today = true;
        }
        if self.validate {
            config.validate = true;
        }
        if let Some(gelf) = &self.gelf {
            config.gelf = Some(gelf.clone());
        }
    }
}
