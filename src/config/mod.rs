//! Configuration module
//!
//! Handles loading and layering runner configuration.

mod env;

pub use env::EnvConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default OpenTripPlanner planning endpoint
pub const DEFAULT_URL: &str = "http://localhost:8080/opentripplanner-api-webapp/ws/plan";

/// Configuration file name searched for in the standard locations
const CONFIG_NAME: &str = "test-otp";

/// Runner configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Planning endpoint URL
    pub url: String,

    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    /// Maximum allowed wall-clock duration of a single test in milliseconds
    pub max_duration_ms: u64,

    /// Replace the date of every test with today's date
    pub use_today: bool,

    /// Compute the verdict and write the validation report
    pub validate: bool,

    /// GELF UDP endpoint (`host:port`) for structured log shipping
    pub gelf: Option<String>,

    /// Planner query options shared by all tests
    pub planner: PlannerOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            timeout_ms: 5000,
            max_duration_ms: 5000,
            use_today: false,
            validate: false,
            gelf: None,
            planner: PlannerOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        Ok(config)
    }

    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        config_locations().into_iter().find(|p| p.exists())
    }

    /// Load configuration from the first standard location, or defaults
    pub fn load_default() -> Result<Self> {
        match Self::find() {
            Some(path) => {
                debug!("Using config file {}", path.display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(url) = &env.url {
            self.url = url.clone();
        }
        if let Some(timeout) = env.timeout {
            self.timeout_ms = timeout;
        }
        if let Some(max_duration) = env.max_duration {
            self.max_duration_ms = max_duration;
        }
        if let Some(today) = env.today {
            self.use_today = today;
        }
        if let Some(validate) = env.validate {
            self.validate = validate;
        }
        if let Some(gelf) = &env.gelf {
            self.gelf = Some(gelf.clone());
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            anyhow::bail!("Planner URL must not be empty");
        }
        if self.timeout_ms == 0 {
            anyhow::bail!("Request timeout must be greater than zero");
        }
        if self.planner.walk_speed <= 0.0 {
            anyhow::bail!(
                "Walk speed must be positive, got {}",
                self.planner.walk_speed
            );
        }
        if self.planner.num_itineraries == 0 {
            anyhow::bail!("At least one itinerary must be requested");
        }
        Ok(())
    }
}

/// Query options sent with every planning request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerOptions {
    /// Walking speed in meters per second
    pub walk_speed: f64,

    /// Maximum walking distance in meters
    pub max_walk_distance: u32,

    /// Optimization criterion (QUICK, TRANSFERS, SAFE, ...)
    pub optimize: String,

    /// Comma-separated mode filter
    pub mode: String,

    /// Number of itineraries to request
    pub num_itineraries: u32,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            walk_speed: 1.389,
            max_walk_distance: 5000,
            optimize: "QUICK".to_string(),
            mode: "WALK,TRANSIT".to_string(),
            num_itineraries: 1,
        }
    }
}

/// Candidate config file locations, in order of precedence
fn config_locations() -> Vec<PathBuf> {
    let mut locations = vec![
        PathBuf::from(format!("./{CONFIG_NAME}.yaml")),
        PathBuf::from(format!("./{CONFIG_NAME}.yml")),
        PathBuf::from(format!("./.{CONFIG_NAME}.yaml")),
    ];
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join(CONFIG_NAME).join("config.yaml"));
    }
    locations
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
