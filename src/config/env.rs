//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

/// Environment variable prefix
const ENV_PREFIX: &str = "TEST_OTP";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Planner URL from TEST_OTP_URL
    pub url: Option<String>,
    /// Request timeout in ms from TEST_OTP_TIMEOUT
    pub timeout: Option<u64>,
    /// Max test duration in ms from TEST_OTP_MAX_DURATION
    pub max_duration: Option<u64>,
    /// Date shift from TEST_OTP_TODAY
    pub today: Option<bool>,
    /// Validation from TEST_OTP_VALIDATE
    pub validate: Option<bool>,
    /// GELF endpoint from TEST_OTP_GELF
    pub gelf: Option<String>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            url: get_env("URL"),
            timeout: get_env_parse("TIMEOUT"),
            max_duration: get_env_parse("MAX_DURATION"),
            today: get_env_bool("TODAY"),
            validate: get_env_bool("VALIDATE"),
            gelf: get_env("GELF"),
        }
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable and parse to type
fn get_env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    get_env(name).and_then(|v| v.parse().ok())
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}
