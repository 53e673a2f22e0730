//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Event-stream client settings
    #[serde(default)]
    pub stream: StreamConfig,

    /// Salary parser settings
    #[serde(default)]
    pub salary: SalaryConfig,

    /// Snapshot file locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.stream.url.trim().is_empty() {
            return Err(AppError::validation("stream.url is empty"));
        }
        if self.stream.connect_timeout_secs == 0 {
            return Err(AppError::validation(
                "stream.connect_timeout_secs must be > 0",
            ));
        }
        if self.stream.base_delay_ms == 0 {
            return Err(AppError::validation("stream.base_delay_ms must be > 0"));
        }
        if self.stream.max_delay_ms < self.stream.base_delay_ms {
            return Err(AppError::validation(
                "stream.max_delay_ms must be >= stream.base_delay_ms",
            ));
        }
        if !(0.0..1.0).contains(&self.stream.jitter) {
            return Err(AppError::validation("stream.jitter must be in [0, 1)"));
        }
        if self.salary.bare_number_threshold_k <= 0.0 {
            return Err(AppError::validation(
                "salary.bare_number_threshold_k must be > 0",
            ));
        }
        Ok(())
    }
}

/// Event-stream client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// URL of the login-status event stream
    #[serde(default = "defaults::stream_url")]
    pub url: String,

    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Connection timeout in seconds (the stream itself is unbounded)
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,

    /// First reconnect delay in milliseconds
    #[serde(default = "defaults::base_delay")]
    pub base_delay_ms: u64,

    /// Reconnect delay cap in milliseconds
    #[serde(default = "defaults::max_delay")]
    pub max_delay_ms: u64,

    /// Jitter ratio applied to reconnect delays, in [0, 1)
    #[serde(default = "defaults::jitter")]
    pub jitter: f64,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            url: defaults::stream_url(),
            user_agent: defaults::user_agent(),
            connect_timeout_secs: defaults::connect_timeout(),
            base_delay_ms: defaults::base_delay(),
            max_delay_ms: defaults::max_delay(),
            jitter: defaults::jitter(),
        }
    }
}

/// Salary parser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryConfig {
    /// Largest bare number still read as thousands. Un-suffixed figures
    /// above this are raw yuan and get divided by 1000.
    #[serde(default = "defaults::bare_number_threshold")]
    pub bare_number_threshold_k: f64,
}

impl Default for SalaryConfig {
    fn default() -> Self {
        Self {
            bare_number_threshold_k: defaults::bare_number_threshold(),
        }
    }
}

/// Snapshot file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Job-record snapshot written by the scraper backend
    #[serde(default = "defaults::jobs_file")]
    pub jobs_file: String,

    /// KPI summary output for the dashboard
    #[serde(default = "defaults::summary_file")]
    pub summary_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            jobs_file: defaults::jobs_file(),
            summary_file: defaults::summary_file(),
        }
    }
}

mod defaults {
    // Stream defaults
    pub fn stream_url() -> String {
        "http://127.0.0.1:8080/api/status/stream".into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jobdash/0.1)".into()
    }
    pub fn connect_timeout() -> u64 {
        10
    }
    pub fn base_delay() -> u64 {
        1000
    }
    pub fn max_delay() -> u64 {
        30000
    }
    pub fn jitter() -> f64 {
        0.2
    }

    // Salary defaults
    pub fn bare_number_threshold() -> f64 {
        100.0
    }

    // Path defaults
    pub fn jobs_file() -> String {
        "data/jobs.json".into()
    }
    pub fn summary_file() -> String {
        "data/summary.json".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_url() {
        let mut config = Config::default();
        config.stream.url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_delays() {
        let mut config = Config::default();
        config.stream.base_delay_ms = 5000;
        config.stream.max_delay_ms = 1000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_full_jitter() {
        let mut config = Config::default();
        config.stream.jitter = 1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [stream]
            url = "http://localhost:9000/sse"

            [salary]
            bare_number_threshold_k = 120.0
            "#,
        )
        .unwrap();

        assert_eq!(config.stream.url, "http://localhost:9000/sse");
        assert_eq!(config.stream.base_delay_ms, 1000);
        assert_eq!(config.stream.max_delay_ms, 30000);
        assert_eq!(config.salary.bare_number_threshold_k, 120.0);
        assert_eq!(config.paths.jobs_file, "data/jobs.json");
    }
}
