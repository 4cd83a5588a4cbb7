//! Dashboard configuration
//!
//! Every field has a default, so an empty JSON object (or no file at all) is a
//! valid configuration. Values are layered: defaults, then an optional JSON
//! file, then environment overrides, then whatever the caller sets last.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::DashboardError;

/// Base URL of the backend serving `/sprints` and `/calendar-events`
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api";

/// Identity used as the sender of kudos submitted from this session
pub const DEFAULT_CURRENT_USER: &str = "Entire Team";

/// Default average hourly rate per participant
pub const DEFAULT_HOURLY_RATE: f64 = 50.0;

/// Default meeting length in hours
pub const DEFAULT_MEETING_HOURS: f64 = 1.0;

/// Default per-request timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding [`DashboardConfig::api_base_url`]
pub const API_BASE_URL_ENV: &str = "RETRO_API_BASE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub current_user: String,
    pub hourly_rate: f64,
    pub meeting_hours: f64,
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            current_user: DEFAULT_CURRENT_USER.to_string(),
            hourly_rate: DEFAULT_HOURLY_RATE,
            meeting_hours: DEFAULT_MEETING_HOURS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    /// Parse a configuration from JSON, filling unspecified fields with defaults
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON configuration file
    pub fn from_file(path: &Path) -> Result<Self, DashboardError> {
        let json = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Apply environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var(API_BASE_URL_ENV) {
            if !url.trim().is_empty() {
                self.api_base_url = url;
            }
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the values a caller could have set to something unusable
    pub fn validate(&self) -> Result<(), DashboardError> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(DashboardError::Config("api_base_url is empty".to_string()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashboardError::Config(format!(
                "api_base_url must be an http(s) URL, got {url}"
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(DashboardError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
