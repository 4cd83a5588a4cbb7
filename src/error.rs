//! Error types for RetroBuddy

use std::path::PathBuf;

use thiserror::Error;

use crate::kudos::KudosValidationError;

/// Errors that can occur while loading or deriving dashboard data
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A data endpoint answered with a non-success status, could not be
    /// reached, or returned a body that is not the expected JSON.
    #[error("Failed to load {endpoint}: {reason}")]
    LoadFailed { endpoint: String, reason: String },

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid {field} timestamp on event '{title}': {value}")]
    InvalidTimestamp {
        title: String,
        field: &'static str,
        value: String,
    },

    #[error("Unknown kudos tag: {0}")]
    UnknownTag(String),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Kudos rejected: {0}")]
    Kudos(#[from] KudosValidationError),
}

impl DashboardError {
    /// True for failures that happened while fetching or decoding the two
    /// data endpoints. These leave the dashboard uninitialized.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            DashboardError::LoadFailed { .. }
                | DashboardError::InvalidTimestamp { .. }
                | DashboardError::JsonError(_)
        )
    }

    /// The single user-visible message shown when initialization fails.
    pub fn user_message(&self, api_base_url: &str) -> String {
        if self.is_load_failure() {
            format!(
                "Failed to load dashboard data. Please ensure the API server is running at {api_base_url}. Error: {self}"
            )
        } else {
            self.to_string()
        }
    }
}
