//! Fixture data source
//!
//! Serves the two endpoints from JSON held in memory or stored as
//! `sprints.json` and `calendar-events.json` in a directory.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use super::{DataSource, CALENDAR_EVENTS_ENDPOINT, SPRINTS_ENDPOINT};
use crate::error::DashboardError;
use crate::types::{ApiCalendarEvent, Sprint};

#[derive(Debug, Clone)]
enum Fixture {
    Inline(String),
    File(PathBuf),
}

/// Data source backed by JSON documents
#[derive(Debug, Clone)]
pub struct FixtureSource {
    sprints: Fixture,
    events: Fixture,
}

impl FixtureSource {
    /// Serve the given JSON documents
    pub fn from_json(sprints_json: impl Into<String>, events_json: impl Into<String>) -> Self {
        Self {
            sprints: Fixture::Inline(sprints_json.into()),
            events: Fixture::Inline(events_json.into()),
        }
    }

    /// Serve `sprints.json` and `calendar-events.json` from `dir`
    ///
    /// Files are read on every fetch, so a missing file surfaces as a load
    /// failure rather than at construction.
    pub fn from_dir(dir: &Path) -> Self {
        Self {
            sprints: Fixture::File(dir.join(format!("{SPRINTS_ENDPOINT}.json"))),
            events: Fixture::File(dir.join(format!("{CALENDAR_EVENTS_ENDPOINT}.json"))),
        }
    }

    async fn read<T: DeserializeOwned>(
        fixture: &Fixture,
        endpoint: &str,
    ) -> Result<T, DashboardError> {
        let (location, json) = match fixture {
            Fixture::Inline(json) => (format!("fixture:{endpoint}"), json.clone()),
            Fixture::File(path) => {
                let location = path.display().to_string();
                let json = tokio::fs::read_to_string(path).await.map_err(|e| {
                    DashboardError::LoadFailed {
                        endpoint: location.clone(),
                        reason: e.to_string(),
                    }
                })?;
                (location, json)
            }
        };

        serde_json::from_str(&json).map_err(|e| DashboardError::LoadFailed {
            endpoint: location,
            reason: format!("invalid JSON: {e}"),
        })
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    fn describe(&self) -> String {
        match &self.sprints {
            Fixture::Inline(_) => "inline fixtures".to_string(),
            Fixture::File(path) => path
                .parent()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    async fn fetch_sprints(&self) -> Result<Vec<Sprint>, DashboardError> {
        Self::read(&self.sprints, SPRINTS_ENDPOINT).await
    }

    async fn fetch_calendar_events(&self) -> Result<Vec<ApiCalendarEvent>, DashboardError> {
        Self::read(&self.events, CALENDAR_EVENTS_ENDPOINT).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inline_fixtures() {
        let source = FixtureSource::from_json(
            r#"[{"sprint": "Sprint 1", "committed": 10, "completed": 8}]"#,
            r#"[{"title": "Retro", "start": "2025-04-01T10:00:00Z", "end": "2025-04-01T11:00:00Z", "cost": 120, "sprint": "Sprint 1", "milestone": "M1", "day": "2025-04-01"}]"#,
        );

        let sprints = source.fetch_sprints().await.unwrap();
        let events = source.fetch_calendar_events().await.unwrap();
        assert_eq!(sprints.len(), 1);
        assert_eq!(events[0].day.as_deref(), Some("2025-04-01"));
        assert_eq!(source.describe(), "inline fixtures");
    }

    #[tokio::test]
    async fn test_invalid_json_is_load_failure() {
        let source = FixtureSource::from_json("[]", "{not json");
        let err = source.fetch_calendar_events().await.unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("fixture:calendar-events"));
    }

    #[tokio::test]
    async fn test_missing_directory_names_file() {
        let source = FixtureSource::from_dir(Path::new("/nonexistent/retro-fixtures"));
        let err = source.fetch_sprints().await.unwrap_err();
        assert!(err.to_string().contains("sprints.json"));
    }
}
