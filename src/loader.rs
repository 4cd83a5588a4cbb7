//! Dashboard data loading
//!
//! Issues both fetches together, waits for both, and parses event timestamps.
//! Either fetch failing fails the whole load; no partial data is returned.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::DashboardError;
use crate::source::DataSource;
use crate::types::{ApiCalendarEvent, CalendarEvent, Sprint};

/// Raw records backing one dashboard session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Sprint series, chronological
    pub sprints: Vec<Sprint>,
    /// Calendar events with parsed instants
    pub events: Vec<CalendarEvent>,
}

impl DashboardData {
    pub fn new(sprints: Vec<Sprint>, events: Vec<CalendarEvent>) -> Self {
        Self { sprints, events }
    }

    pub fn is_empty(&self) -> bool {
        self.sprints.is_empty() && self.events.is_empty()
    }
}

/// Fetch sprints and calendar events concurrently and assemble them.
pub async fn load_dashboard_data(source: &dyn DataSource) -> Result<DashboardData, DashboardError> {
    let (sprints, raw_events) =
        tokio::try_join!(source.fetch_sprints(), source.fetch_calendar_events())?;

    let events = raw_events
        .into_iter()
        .map(parse_event)
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        source = %source.describe(),
        sprints = sprints.len(),
        events = events.len(),
        "dashboard data loaded"
    );

    Ok(DashboardData { sprints, events })
}

/// Convert a wire event into one with parsed instants.
pub fn parse_event(event: ApiCalendarEvent) -> Result<CalendarEvent, DashboardError> {
    let start = parse_instant(&event.start).ok_or_else(|| DashboardError::InvalidTimestamp {
        title: event.title.clone(),
        field: "start",
        value: event.start.clone(),
    })?;
    let end = parse_instant(&event.end).ok_or_else(|| DashboardError::InvalidTimestamp {
        title: event.title.clone(),
        field: "end",
        value: event.end.clone(),
    })?;

    if end < start {
        warn!(title = %event.title, %start, %end, "calendar event ends before it starts");
    }
    if event.cost < 0.0 {
        warn!(title = %event.title, cost = event.cost, "calendar event has a negative cost");
    }

    Ok(CalendarEvent {
        title: event.title,
        start,
        end,
        cost: event.cost,
        sprint: event.sprint,
        milestone: event.milestone,
        day: event.day,
    })
}

/// Parse an ISO-8601 instant.
///
/// Accepts RFC 3339 with an offset, a naive date-time (taken as UTC), or a
/// bare date (UTC midnight).
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FixtureSource;
    use chrono::{Datelike, Timelike};

    const SPRINTS: &str = r#"[
        {"sprint": "Sprint 1", "committed": 20, "completed": 18, "bugs": 3, "features": 12, "chores": 5,
         "members": {"Alice": {"completed": 10}, "Bob": {"completed": 8}}},
        {"sprint": "Sprint 2", "committed": 22, "completed": 15, "bugs": 6, "features": 6, "chores": 3,
         "members": {"Alice": {"completed": 7}, "Bob": {"completed": 8}}}
    ]"#;

    const EVENTS: &str = r#"[
        {"title": "Planning", "start": "2025-04-01T09:00:00Z", "end": "2025-04-01T10:00:00Z",
         "cost": 10, "sprint": "Sprint 1", "milestone": "M1", "day": "2025-04-01"},
        {"title": "Retro", "start": "2025-04-15", "end": "2025-04-15", "cost": 20,
         "sprint": "Sprint 2", "milestone": "M1"}
    ]"#;

    #[tokio::test]
    async fn test_load_joins_both_endpoints() {
        let source = FixtureSource::from_json(SPRINTS, EVENTS);
        let data = load_dashboard_data(&source).await.unwrap();

        assert_eq!(data.sprints.len(), 2);
        assert_eq!(data.events.len(), 2);
        assert_eq!(data.events[1].day, None);
        assert_eq!(data.events[1].start.day(), 15);
    }

    #[tokio::test]
    async fn test_sprint_failure_aborts_load() {
        let source = FixtureSource::from_json("oops", EVENTS);
        let err = load_dashboard_data(&source).await.unwrap_err();
        assert!(err.is_load_failure());
        assert!(err.to_string().contains("sprints"));
    }

    #[tokio::test]
    async fn test_event_failure_aborts_load() {
        let source = FixtureSource::from_json(SPRINTS, r#"{"unexpected": true}"#);
        let err = load_dashboard_data(&source).await.unwrap_err();
        assert!(err.to_string().contains("calendar-events"));
    }

    #[tokio::test]
    async fn test_unparseable_timestamp_aborts_load() {
        let events = r#"[{"title": "Demo", "start": "next tuesday", "end": "2025-04-01", "cost": 5, "sprint": "S", "milestone": "M"}]"#;
        let source = FixtureSource::from_json(SPRINTS, events);
        let err = load_dashboard_data(&source).await.unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidTimestamp { field: "start", .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_series_load_cleanly() {
        let source = FixtureSource::from_json("[]", "[]");
        let data = load_dashboard_data(&source).await.unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_instant_forms() {
        let with_offset = parse_instant("2025-04-01T10:30:00+02:00").unwrap();
        assert_eq!(with_offset.hour(), 8);

        let naive = parse_instant("2025-04-01T10:30:00").unwrap();
        assert_eq!(naive.hour(), 10);

        let fractional = parse_instant("2025-04-01T10:30:00.250").unwrap();
        assert_eq!(fractional.minute(), 30);

        let date_only = parse_instant("2025-12-31").unwrap();
        assert_eq!((date_only.month(), date_only.day(), date_only.hour()), (12, 31, 0));

        assert!(parse_instant("31/12/2025").is_none());
        assert!(parse_instant("").is_none());
    }
}
