//! Data sources
//!
//! A data source serves the two read endpoints the dashboard depends on. The
//! HTTP source talks to the real backend; the fixture source serves the same
//! JSON from memory or from files on disk.

mod fixture;
mod http;

pub use fixture::FixtureSource;
pub use http::HttpSource;

use async_trait::async_trait;

use crate::error::DashboardError;
use crate::types::{ApiCalendarEvent, Sprint};

/// Path of the sprint endpoint, relative to the API base
pub const SPRINTS_ENDPOINT: &str = "sprints";

/// Path of the calendar events endpoint, relative to the API base
pub const CALENDAR_EVENTS_ENDPOINT: &str = "calendar-events";

/// Trait for backends serving sprint and calendar records
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Where the data comes from, for logs and error messages
    fn describe(&self) -> String;

    /// Fetch the sprint series in chronological order
    async fn fetch_sprints(&self) -> Result<Vec<Sprint>, DashboardError>;

    /// Fetch calendar events with unparsed timestamps
    async fn fetch_calendar_events(&self) -> Result<Vec<ApiCalendarEvent>, DashboardError>;
}
