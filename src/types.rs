//! Core types for RetroBuddy
//!
//! This module defines the records fetched from the backend (sprints, calendar
//! events), the kudos records held locally, the selection vocabulary, and the
//! view-models handed to the presentation layer.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// Per-member delivery within a sprint
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MemberData {
    /// Points completed by this member
    pub completed: f64,
}

/// One sprint as served by `GET /sprints`
///
/// The position of a sprint in its series encodes its chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprint {
    /// Sprint label
    pub sprint: String,
    /// Points planned
    pub committed: f64,
    /// Points delivered by the whole team
    pub completed: f64,
    /// Bug points (subtotal, need not sum to `completed`)
    #[serde(default)]
    pub bugs: f64,
    /// Feature points
    #[serde(default)]
    pub features: f64,
    /// Chore points
    #[serde(default)]
    pub chores: f64,
    /// Delivery keyed by member name, in payload order
    #[serde(default)]
    pub members: IndexMap<String, MemberData>,
}

/// Calendar event as served by `GET /calendar-events`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCalendarEvent {
    pub title: String,
    /// ISO-8601 start instant
    pub start: String,
    /// ISO-8601 end instant
    pub end: String,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub sprint: String,
    #[serde(default)]
    pub milestone: String,
    /// Pre-bucketed day key, used only for by-day aggregation
    #[serde(default)]
    pub day: Option<String>,
}

/// Calendar event with parsed instants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Monetary cost of the meeting (non-negative)
    pub cost: f64,
    pub sprint: String,
    pub milestone: String,
    pub day: Option<String>,
}

/// Recognition category, a closed set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KudosTag {
    Helpfulness,
    Pairing,
    Innovation,
    #[serde(rename = "Above & Beyond")]
    AboveAndBeyond,
    Kindness,
    #[serde(rename = "Great Work")]
    GreatWork,
}

impl KudosTag {
    /// Every tag, in the order the tag picker lists them
    pub const ALL: [KudosTag; 6] = [
        KudosTag::Helpfulness,
        KudosTag::Pairing,
        KudosTag::Innovation,
        KudosTag::AboveAndBeyond,
        KudosTag::Kindness,
        KudosTag::GreatWork,
    ];

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            KudosTag::Helpfulness => "Helpfulness",
            KudosTag::Pairing => "Pairing",
            KudosTag::Innovation => "Innovation",
            KudosTag::AboveAndBeyond => "Above & Beyond",
            KudosTag::Kindness => "Kindness",
            KudosTag::GreatWork => "Great Work",
        }
    }

    /// Display label shown in pickers
    pub fn label(&self) -> &'static str {
        match self {
            KudosTag::Helpfulness => "🤝 Helpfulness",
            KudosTag::Pairing => "🧑‍💻 Pairing",
            KudosTag::Innovation => "💡 Innovation",
            KudosTag::AboveAndBeyond => "⭐ Above & Beyond",
            KudosTag::Kindness => "💖 Kindness",
            KudosTag::GreatWork => "👍 Great Work",
        }
    }
}

impl fmt::Display for KudosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KudosTag {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        KudosTag::ALL
            .into_iter()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| DashboardError::UnknownTag(s.to_string()))
    }
}

/// A peer-recognition message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kudos {
    /// Unique, increasing in creation order
    pub id: u64,
    pub sender: String,
    pub recipient: String,
    pub message: String,
    pub tag: KudosTag,
    pub timestamp: DateTime<Utc>,
    /// When set the sender must not be displayed
    pub is_anonymous: bool,
}

/// Bucketing granularity for meeting costs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Day,
    Month,
    Year,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Month => "month",
            Period::Year => "year",
        }
    }

    /// Capitalized form used in chart titles
    pub fn title(&self) -> &'static str {
        match self {
            Period::Day => "Day",
            Period::Month => "Month",
            Period::Year => "Year",
        }
    }
}

/// Which event label the cost chart is filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostFilterMode {
    #[default]
    Sprint,
    Milestone,
}

/// One side of the member comparison chart
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMember {
    /// The whole team's completed points
    Team,
    /// A single member's completed points
    Named(String),
}

impl ComparisonMember {
    /// Key under which this series appears in a comparison row
    pub fn series_key(&self) -> &str {
        match self {
            ComparisonMember::Team => "Team",
            ComparisonMember::Named(name) => name.as_str(),
        }
    }

    /// Label shown in the member picker
    pub fn label(&self) -> &str {
        match self {
            ComparisonMember::Team => "Entire Team",
            ComparisonMember::Named(name) => name.as_str(),
        }
    }
}

/// A labelled choice for a picker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption<V> {
    pub label: String,
    pub value: V,
}

impl<V> SelectOption<V> {
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// One point of the velocity chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityPoint {
    pub sprint: String,
    pub committed: f64,
    pub completed: f64,
}

/// Work categories of the breakdown chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkCategory {
    Bugs,
    Features,
    Chores,
}

impl WorkCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkCategory::Bugs => "Bugs",
            WorkCategory::Features => "Features",
            WorkCategory::Chores => "Chores",
        }
    }
}

/// One slice of the work breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownSlice {
    pub name: WorkCategory,
    pub value: f64,
}

/// One row of the member comparison chart
///
/// Series are keyed by [`ComparisonMember::series_key`]; two selections that
/// share a key share one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub sprint: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// One meeting on the calendar card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub cost: f64,
    /// Hover text, e.g. `Sprint Planning - Cost: $400`
    pub label: String,
}

/// Summed meeting cost for one period key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBucket {
    pub period: String,
    pub cost: f64,
}

/// Observations about the most recent sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    LowCompletion,
    CommitmentMet,
    HighBugCount,
    ModerateBugCount,
    LowFeatureOutput,
    GoodFeatureOutput,
    WorkBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub message: String,
}

/// Advisory band for a single meeting's cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostBand {
    High,
    Moderate,
    Low,
}

/// Cost of one meeting for the whole team
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingCostEstimate {
    pub hourly_rate: f64,
    pub meeting_hours: f64,
    pub participants: usize,
    pub cost: f64,
    pub band: CostBand,
    pub message: String,
}
