//! Aggregation engine
//!
//! Pure functions turning raw sprint and calendar records, plus the current
//! selection, into the shapes each chart needs. Nothing here holds state or
//! caches results; every call recomputes from its inputs.
//!
//! - Member list and picker options (this module)
//! - Velocity and member comparison series ([`velocity`])
//! - Work breakdown ([`breakdown`])
//! - Meeting cost aggregation, calendar entries and estimates ([`costs`])
//! - Latest-sprint insights ([`insights`])

pub mod breakdown;
pub mod costs;
pub mod insights;
pub mod velocity;

pub use breakdown::{breakdown_for, work_breakdown};
pub use costs::{
    aggregate_costs, calendar_entries, cost_chart_title, meeting_cost, period_key, CostQuery,
};
pub use insights::{insights, insights_for};
pub use velocity::{comparison_series, velocity_series};

use std::collections::BTreeSet;

use crate::types::{CalendarEvent, ComparisonMember, KudosTag, SelectOption, Sprint};

/// Label of the "no member filter" velocity option
pub const ENTIRE_TEAM_LABEL: &str = "Entire Team";

/// Member names taken from the first sprint of the series, in payload order
pub fn member_list(sprints: &[Sprint]) -> Vec<String> {
    sprints
        .first()
        .map(|sprint| sprint.members.keys().cloned().collect())
        .unwrap_or_default()
}

/// Velocity filter options: the whole team, then each member
pub fn velocity_member_options(members: &[String]) -> Vec<SelectOption<Option<String>>> {
    std::iter::once(SelectOption::new(ENTIRE_TEAM_LABEL, None))
        .chain(
            members
                .iter()
                .map(|m| SelectOption::new(m.clone(), Some(m.clone()))),
        )
        .collect()
}

/// Comparison picker options: the team sentinel, then each member
pub fn comparison_member_options(members: &[String]) -> Vec<SelectOption<ComparisonMember>> {
    std::iter::once(ComparisonMember::Team)
        .chain(members.iter().cloned().map(ComparisonMember::Named))
        .map(|member| SelectOption::new(member.label().to_string(), member))
        .collect()
}

/// Sprint picker options, valued by series index
pub fn sprint_options(sprints: &[Sprint]) -> Vec<SelectOption<usize>> {
    sprints
        .iter()
        .enumerate()
        .map(|(index, sprint)| SelectOption::new(sprint.sprint.clone(), index))
        .collect()
}

/// Distinct sprint labels found on calendar events, ascending
pub fn sprint_filter_options(events: &[CalendarEvent]) -> Vec<SelectOption<String>> {
    distinct_label_options(events.iter().map(|e| e.sprint.as_str()))
}

/// Distinct milestone labels found on calendar events, ascending
pub fn milestone_filter_options(events: &[CalendarEvent]) -> Vec<SelectOption<String>> {
    distinct_label_options(events.iter().map(|e| e.milestone.as_str()))
}

/// Kudos recipients. `exclude` drops one name, typically the current user
/// when offering recipients for a new kudos.
pub fn recipient_options(members: &[String], exclude: Option<&str>) -> Vec<SelectOption<String>> {
    members
        .iter()
        .filter(|m| Some(m.as_str()) != exclude)
        .map(|m| SelectOption::new(m.clone(), m.clone()))
        .collect()
}

pub fn kudos_tag_options() -> Vec<SelectOption<KudosTag>> {
    KudosTag::ALL
        .into_iter()
        .map(|tag| SelectOption::new(tag.label(), tag))
        .collect()
}

fn distinct_label_options<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<SelectOption<String>> {
    labels
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|label| SelectOption::new(label, label.to_string()))
        .collect()
}
