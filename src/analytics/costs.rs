//! Meeting cost aggregation
//!
//! Calendar events are filtered by one label dimension (sprint or milestone),
//! bucketed by period, and summed. Also computes the single-meeting cost
//! estimate and its advisory band.

use std::collections::BTreeMap;

use crate::types::{
    CalendarEntry, CalendarEvent, CostBand, CostBucket, CostFilterMode, MeetingCostEstimate,
    Period,
};

/// Bucket key used for by-day aggregation when an event has no day field
pub const UNKNOWN_DAY_KEY: &str = "Unk";

/// Cost per participant-hour above which a meeting is flagged as expensive
const HIGH_COST_PER_PARTICIPANT: f64 = 50.0;

/// Cost per participant-hour above which a meeting is flagged as moderate
const MODERATE_COST_PER_PARTICIPANT: f64 = 25.0;

/// Parameters of the aggregated cost chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostQuery<'a> {
    pub period: Period,
    pub mode: CostFilterMode,
    /// Sprint label to keep in [`CostFilterMode::Sprint`]; `None` keeps all
    pub sprint: Option<&'a str>,
    /// Milestone label to keep in [`CostFilterMode::Milestone`]; `None` keeps all
    pub milestone: Option<&'a str>,
}

impl CostQuery<'_> {
    /// Only the active dimension constrains; the other value is ignored.
    fn matches(&self, event: &CalendarEvent) -> bool {
        match self.mode {
            CostFilterMode::Sprint => self.sprint.map_or(true, |s| event.sprint == s),
            CostFilterMode::Milestone => self.milestone.map_or(true, |m| event.milestone == m),
        }
    }

    fn active_filter(&self) -> Option<(&'static str, &str)> {
        match self.mode {
            CostFilterMode::Sprint => self.sprint.map(|s| ("Sprint", s)),
            CostFilterMode::Milestone => self.milestone.map(|m| ("Milestone", m)),
        }
    }
}

/// Bucket key of an event for the given period.
///
/// Day uses the event's own `day` field; month and year derive from `start`
/// as `YYYY-MM` and `YYYY`, which sort chronologically as strings.
pub fn period_key(event: &CalendarEvent, period: Period) -> String {
    match period {
        Period::Day => event
            .day
            .as_deref()
            .map(str::trim)
            .filter(|day| !day.is_empty())
            .unwrap_or(UNKNOWN_DAY_KEY)
            .to_string(),
        Period::Month => event.start.format("%Y-%m").to_string(),
        Period::Year => event.start.format("%Y").to_string(),
    }
}

/// Summed cost per period key, ascending by key.
pub fn aggregate_costs(events: &[CalendarEvent], query: &CostQuery<'_>) -> Vec<CostBucket> {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();

    for event in events.iter().filter(|e| query.matches(e)) {
        *totals.entry(period_key(event, query.period)).or_insert(0.0) += event.cost;
    }

    totals
        .into_iter()
        .map(|(period, cost)| CostBucket { period, cost })
        .collect()
}

/// Every event as a calendar entry, in fetch order
pub fn calendar_entries(events: &[CalendarEvent]) -> Vec<CalendarEntry> {
    events
        .iter()
        .map(|event| CalendarEntry {
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            cost: event.cost,
            label: format!("{} - Cost: ${}", event.title, event.cost),
        })
        .collect()
}

/// Heading of the aggregated cost chart, e.g. `Costs by Month (Milestone: Beta)`
pub fn cost_chart_title(query: &CostQuery<'_>) -> String {
    let mut title = format!("Costs by {}", query.period.title());
    if let Some((dimension, value)) = query.active_filter() {
        if !value.is_empty() {
            title.push_str(&format!(" ({dimension}: {value})"));
        }
    }
    title
}

/// Cost of one meeting attended by the whole team.
///
/// Negative or non-finite inputs count as zero, so the cost is never negative.
pub fn meeting_cost(hourly_rate: f64, meeting_hours: f64, participants: usize) -> MeetingCostEstimate {
    let hourly_rate = non_negative(hourly_rate);
    let meeting_hours = non_negative(meeting_hours);
    let cost = hourly_rate * meeting_hours * participants as f64;
    let band = cost_band(cost, participants);

    MeetingCostEstimate {
        hourly_rate,
        meeting_hours,
        participants,
        cost,
        band,
        message: band_message(band).to_string(),
    }
}

/// Band of a meeting cost relative to a one-hour meeting at reference rates.
pub fn cost_band(cost: f64, participants: usize) -> CostBand {
    let participants = participants as f64;
    if cost > HIGH_COST_PER_PARTICIPANT * participants {
        CostBand::High
    } else if cost > MODERATE_COST_PER_PARTICIPANT * participants {
        CostBand::Moderate
    } else {
        CostBand::Low
    }
}

fn band_message(band: CostBand) -> &'static str {
    match band {
        CostBand::High => {
            "Potential savings: this meeting is expensive. Consider a shorter slot, fewer attendees, or an async update."
        }
        CostBand::Moderate => {
            "Moderate cost: check that the agenda needs everyone in the room."
        }
        CostBand::Low => "Meeting cost is within a reasonable range.",
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
