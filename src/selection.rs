//! Selection and filter state
//!
//! Everything the user picks on the dashboard lives here. Setters normalize
//! their input (empty member names clear the filter, meeting inputs never go
//! negative); nothing in this module touches the raw records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::analytics::{member_list, milestone_filter_options, sprint_filter_options, CostQuery};
use crate::config::{DashboardConfig, DEFAULT_HOURLY_RATE, DEFAULT_MEETING_HOURS};
use crate::kudos::KudosFilters;
use crate::loader::DashboardData;
use crate::types::{ComparisonMember, CostFilterMode, Period};

/// Inputs of the single-meeting cost estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeetingInputs {
    pub hourly_rate: f64,
    pub meeting_hours: f64,
}

impl Default for MeetingInputs {
    fn default() -> Self {
        Self {
            hourly_rate: DEFAULT_HOURLY_RATE,
            meeting_hours: DEFAULT_MEETING_HOURS,
        }
    }
}

impl MeetingInputs {
    pub fn new(hourly_rate: f64, meeting_hours: f64) -> Self {
        Self {
            hourly_rate: clamp_input(hourly_rate),
            meeting_hours: clamp_input(meeting_hours),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    velocity_member: Option<String>,
    breakdown_sprint: Option<usize>,
    period: Period,
    cost_filter_mode: CostFilterMode,
    sprint_filter: Option<String>,
    milestone_filter: Option<String>,
    comparison_sprints: BTreeSet<usize>,
    comparison_first: ComparisonMember,
    comparison_second: ComparisonMember,
    kudos_filters: KudosFilters,
    meeting: MeetingInputs,
}

impl Default for SelectionState {
    /// Uninitialized state: nothing selected, stock meeting inputs
    fn default() -> Self {
        Self {
            velocity_member: None,
            breakdown_sprint: None,
            period: Period::default(),
            cost_filter_mode: CostFilterMode::default(),
            sprint_filter: None,
            milestone_filter: None,
            comparison_sprints: BTreeSet::new(),
            comparison_first: ComparisonMember::Team,
            comparison_second: ComparisonMember::Team,
            kudos_filters: KudosFilters::default(),
            meeting: MeetingInputs::default(),
        }
    }
}

impl SelectionState {
    /// Uninitialized state using the configured meeting inputs
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            meeting: MeetingInputs::new(config.hourly_rate, config.meeting_hours),
            ..Default::default()
        }
    }

    /// Apply the defaults that follow a (re)load of `data`.
    ///
    /// Period, filter mode, kudos filters and meeting inputs are left as they are.
    pub fn initialize(&mut self, data: &DashboardData) {
        let members = member_list(&data.sprints);

        self.velocity_member = None;
        self.breakdown_sprint = data.sprints.len().checked_sub(1);
        self.comparison_sprints = (0..data.sprints.len()).collect();

        let mut named = members.into_iter().map(ComparisonMember::Named);
        self.comparison_first = named.next().unwrap_or(ComparisonMember::Team);
        self.comparison_second = named.next().unwrap_or(ComparisonMember::Team);

        self.sprint_filter = sprint_filter_options(&data.events)
            .into_iter()
            .next()
            .map(|o| o.value);
        self.milestone_filter = milestone_filter_options(&data.events)
            .into_iter()
            .next()
            .map(|o| o.value);
    }

    /// State freshly initialized for `data`
    pub fn for_data(data: &DashboardData, config: &DashboardConfig) -> Self {
        let mut state = Self::from_config(config);
        state.initialize(data);
        state
    }

    pub fn velocity_member(&self) -> Option<&str> {
        self.velocity_member.as_deref()
    }

    /// `None` or an empty name shows the whole team
    pub fn set_velocity_member(&mut self, member: Option<String>) {
        self.velocity_member = member.filter(|m| !m.is_empty());
    }

    pub fn breakdown_sprint(&self) -> Option<usize> {
        self.breakdown_sprint
    }

    pub fn set_breakdown_sprint(&mut self, index: Option<usize>) {
        self.breakdown_sprint = index;
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    pub fn cost_filter_mode(&self) -> CostFilterMode {
        self.cost_filter_mode
    }

    /// Switching modes keeps both filter values
    pub fn set_cost_filter_mode(&mut self, mode: CostFilterMode) {
        self.cost_filter_mode = mode;
    }

    pub fn sprint_filter(&self) -> Option<&str> {
        self.sprint_filter.as_deref()
    }

    pub fn set_sprint_filter(&mut self, sprint: Option<String>) {
        self.sprint_filter = sprint;
    }

    pub fn milestone_filter(&self) -> Option<&str> {
        self.milestone_filter.as_deref()
    }

    pub fn set_milestone_filter(&mut self, milestone: Option<String>) {
        self.milestone_filter = milestone;
    }

    pub fn comparison_sprints(&self) -> &BTreeSet<usize> {
        &self.comparison_sprints
    }

    pub fn set_comparison_sprints(&mut self, indexes: impl IntoIterator<Item = usize>) {
        self.comparison_sprints = indexes.into_iter().collect();
    }

    /// Add or remove one sprint from the comparison; returns whether it is now selected
    pub fn toggle_comparison_sprint(&mut self, index: usize) -> bool {
        if self.comparison_sprints.remove(&index) {
            false
        } else {
            self.comparison_sprints.insert(index);
            true
        }
    }

    pub fn comparison_members(&self) -> (&ComparisonMember, &ComparisonMember) {
        (&self.comparison_first, &self.comparison_second)
    }

    pub fn set_comparison_members(&mut self, first: ComparisonMember, second: ComparisonMember) {
        self.comparison_first = first;
        self.comparison_second = second;
    }

    pub fn kudos_filters(&self) -> &KudosFilters {
        &self.kudos_filters
    }

    pub fn set_kudos_filters(&mut self, filters: KudosFilters) {
        self.kudos_filters = filters;
    }

    pub fn meeting(&self) -> MeetingInputs {
        self.meeting
    }

    pub fn set_hourly_rate(&mut self, rate: f64) {
        self.meeting.hourly_rate = clamp_input(rate);
    }

    pub fn set_meeting_hours(&mut self, hours: f64) {
        self.meeting.meeting_hours = clamp_input(hours);
    }

    /// Cost chart parameters for the current picks
    pub fn cost_query(&self) -> CostQuery<'_> {
        CostQuery {
            period: self.period,
            mode: self.cost_filter_mode,
            sprint: self.sprint_filter.as_deref(),
            milestone: self.milestone_filter.as_deref(),
        }
    }
}

fn clamp_input(value: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}
