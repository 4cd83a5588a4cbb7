//! Dashboard orchestration
//!
//! [`Dashboard`] owns the loaded records, the selection state and the kudos
//! store. [`Dashboard::view`] runs every aggregation against the current
//! selection and returns the complete set of view-models; nothing derived is
//! kept between calls.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::{
    aggregate_costs, calendar_entries, comparison_member_options, comparison_series,
    cost_chart_title, insights, kudos_tag_options, meeting_cost, member_list,
    milestone_filter_options, recipient_options, sprint_filter_options, sprint_options,
    velocity_member_options, velocity_series, work_breakdown,
};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::kudos::{KudosCard, KudosDraft, KudosStore, KudosValidationError};
use crate::loader::{load_dashboard_data, DashboardData};
use crate::selection::SelectionState;
use crate::source::DataSource;
use crate::types::{
    BreakdownSlice, CalendarEntry, ComparisonMember, ComparisonRow, CostBucket, Insight, Kudos,
    KudosTag, MeetingCostEstimate, SelectOption, VelocityPoint,
};

/// Every picker's choices for the current data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOptions {
    pub velocity_members: Vec<SelectOption<Option<String>>>,
    pub comparison_members: Vec<SelectOption<ComparisonMember>>,
    pub sprints: Vec<SelectOption<usize>>,
    pub sprint_filters: Vec<SelectOption<String>>,
    pub milestone_filters: Vec<SelectOption<String>>,
    /// Recipients for filtering the feed
    pub kudos_recipients: Vec<SelectOption<String>>,
    /// Recipients for a new kudos; excludes the current user
    pub kudos_form_recipients: Vec<SelectOption<String>>,
    pub kudos_tags: Vec<SelectOption<KudosTag>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownView {
    pub sprint: Option<String>,
    pub slices: Vec<BreakdownSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostView {
    pub title: String,
    pub buckets: Vec<CostBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsView {
    /// Label of the sprint the insights describe
    pub sprint: Option<String>,
    pub items: Vec<Insight>,
}

/// All derived view-models for one render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub members: Vec<String>,
    pub options: DashboardOptions,
    pub velocity: Vec<VelocityPoint>,
    pub breakdown: BreakdownView,
    pub comparison: Vec<ComparisonRow>,
    pub costs: CostView,
    /// All meetings, unaffected by the cost filters
    pub calendar: Vec<CalendarEntry>,
    pub meeting: MeetingCostEstimate,
    pub insights: InsightsView,
    pub kudos: Vec<KudosCard>,
    pub selection: SelectionState,
}

/// One dashboard session
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: DashboardConfig,
    data: DashboardData,
    selection: SelectionState,
    kudos: KudosStore,
}

impl Dashboard {
    /// A dashboard with no data loaded: empty collections, unset selections
    pub fn empty(config: DashboardConfig) -> Self {
        Self {
            selection: SelectionState::from_config(&config),
            config,
            data: DashboardData::default(),
            kudos: KudosStore::new(),
        }
    }

    /// A dashboard over already-loaded records with load-time defaults applied
    pub fn from_data(config: DashboardConfig, data: DashboardData) -> Self {
        Self {
            selection: SelectionState::for_data(&data, &config),
            config,
            data,
            kudos: KudosStore::new(),
        }
    }

    /// Fetch both record sets from `source` and build the session.
    ///
    /// On failure no dashboard is produced; callers typically fall back to
    /// [`Dashboard::empty`] and show [`DashboardError::user_message`].
    pub async fn load(
        config: DashboardConfig,
        source: &dyn DataSource,
    ) -> Result<Self, DashboardError> {
        let data = load_dashboard_data(source).await?;
        Ok(Self::from_data(config, data))
    }

    /// Replace the kudos store, e.g. with [`KudosStore::with_sample_feed`]
    pub fn with_kudos(mut self, kudos: KudosStore) -> Self {
        self.kudos = kudos;
        self
    }

    /// Swap in freshly loaded records and reapply load-time defaults.
    /// The kudos store is kept.
    pub fn reload(&mut self, data: DashboardData) {
        self.data = data;
        self.selection.initialize(&self.data);
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionState {
        &mut self.selection
    }

    pub fn kudos(&self) -> &KudosStore {
        &self.kudos
    }

    pub fn members(&self) -> Vec<String> {
        member_list(&self.data.sprints)
    }

    /// Send a kudos as the configured current user
    pub fn send_kudos(
        &mut self,
        recipient: Option<String>,
        tag: Option<KudosTag>,
        message: impl Into<String>,
        is_anonymous: bool,
    ) -> Result<&Kudos, KudosValidationError> {
        let draft = KudosDraft {
            sender: self.config.current_user.clone(),
            recipient,
            tag,
            message: message.into(),
            is_anonymous,
        };
        self.kudos.submit(draft)
    }

    /// Accept a prepared draft, e.g. one carrying an injected sender
    pub fn submit_kudos(&mut self, draft: KudosDraft) -> Result<&Kudos, KudosValidationError> {
        self.kudos.submit(draft)
    }

    pub fn options(&self) -> DashboardOptions {
        let members = self.members();
        DashboardOptions {
            velocity_members: velocity_member_options(&members),
            comparison_members: comparison_member_options(&members),
            sprints: sprint_options(&self.data.sprints),
            sprint_filters: sprint_filter_options(&self.data.events),
            milestone_filters: milestone_filter_options(&self.data.events),
            kudos_recipients: recipient_options(&members, None),
            kudos_form_recipients: recipient_options(&members, Some(self.config.current_user.as_str())),
            kudos_tags: kudos_tag_options(),
        }
    }

    /// Recompute every view-model from the raw records and current selection
    pub fn view(&self) -> DashboardView {
        let sprints = &self.data.sprints;
        let selection = &self.selection;
        debug!(
            sprints = sprints.len(),
            events = self.data.events.len(),
            kudos = self.kudos.len(),
            "recomputing dashboard view"
        );

        let members = member_list(sprints);
        let breakdown_index = selection.breakdown_sprint();
        let (first, second) = selection.comparison_members();
        let query = selection.cost_query();
        let meeting = selection.meeting();

        DashboardView {
            options: self.options(),
            velocity: velocity_series(sprints, selection.velocity_member()),
            breakdown: BreakdownView {
                sprint: breakdown_index
                    .and_then(|i| sprints.get(i))
                    .map(|s| s.sprint.clone()),
                slices: work_breakdown(sprints, breakdown_index),
            },
            comparison: comparison_series(sprints, selection.comparison_sprints(), first, second),
            costs: CostView {
                title: cost_chart_title(&query),
                buckets: aggregate_costs(&self.data.events, &query),
            },
            calendar: calendar_entries(&self.data.events),
            meeting: meeting_cost(meeting.hourly_rate, meeting.meeting_hours, members.len()),
            insights: InsightsView {
                sprint: sprints.last().map(|s| s.sprint.clone()),
                items: insights(sprints),
            },
            kudos: self.kudos.cards(selection.kudos_filters()),
            selection: selection.clone(),
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{event, sprint};
    use crate::kudos::KudosFilters;
    use crate::source::FixtureSource;
    use crate::types::{CostBand, CostFilterMode, Period};
    use pretty_assertions::assert_eq;

    fn sample_data() -> DashboardData {
        let mut s1 = sprint("Sprint 1", 20.0, 18.0, &[("Alice", 10.0), ("Bob", 8.0)]);
        s1.bugs = 2.0;
        let mut s2 = sprint("Sprint 2", 24.0, 12.0, &[("Alice", 5.0), ("Bob", 7.0)]);
        s2.bugs = 12.0;
        s2.features = 4.0;
        s2.chores = 1.0;

        DashboardData::new(
            vec![s1, s2],
            vec![
                event("2025-04-01T10:00:00Z", 100.0, "Sprint 1", "Alpha", Some("2025-04-01")),
                event("2025-04-01T15:00:00Z", 50.0, "Sprint 1", "Alpha", Some("2025-04-01")),
                event("2025-05-03T10:00:00Z", 80.0, "Sprint 2", "Beta", Some("2025-05-03")),
            ],
        )
    }

    #[test]
    fn test_view_uses_load_defaults() {
        let dashboard = Dashboard::from_data(DashboardConfig::default(), sample_data());
        let view = dashboard.view();

        assert_eq!(view.members, vec!["Alice".to_string(), "Bob".to_string()]);
        assert_eq!(view.velocity.len(), 2);
        assert_eq!(view.breakdown.sprint.as_deref(), Some("Sprint 2"));
        assert_eq!(view.breakdown.slices[0].value, 12.0);
        assert_eq!(view.comparison.len(), 2);
        assert_eq!(view.comparison[1].values["Bob"], 7.0);
        assert_eq!(view.costs.title, "Costs by Day (Sprint: Sprint 1)");
        assert_eq!(view.costs.buckets.len(), 1);
        assert_eq!(view.costs.buckets[0].cost, 150.0);
        assert_eq!(view.calendar.len(), 3);
        assert_eq!(view.calendar[2].label, "Sprint 2 meeting - Cost: $80");
        assert_eq!(view.meeting.cost, 100.0);
        assert_eq!(view.meeting.band, CostBand::Moderate);
        assert_eq!(view.insights.sprint.as_deref(), Some("Sprint 2"));
        assert!(view.kudos.is_empty());
    }

    #[test]
    fn test_selection_changes_are_reflected_without_touching_data() {
        let mut dashboard = Dashboard::from_data(DashboardConfig::default(), sample_data());
        let before = dashboard.data().clone();

        let selection = dashboard.selection_mut();
        selection.set_velocity_member(Some("Alice".to_string()));
        selection.set_period(Period::Month);
        selection.set_cost_filter_mode(CostFilterMode::Milestone);
        selection.set_milestone_filter(Some("Beta".to_string()));
        selection.set_comparison_sprints([0]);

        let view = dashboard.view();
        assert_eq!(view.velocity[0].completed, 10.0);
        assert_eq!(view.costs.title, "Costs by Month (Milestone: Beta)");
        assert_eq!(view.costs.buckets[0].period, "2025-05");
        assert_eq!(view.comparison.len(), 1);
        assert_eq!(dashboard.data(), &before);
    }

    #[test]
    fn test_empty_dashboard_never_panics() {
        let dashboard = Dashboard::empty(DashboardConfig::default());
        let view = dashboard.view();

        assert!(view.members.is_empty());
        assert!(view.velocity.is_empty());
        assert!(view.breakdown.slices.is_empty());
        assert!(view.comparison.is_empty());
        assert!(view.costs.buckets.is_empty());
        assert_eq!(view.costs.title, "Costs by Day");
        assert_eq!(view.meeting.cost, 0.0);
        assert!(view.insights.items.is_empty());
        assert_eq!(view.options.velocity_members.len(), 1);
    }

    #[test]
    fn test_send_kudos_uses_current_user() {
        let mut dashboard = Dashboard::from_data(DashboardConfig::default(), sample_data());
        let kudos = dashboard
            .send_kudos(Some("Bob".to_string()), Some(KudosTag::Pairing), "nice", false)
            .unwrap();
        assert_eq!(kudos.sender, "Entire Team");

        let err = dashboard
            .send_kudos(Some("Bob".to_string()), None, "nice", false)
            .unwrap_err();
        assert_eq!(err, KudosValidationError::MissingTag);
        assert_eq!(dashboard.kudos().len(), 1);
    }

    #[test]
    fn test_kudos_feed_follows_filters() {
        let mut dashboard = Dashboard::from_data(DashboardConfig::default(), sample_data())
            .with_kudos(KudosStore::with_sample_feed());
        dashboard.selection_mut().set_kudos_filters(KudosFilters {
            recipient: Some("Alice".to_string()),
            tag: None,
        });

        let view = dashboard.view();
        assert_eq!(view.kudos.len(), 1);
        assert_eq!(view.kudos[0].recipient, "Alice");
    }

    #[test]
    fn test_form_recipients_exclude_current_user() {
        let config = DashboardConfig {
            current_user: "Alice".to_string(),
            ..Default::default()
        };
        let options = Dashboard::from_data(config, sample_data()).options();
        let labels: Vec<&str> = options
            .kudos_form_recipients
            .iter()
            .map(|o| o.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Bob"]);
        assert_eq!(options.kudos_recipients.len(), 2);
    }

    #[test]
    fn test_reload_reapplies_defaults_and_keeps_kudos() {
        let mut dashboard = Dashboard::empty(DashboardConfig::default())
            .with_kudos(KudosStore::with_sample_feed());
        dashboard.reload(sample_data());

        assert_eq!(dashboard.selection().breakdown_sprint(), Some(1));
        assert_eq!(dashboard.kudos().len(), 4);
    }

    #[tokio::test]
    async fn test_load_from_fixtures() {
        let source = FixtureSource::from_json(
            r#"[{"sprint":"Sprint 1","committed":10,"completed":9,"bugs":1,"features":6,"chores":2,
                "members":{"Zed":{"completed":4},"Amy":{"completed":5}}}]"#,
            r#"[{"title":"Standup","start":"2025-04-01T09:00:00Z","end":"2025-04-01T09:15:00Z",
                "cost":25,"sprint":"Sprint 1","milestone":"Alpha","day":"2025-04-01"}]"#,
        );

        let dashboard = Dashboard::load(DashboardConfig::default(), &source)
            .await
            .unwrap();
        let view = dashboard.view();
        assert_eq!(view.members, vec!["Zed".to_string(), "Amy".to_string()]);
        assert_eq!(view.costs.buckets[0].cost, 25.0);
    }

    #[tokio::test]
    async fn test_payload_member_order_drives_defaults() {
        let source = FixtureSource::from_json(
            r#"[{"sprint":"Sprint 1","committed":9,"completed":9,
                "members":{"Zed":{"completed":4},"Amy":{"completed":3},"Bo":{"completed":2}}}]"#,
            "[]",
        );

        let dashboard = Dashboard::load(DashboardConfig::default(), &source)
            .await
            .unwrap();
        assert_eq!(dashboard.members(), vec!["Zed", "Amy", "Bo"]);
        assert_eq!(
            dashboard.selection().comparison_members(),
            (
                &ComparisonMember::Named("Zed".to_string()),
                &ComparisonMember::Named("Amy".to_string())
            )
        );

        let labels: Vec<String> = dashboard
            .options()
            .comparison_members
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["Entire Team", "Zed", "Amy", "Bo"]);
    }

    #[tokio::test]
    async fn test_demo_fixtures_load() {
        let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/fixtures");
        let source = FixtureSource::from_dir(&dir);

        let dashboard = Dashboard::load(DashboardConfig::default(), &source)
            .await
            .unwrap();
        let view = dashboard.view();
        assert_eq!(view.members.len(), 4);
        assert_eq!(view.velocity.len(), 3);
        assert_eq!(view.options.milestone_filters.len(), 2);

        let kinds: Vec<_> = view.insights.items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                crate::types::InsightKind::LowCompletion,
                crate::types::InsightKind::HighBugCount,
                crate::types::InsightKind::LowFeatureOutput,
                crate::types::InsightKind::WorkBalance,
            ]
        );
    }

    #[tokio::test]
    async fn test_load_failure_produces_no_dashboard() {
        let source = FixtureSource::from_json("[]", "not json");
        let err = Dashboard::load(DashboardConfig::default(), &source)
            .await
            .unwrap_err();
        assert!(err.is_load_failure());
    }
}
