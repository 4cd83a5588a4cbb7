//! Velocity and member comparison series

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{ComparisonMember, ComparisonRow, Sprint, VelocityPoint};

/// Committed vs. completed points for every sprint, in series order.
///
/// With a member filter, `completed` is that member's delivery, or 0 for a
/// sprint where the member has no entry. The output always has one point per
/// sprint.
pub fn velocity_series(sprints: &[Sprint], member: Option<&str>) -> Vec<VelocityPoint> {
    sprints
        .iter()
        .map(|sprint| VelocityPoint {
            sprint: sprint.sprint.clone(),
            committed: sprint.committed,
            completed: match member {
                Some(name) => member_completed(sprint, name),
                None => sprint.completed,
            },
        })
        .collect()
}

/// Side-by-side delivery of two selections over the chosen sprints.
///
/// Rows follow series order; indexes outside the series are ignored. When both
/// selections share a series key the second one's value is kept.
pub fn comparison_series(
    sprints: &[Sprint],
    selected: &BTreeSet<usize>,
    first: &ComparisonMember,
    second: &ComparisonMember,
) -> Vec<ComparisonRow> {
    sprints
        .iter()
        .enumerate()
        .filter(|(index, _)| selected.contains(index))
        .map(|(_, sprint)| {
            let mut values = BTreeMap::new();
            values.insert(first.series_key().to_string(), resolve(sprint, first));
            values.insert(second.series_key().to_string(), resolve(sprint, second));
            ComparisonRow {
                sprint: sprint.sprint.clone(),
                values,
            }
        })
        .collect()
}

fn resolve(sprint: &Sprint, member: &ComparisonMember) -> f64 {
    match member {
        ComparisonMember::Team => sprint.completed,
        ComparisonMember::Named(name) => member_completed(sprint, name),
    }
}

fn member_completed(sprint: &Sprint, name: &str) -> f64 {
    sprint
        .members
        .get(name)
        .map(|data| data.completed)
        .unwrap_or(0.0)
}
