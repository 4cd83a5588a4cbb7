//! Latest-sprint insights
//!
//! Each rule is checked on its own; several can fire for the same sprint and
//! none is guaranteed to. Bug counts in (5, 10] fall between the moderate and
//! high rules and produce no bug insight.

use crate::types::{Insight, InsightKind, Sprint};

/// Completion below this share of the commitment is flagged
const LOW_COMPLETION_RATIO: f64 = 0.7;

/// Bug points strictly above this are flagged as high
const HIGH_BUG_POINTS: f64 = 10.0;

/// Bug points up to and including this (and above zero) are flagged as moderate
const MODERATE_BUG_POINTS: f64 = 5.0;

/// Feature points at or above this count as good output
const FEATURE_TARGET_POINTS: f64 = 15.0;

/// Insights for the most recent sprint; empty without sprints.
pub fn insights(sprints: &[Sprint]) -> Vec<Insight> {
    sprints.last().map(insights_for).unwrap_or_default()
}

pub fn insights_for(sprint: &Sprint) -> Vec<Insight> {
    let mut out = Vec::new();
    let (done, committed) = (sprint.completed, sprint.committed);

    if done < committed * LOW_COMPLETION_RATIO {
        out.push(insight(
            InsightKind::LowCompletion,
            format!(
                "Low completion rate: the sprint completed {done}/{committed} committed points. Look for blockers or overestimation."
            ),
        ));
    }

    if done >= committed {
        out.push(insight(
            InsightKind::CommitmentMet,
            format!("Commitment met: {done}/{committed} points finished."),
        ));
    }

    if sprint.bugs > HIGH_BUG_POINTS {
        out.push(insight(
            InsightKind::HighBugCount,
            format!(
                "High bug count: {} bug points were part of the completed work. Consider a quality focus.",
                sprint.bugs
            ),
        ));
    }

    if sprint.bugs > 0.0 && sprint.bugs <= MODERATE_BUG_POINTS {
        out.push(insight(
            InsightKind::ModerateBugCount,
            format!(
                "Moderate bug count: {} bug points completed. Keep an eye on quality practices.",
                sprint.bugs
            ),
        ));
    }

    if sprint.features < FEATURE_TARGET_POINTS && done > 0.0 {
        out.push(insight(
            InsightKind::LowFeatureOutput,
            format!(
                "Low feature output: only {} feature points delivered. Review planning or bandwidth if features are a priority.",
                sprint.features
            ),
        ));
    }

    if sprint.features >= FEATURE_TARGET_POINTS {
        out.push(insight(
            InsightKind::GoodFeatureOutput,
            format!(
                "Good feature output: {} feature points delivered.",
                sprint.features
            ),
        ));
    }

    out.push(insight(
        InsightKind::WorkBalance,
        format!(
            "Work balance: bugs {} points, features {} points, chores {} points. Check this split against the goals for the next sprint.",
            sprint.bugs, sprint.features, sprint.chores
        ),
    ));

    out
}

fn insight(kind: InsightKind, message: String) -> Insight {
    Insight { kind, message }
}
