//! Work breakdown of a single sprint

use crate::types::{BreakdownSlice, Sprint, WorkCategory};

/// Bugs, features and chores of the sprint at `index`.
///
/// Empty when no sprint is selected or the index is past the series end.
pub fn work_breakdown(sprints: &[Sprint], index: Option<usize>) -> Vec<BreakdownSlice> {
    index
        .and_then(|i| sprints.get(i))
        .map(breakdown_for)
        .unwrap_or_default()
}

pub fn breakdown_for(sprint: &Sprint) -> Vec<BreakdownSlice> {
    vec![
        BreakdownSlice {
            name: WorkCategory::Bugs,
            value: sprint.bugs,
        },
        BreakdownSlice {
            name: WorkCategory::Features,
            value: sprint.features,
        },
        BreakdownSlice {
            name: WorkCategory::Chores,
            value: sprint.chores,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::sprint;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_breakdown_order_and_values() {
        let mut s = sprint("Sprint 1", 20.0, 18.0, &[]);
        s.bugs = 3.0;
        s.features = 12.0;
        s.chores = 5.0;

        let slices = work_breakdown(&[s], Some(0));
        let pairs: Vec<(&str, f64)> = slices.iter().map(|s| (s.name.as_str(), s.value)).collect();
        assert_eq!(pairs, vec![("Bugs", 3.0), ("Features", 12.0), ("Chores", 5.0)]);
    }

    #[test]
    fn test_no_selection_is_empty() {
        let sprints = vec![sprint("Sprint 1", 1.0, 1.0, &[])];
        assert!(work_breakdown(&sprints, None).is_empty());
        assert!(work_breakdown(&sprints, Some(4)).is_empty());
        assert!(work_breakdown(&[], Some(0)).is_empty());
    }

    #[test]
    fn test_slice_names_serialize_capitalized() {
        let s = sprint("Sprint 1", 1.0, 1.0, &[]);
        let json = serde_json::to_value(breakdown_for(&s)).unwrap();
        assert_eq!(json[0]["name"], "Bugs");
        assert_eq!(json[2]["name"], "Chores");
    }
}
