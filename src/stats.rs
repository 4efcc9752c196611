//! Snapshot aggregation for the summary line.

use crate::classify;
use crate::snapshot::{PreviousResult, ProjectSnapshot};

/// Summary counts over one snapshot array.
///
/// `total` excludes inactive and discontinued projects: a project with no
/// build history, or one nobody can build anymore, should not dilute the
/// pass rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub passed: usize,
    pub failed: usize,
    pub building: usize,
    pub inactive: usize,
    pub discontinued: usize,
    pub total: usize,
}

impl StatusSummary {
    /// Pass rate over `total`, rendered as `"NN%"`. A zero denominator
    /// yields `"0%"` -- NaN never reaches the rendering surface.
    pub fn rate(&self) -> String {
        if self.total == 0 {
            return "0%".to_string();
        }
        let rate = (self.passed as f64 / self.total as f64 * 100.0).round() as u64;
        format!("{rate}%")
    }
}

/// Reduce a snapshot array into summary counts, skipping holes.
///
/// Bucket order: building wins over everything, then discontinued, then
/// inactive; otherwise the project counts under its previous result.
pub fn aggregate(snapshots: &[Option<ProjectSnapshot>]) -> StatusSummary {
    let mut summary = StatusSummary::default();

    for snapshot in snapshots.iter().flatten() {
        let info = &snapshot.building_info;
        if classify::is_building(info) {
            summary.building += 1;
        } else if classify::is_discontinued(info) {
            summary.discontinued += 1;
        } else if classify::is_inactive(info) {
            summary.inactive += 1;
        } else {
            match info.previous_result() {
                PreviousResult::Passed => summary.passed += 1,
                PreviousResult::Failed => summary.failed += 1,
                // Unreachable: an unknown history already landed in the
                // building, discontinued, or inactive bucket above.
                PreviousResult::Unknown => {}
            }
        }
    }

    summary.total = summary.passed + summary.failed + summary.building;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::snapshot;

    #[test]
    fn test_aggregate_buckets_and_rate() {
        let snapshots = vec![
            Some(snapshot("a", "Waiting", "Passed")),
            Some(snapshot("b", "Waiting", "Passed")),
            Some(snapshot("c", "Waiting", "Failed")),
            Some(snapshot("d", "Building", "Passed")),
            Some(snapshot("e", "Waiting", "Unknown")),
        ];
        let summary = aggregate(&snapshots);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.building, 1);
        assert_eq!(summary.inactive, 1);
        assert_eq!(summary.discontinued, 0);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.rate(), "50%");
    }

    #[test]
    fn test_aggregate_skips_holes() {
        let snapshots = vec![
            None,
            Some(snapshot("a", "Waiting", "Passed")),
            None,
        ];
        let summary = aggregate(&snapshots);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.rate(), "100%");
    }

    #[test]
    fn test_aggregate_all_inactive_has_zero_rate() {
        let snapshots = vec![
            Some(snapshot("a", "Waiting", "Unknown")),
            Some(snapshot("b", "Queued", "Unknown")),
        ];
        let summary = aggregate(&snapshots);
        assert_eq!(summary.inactive, 2);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.rate(), "0%");
    }

    #[test]
    fn test_discontinued_excluded_from_total() {
        let snapshots = vec![
            Some(snapshot("a", "Waiting", "Passed")),
            Some(snapshot("b", "Discontinued", "Failed")),
        ];
        let summary = aggregate(&snapshots);
        assert_eq!(summary.discontinued, 1);
        assert_eq!(summary.total, 1);
        assert_eq!(summary.rate(), "100%");
    }

    #[test]
    fn test_unknown_history_never_counts_toward_total() {
        for status in ["Waiting", "Queued", "Paused", "Discontinued", "Building"] {
            let summary = aggregate(&[Some(snapshot("a", status, "Unknown"))]);
            assert_eq!(summary.passed + summary.failed, 0, "{status}");
            let expected_total = usize::from(status == "Building");
            assert_eq!(summary.total, expected_total, "{status}");
        }
    }

    #[test]
    fn test_empty_input() {
        let summary = aggregate(&[]);
        assert_eq!(summary, StatusSummary::default());
        assert_eq!(summary.rate(), "0%");
    }
}
