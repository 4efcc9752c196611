//! Status classification: mapping a project's status payload to the one
//! canonical UI state its presentation is derived from.
//!
//! The rules are strictly ordered. In particular, a project with no build
//! history ("previous result unknown") is only *inactive* when it is not
//! building; an unknown history with a build in flight classifies as
//! `building_unknown`.

use crate::snapshot::{BuildingInfo, CurrentStatus, PreviousResult};
use std::fmt;

/// Canonical UI state of a project.
///
/// `Queued`, `Paused` and `Discontinued` carry the previous result as a
/// qualifier; `Queued(Unknown)` renders as the special "queued inactive"
/// pair. `Building` always carries the previous result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Passed,
    Failed,
    Inactive,
    Building(PreviousResult),
    Queued(PreviousResult),
    Paused(PreviousResult),
    Discontinued(PreviousResult),
}

impl UiState {
    /// The CSS-style class string for this state, lower-case.
    pub fn css_class(&self) -> String {
        self.css_class_with_prefix("")
    }

    /// Class string with a prefix applied to result-bearing classes.
    ///
    /// Used by the tooltip observer (`tooltip_passed`, `tooltip_building_failed`).
    /// The bare `inactive` forms are deliberately left unprefixed, matching
    /// the original dashboard styling.
    pub fn css_class_with_prefix(&self, prefix: &str) -> String {
        match self {
            UiState::Passed => format!("{prefix}passed"),
            UiState::Failed => format!("{prefix}failed"),
            UiState::Inactive => "inactive".to_string(),
            UiState::Building(result) => format!("{prefix}building_{}", result.as_str()),
            UiState::Queued(PreviousResult::Unknown) => "queued inactive".to_string(),
            UiState::Queued(result) => format!("queued {prefix}{}", result.as_str()),
            UiState::Paused(result) => format!("paused {prefix}{}", result.as_str()),
            UiState::Discontinued(result) => format!("discontinued {prefix}{}", result.as_str()),
        }
    }

    pub fn is_building(&self) -> bool {
        matches!(self, UiState::Building(_))
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_class())
    }
}

/// Classify a project's status payload. Pure and total: unparsable status
/// fields have already collapsed to `Waiting`/`Unknown` at ingest, so every
/// input maps to exactly one state.
pub fn classify(info: &BuildingInfo) -> UiState {
    let status = info.current_status();
    let result = info.previous_result();

    if result == PreviousResult::Unknown && status == CurrentStatus::Queued {
        return UiState::Queued(PreviousResult::Unknown);
    }
    if result == PreviousResult::Unknown && status != CurrentStatus::Building {
        return UiState::Inactive;
    }
    match status {
        CurrentStatus::Queued => UiState::Queued(result),
        CurrentStatus::Paused => UiState::Paused(result),
        CurrentStatus::Discontinued => UiState::Discontinued(result),
        CurrentStatus::Building => UiState::Building(result),
        CurrentStatus::Waiting => match result {
            PreviousResult::Passed => UiState::Passed,
            PreviousResult::Failed => UiState::Failed,
            // Unreachable in practice: unknown + waiting was caught above.
            PreviousResult::Unknown => UiState::Inactive,
        },
    }
}

/// A project with no known build history that is not actively building.
pub fn is_inactive(info: &BuildingInfo) -> bool {
    info.previous_result() == PreviousResult::Unknown
        && info.current_status() != CurrentStatus::Building
}

pub fn is_building(info: &BuildingInfo) -> bool {
    info.current_status() == CurrentStatus::Building
}

pub fn is_paused(info: &BuildingInfo) -> bool {
    info.current_status() == CurrentStatus::Paused
}

pub fn is_discontinued(info: &BuildingInfo) -> bool {
    info.current_status() == CurrentStatus::Discontinued
}

pub fn is_queued(info: &BuildingInfo) -> bool {
    info.current_status() == CurrentStatus::Queued
}

/// Whether the force-build control should be disabled for this project.
///
/// Disabled when force build is switched off globally, or the project is
/// discontinued, paused, or already building.
pub fn should_force_build_be_disabled(info: &BuildingInfo, force_build_enabled: bool) -> bool {
    !force_build_enabled || is_discontinued(info) || is_paused(info) || is_building(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::info;

    #[test]
    fn test_queued_with_unknown_history_is_queued_inactive() {
        let state = classify(&info("api", "Queued", "Unknown"));
        assert_eq!(state, UiState::Queued(PreviousResult::Unknown));
        assert_eq!(state.css_class(), "queued inactive");
    }

    #[test]
    fn test_unknown_history_not_building_is_inactive() {
        assert_eq!(classify(&info("api", "Waiting", "Unknown")), UiState::Inactive);
        assert_eq!(classify(&info("api", "Paused", "Unknown")), UiState::Inactive);
        assert_eq!(classify(&info("api", "Discontinued", "Unknown")), UiState::Inactive);
    }

    #[test]
    fn test_unknown_history_building_is_building_unknown() {
        // Rule 2 must not swallow the building case.
        let state = classify(&info("api", "Building", "Unknown"));
        assert_eq!(state, UiState::Building(PreviousResult::Unknown));
        assert_eq!(state.css_class(), "building_unknown");
    }

    #[test]
    fn test_queued_keeps_previous_result() {
        assert_eq!(
            classify(&info("api", "Queued", "Passed")).css_class(),
            "queued passed"
        );
        assert_eq!(
            classify(&info("api", "Queued", "Failed")).css_class(),
            "queued failed"
        );
    }

    #[test]
    fn test_paused_and_discontinued_keep_previous_result() {
        assert_eq!(
            classify(&info("api", "Paused", "Failed")).css_class(),
            "paused failed"
        );
        assert_eq!(
            classify(&info("api", "Discontinued", "Passed")).css_class(),
            "discontinued passed"
        );
    }

    #[test]
    fn test_building_carries_previous_result() {
        assert_eq!(
            classify(&info("api", "Building", "Passed")).css_class(),
            "building_passed"
        );
        assert_eq!(
            classify(&info("api", "Building", "Failed")).css_class(),
            "building_failed"
        );
    }

    #[test]
    fn test_plain_results() {
        assert_eq!(classify(&info("api", "Waiting", "Passed")), UiState::Passed);
        assert_eq!(classify(&info("api", "Waiting", "Failed")), UiState::Failed);
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        assert_eq!(
            classify(&info("api", "BUILDING", "passed")).css_class(),
            "building_passed"
        );
    }

    #[test]
    fn test_every_status_result_pair_has_exactly_one_state() {
        let statuses = ["Building", "Queued", "Paused", "Discontinued", "Waiting"];
        let results = ["Passed", "Failed", "Unknown"];
        for status in statuses {
            for result in results {
                let class = classify(&info("api", status, result)).css_class();
                assert!(!class.is_empty(), "{status}/{result} produced no class");
            }
        }
    }

    #[test]
    fn test_css_class_with_prefix() {
        assert_eq!(
            classify(&info("api", "Waiting", "Passed")).css_class_with_prefix("tooltip_"),
            "tooltip_passed"
        );
        assert_eq!(
            classify(&info("api", "Building", "Failed")).css_class_with_prefix("tooltip_"),
            "tooltip_building_failed"
        );
        // inactive stays unprefixed
        assert_eq!(
            classify(&info("api", "Waiting", "Unknown")).css_class_with_prefix("tooltip_"),
            "inactive"
        );
        assert_eq!(
            classify(&info("api", "Queued", "Unknown")).css_class_with_prefix("tooltip_"),
            "queued inactive"
        );
    }

    #[test]
    fn test_force_build_disabled_predicate() {
        assert!(should_force_build_be_disabled(
            &info("api", "Building", "Passed"),
            true
        ));
        assert!(should_force_build_be_disabled(
            &info("api", "Paused", "Passed"),
            true
        ));
        assert!(should_force_build_be_disabled(
            &info("api", "Discontinued", "Passed"),
            true
        ));
        assert!(!should_force_build_be_disabled(
            &info("api", "Waiting", "Passed"),
            true
        ));
        // global switch wins over everything
        assert!(should_force_build_be_disabled(
            &info("api", "Waiting", "Passed"),
            false
        ));
    }

    #[test]
    fn test_inactive_predicate() {
        assert!(is_inactive(&info("api", "Waiting", "Unknown")));
        assert!(is_inactive(&info("api", "Queued", "Unknown")));
        assert!(!is_inactive(&info("api", "Building", "Unknown")));
        assert!(!is_inactive(&info("api", "Waiting", "Passed")));
    }
}
