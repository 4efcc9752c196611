//! The rendering surface seam.
//!
//! The synchronization core never touches a concrete UI directly; it issues
//! element-level commands against a [`RenderSurface`]. Every mutator is a
//! silent no-op when the target element does not exist -- a page (or view)
//! legitimately may not contain every possible element, and a late update
//! to a removed element must never be an error.

use std::collections::HashMap;

/// Element ids follow the original dashboard naming: per-project ids are
/// derived from the project name, page-level ids are fixed.
pub mod element_id {
    pub fn profile(project: &str) -> String {
        format!("{project}_profile")
    }

    pub fn bar(project: &str) -> String {
        format!("{project}_bar")
    }

    pub fn bar_link(project: &str) -> String {
        format!("{project}_bar_link")
    }

    pub fn build_date(project: &str) -> String {
        format!("{project}_build_date")
    }

    pub fn build_detail(project: &str) -> String {
        format!("{project}_build_detail")
    }

    pub fn force_build(project: &str) -> String {
        format!("{project}_forcebuild")
    }

    pub fn config_panel(project: &str) -> String {
        format!("{project}_config_panel")
    }

    pub fn level(project: &str) -> String {
        format!("{project}_level")
    }

    pub fn timer(project: &str) -> String {
        format!("{project}_timer")
    }

    pub fn tooltip(project: &str) -> String {
        format!("tooltip_{project}")
    }

    pub fn tooltip_name(project: &str) -> String {
        format!("tooltip_{project}_name")
    }

    pub fn tooltip_status(project: &str) -> String {
        format!("tooltip_{project}_status")
    }

    pub fn tooltip_date(project: &str) -> String {
        format!("tooltip_{project}_date")
    }

    pub const DETAIL_SUMMARY: &str = "build_detail_summary_container";
    pub const DETAIL_STATUS: &str = "build_detail_status";
    pub const DETAIL_LINK: &str = "build_detail_link";
    pub const SERVICE_BANNER: &str = "cruisecontrol_status";

    pub const STATISTICS_PASSED: &str = "statistics_passed";
    pub const STATISTICS_FAILED: &str = "statistics_failed";
    pub const STATISTICS_BUILDING: &str = "statistics_building";
    pub const STATISTICS_INACTIVE: &str = "statistics_inactive";
    pub const STATISTICS_TOTAL: &str = "statistics_total";
    pub const STATISTICS_RATE: &str = "statistics_rate";
}

/// The nine canonical status classes. `clear_status_classes` strips these
/// (and their `tooltip_`/`level_` derived forms) while leaving structural
/// classes like `tooltip` or `bar` alone.
const STATUS_CLASSES: [&str; 9] = [
    "passed",
    "failed",
    "building_passed",
    "building_failed",
    "building_unknown",
    "inactive",
    "discontinued",
    "paused",
    "queued",
];

/// Whether a class is a status class that the periodic refresh owns.
pub fn is_status_class(class: &str) -> bool {
    let bare = class.strip_prefix("tooltip_").unwrap_or(class);
    if STATUS_CLASSES.contains(&bare) {
        return true;
    }
    class
        .strip_prefix("level_")
        .is_some_and(|n| n.chars().all(|c| c.is_ascii_digit()))
}

/// Command surface the synchronization core renders through.
pub trait RenderSurface {
    /// Add classes to an element, keeping unrelated classes.
    fn set_classes(&mut self, element_id: &str, classes: &[String]);

    /// Remove every status class from an element ("clean before set").
    fn clear_status_classes(&mut self, element_id: &str);

    /// Remove specific classes from an element.
    fn remove_classes(&mut self, element_id: &str, classes: &[String]);

    fn set_text(&mut self, element_id: &str, text: &str);

    fn set_href(&mut self, element_id: &str, url: &str);

    fn set_visible(&mut self, element_id: &str, visible: bool);

    fn element_exists(&self, element_id: &str) -> bool;
}

/// One element of the in-process surface.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub classes: Vec<String>,
    pub text: String,
    pub href: String,
    pub visible: bool,
}

/// In-process element store. Backs the TUI view and tests.
///
/// Elements do not spring into existence on write; they are created up
/// front (the analog of the server-rendered page template) and mutators
/// ignore ids that were never created.
#[derive(Debug, Default)]
pub struct MemorySurface {
    elements: HashMap<String, Element>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an element with default (empty, hidden) state. Creating an
    /// existing element keeps its current state.
    pub fn create_element(&mut self, element_id: &str) {
        self.elements.entry(element_id.to_string()).or_default();
    }

    /// Create the standard per-project element set the observers target.
    pub fn create_project_elements(&mut self, project: &str) {
        for id in [
            element_id::profile(project),
            element_id::bar(project),
            element_id::bar_link(project),
            element_id::build_date(project),
            element_id::build_detail(project),
            element_id::force_build(project),
            element_id::config_panel(project),
            element_id::level(project),
            element_id::timer(project),
            element_id::tooltip(project),
            element_id::tooltip_name(project),
            element_id::tooltip_status(project),
            element_id::tooltip_date(project),
        ] {
            self.create_element(&id);
        }
    }

    pub fn element(&self, element_id: &str) -> Option<&Element> {
        self.elements.get(element_id)
    }

    pub fn classes(&self, element_id: &str) -> Vec<String> {
        self.elements
            .get(element_id)
            .map(|e| e.classes.clone())
            .unwrap_or_default()
    }

    pub fn text(&self, element_id: &str) -> String {
        self.elements
            .get(element_id)
            .map(|e| e.text.clone())
            .unwrap_or_default()
    }

    pub fn href(&self, element_id: &str) -> String {
        self.elements
            .get(element_id)
            .map(|e| e.href.clone())
            .unwrap_or_default()
    }

    pub fn is_visible(&self, element_id: &str) -> bool {
        self.elements.get(element_id).is_some_and(|e| e.visible)
    }
}

impl RenderSurface for MemorySurface {
    fn set_classes(&mut self, element_id: &str, classes: &[String]) {
        if let Some(element) = self.elements.get_mut(element_id) {
            for class in classes {
                if !element.classes.contains(class) {
                    element.classes.push(class.clone());
                }
            }
        }
    }

    fn clear_status_classes(&mut self, element_id: &str) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.classes.retain(|c| !is_status_class(c));
        }
    }

    fn remove_classes(&mut self, element_id: &str, classes: &[String]) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.classes.retain(|c| !classes.contains(c));
        }
    }

    fn set_text(&mut self, element_id: &str, text: &str) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.text = text.to_string();
        }
    }

    fn set_href(&mut self, element_id: &str, url: &str) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.href = url.to_string();
        }
    }

    fn set_visible(&mut self, element_id: &str, visible: bool) {
        if let Some(element) = self.elements.get_mut(element_id) {
            element.visible = visible;
        }
    }

    fn element_exists(&self, element_id: &str) -> bool {
        self.elements.contains_key(element_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutators_are_noops_on_missing_elements() {
        let mut surface = MemorySurface::new();
        surface.set_text("ghost", "boo");
        surface.set_classes("ghost", &["passed".to_string()]);
        surface.set_href("ghost", "somewhere");
        surface.set_visible("ghost", true);
        surface.clear_status_classes("ghost");
        assert!(!surface.element_exists("ghost"));
        assert_eq!(surface.text("ghost"), "");
    }

    #[test]
    fn test_set_classes_deduplicates() {
        let mut surface = MemorySurface::new();
        surface.create_element("api_bar");
        surface.set_classes("api_bar", &["passed".to_string()]);
        surface.set_classes("api_bar", &["passed".to_string(), "bar".to_string()]);
        assert_eq!(surface.classes("api_bar"), vec!["passed", "bar"]);
    }

    #[test]
    fn test_clear_status_classes_keeps_structural_classes() {
        let mut surface = MemorySurface::new();
        surface.create_element("tooltip_api");
        surface.set_classes(
            "tooltip_api",
            &[
                "tooltip".to_string(),
                "tooltip_building_failed".to_string(),
                "level_3".to_string(),
            ],
        );
        surface.clear_status_classes("tooltip_api");
        assert_eq!(surface.classes("tooltip_api"), vec!["tooltip"]);
    }

    #[test]
    fn test_is_status_class() {
        assert!(is_status_class("passed"));
        assert!(is_status_class("building_unknown"));
        assert!(is_status_class("tooltip_failed"));
        assert!(is_status_class("level_8"));
        assert!(!is_status_class("tooltip"));
        assert!(!is_status_class("bar"));
        assert!(!is_status_class("level_x"));
    }

    #[test]
    fn test_create_project_elements() {
        let mut surface = MemorySurface::new();
        surface.create_project_elements("api");
        assert!(surface.element_exists("api_profile"));
        assert!(surface.element_exists("tooltip_api_status"));
        assert!(surface.element_exists("api_timer"));
    }

    #[test]
    fn test_create_element_preserves_existing_state() {
        let mut surface = MemorySurface::new();
        surface.create_element("api_bar");
        surface.set_text("api_bar", "hello");
        surface.create_element("api_bar");
        assert_eq!(surface.text("api_bar"), "hello");
    }
}
