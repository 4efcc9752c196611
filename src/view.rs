//! Per-project rendering observers.
//!
//! Each observer consumes the full snapshot array and applies its slice of
//! the presentation to the rendering surface: profile boxes, summary bars,
//! tooltips, the single-project detail header, the statistics line, the
//! per-project timers, and the service-unreachable banner. All of them
//! skip holes and follow the "clean before set" invariant -- exactly one
//! status class is active on an element at a time.

use crate::bus::StatusObserver;
use crate::classify::{self, UiState};
use crate::render::{element_id, RenderSurface};
use crate::snapshot::{BuildingInfo, ProjectSnapshot};
use crate::stats;
use crate::timer::TimerRegistry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Surface handle shared by the observers and the event loop.
pub type SharedSurface = Arc<Mutex<dyn RenderSurface + Send>>;

/// Details link for a project: the live view while building, the last
/// finished build otherwise.
pub fn detail_link(info: &BuildingInfo) -> String {
    if classify::is_building(info) {
        format!("build/detail/live/{}", info.project_name)
    } else {
        format!("build/detail/{}", info.project_name)
    }
}

fn class_list(state: UiState) -> Vec<String> {
    state.css_class().split_whitespace().map(String::from).collect()
}

fn renew_classes(surface: &mut dyn RenderSurface, element_id: &str, classes: &[String]) {
    surface.clear_status_classes(element_id);
    surface.set_classes(element_id, classes);
}

// ============================================================================
// Profile observer
// ============================================================================

/// Updates each project's profile box: status class, build date, details
/// link, and the force-build/config-panel affordances.
pub struct ProfileObserver {
    surface: SharedSurface,
    force_build_enabled: bool,
    /// Last applied disabled-state per project. The affordance is only
    /// mutated on an actual change so transient UI state (hover, focus)
    /// survives the refresh churn.
    force_build_disabled: HashMap<String, bool>,
}

impl ProfileObserver {
    pub fn new(surface: SharedSurface, force_build_enabled: bool) -> Self {
        Self {
            surface,
            force_build_enabled,
            force_build_disabled: HashMap::new(),
        }
    }

    fn update(&mut self, info: &BuildingInfo) {
        let state = classify::classify(info);
        let surface = Arc::clone(&self.surface);
        let mut surface = surface.lock().unwrap();

        renew_classes(&mut *surface, &element_id::profile(&info.project_name), &class_list(state));

        if classify::is_inactive(info) {
            surface.set_text(&element_id::build_date(&info.project_name), "");
        } else {
            surface.set_text(
                &element_id::build_date(&info.project_name),
                &format!(" at {}", info.latest_build_date),
            );
        }
        surface.set_href(
            &element_id::build_detail(&info.project_name),
            &detail_link(info),
        );

        let disabled = classify::should_force_build_be_disabled(info, self.force_build_enabled);
        self.apply_force_build(&mut *surface, &info.project_name, disabled);

        let panel_id = element_id::config_panel(&info.project_name);
        surface.remove_classes(
            &panel_id,
            &[
                "config_panel_enabled".to_string(),
                "config_panel_disabled".to_string(),
            ],
        );
        let panel_class = if classify::is_discontinued(info) {
            "config_panel_disabled"
        } else {
            "config_panel_enabled"
        };
        surface.set_classes(&panel_id, &[panel_class.to_string()]);
    }

    fn apply_force_build(
        &mut self,
        surface: &mut dyn RenderSurface,
        project: &str,
        disabled: bool,
    ) {
        if self.force_build_disabled.get(project) == Some(&disabled) {
            return;
        }
        let id = element_id::force_build(project);
        surface.remove_classes(
            &id,
            &[
                "force_build_enabled".to_string(),
                "force_build_disabled".to_string(),
            ],
        );
        let class = if disabled {
            "force_build_disabled"
        } else {
            "force_build_enabled"
        };
        surface.set_classes(&id, &[class.to_string()]);
        self.force_build_disabled.insert(project.to_string(), disabled);
    }
}

impl StatusObserver for ProfileObserver {
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]) {
        for snapshot in snapshots.iter().flatten() {
            self.update(&snapshot.building_info);
        }
    }

    fn on_service_error(&mut self, _message: &str) {
        // Nothing can be forced while the build service is unreachable.
        let projects: Vec<String> = self.force_build_disabled.keys().cloned().collect();
        let surface = Arc::clone(&self.surface);
        let mut surface = surface.lock().unwrap();
        for project in projects {
            self.apply_force_build(&mut *surface, &project, true);
        }
    }
}

// ============================================================================
// Bar observer
// ============================================================================

/// Updates each project's summary bar: status class, link target, and the
/// consecutive-failure level class.
pub struct BarObserver {
    surface: SharedSurface,
}

impl BarObserver {
    pub fn new(surface: SharedSurface) -> Self {
        Self { surface }
    }
}

impl StatusObserver for BarObserver {
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]) {
        let mut surface = self.surface.lock().unwrap();
        for snapshot in snapshots.iter().flatten() {
            let info = &snapshot.building_info;
            let state = classify::classify(info);

            renew_classes(&mut *surface, &element_id::bar(&info.project_name), &class_list(state));
            surface.set_href(&element_id::bar_link(&info.project_name), &detail_link(info));

            let level_id = element_id::level(&info.project_name);
            surface.clear_status_classes(&level_id);
            surface.set_classes(&level_id, &[format!("level_{}", info.level)]);
        }
    }
}

// ============================================================================
// Tooltip observer
// ============================================================================

/// Updates each project's hover tooltip: prefixed status class plus the
/// name/status/date text lines. The date is suppressed for projects with
/// no build history.
pub struct TooltipObserver {
    surface: SharedSurface,
}

impl TooltipObserver {
    pub fn new(surface: SharedSurface) -> Self {
        Self { surface }
    }
}

impl StatusObserver for TooltipObserver {
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]) {
        let mut surface = self.surface.lock().unwrap();
        for snapshot in snapshots.iter().flatten() {
            let info = &snapshot.building_info;
            let state = classify::classify(info);
            let project = &info.project_name;

            let mut classes = vec!["tooltip".to_string()];
            classes.extend(
                state
                    .css_class_with_prefix("tooltip_")
                    .split_whitespace()
                    .map(String::from),
            );
            renew_classes(&mut *surface, &element_id::tooltip(project), &classes);

            surface.set_text(&element_id::tooltip_name(project), project);
            surface.set_text(
                &element_id::tooltip_status(project),
                &format!("Status: {}", info.current_status().as_str()),
            );
            if classify::is_inactive(info) {
                surface.set_text(&element_id::tooltip_date(project), "");
            } else {
                surface.set_text(
                    &element_id::tooltip_date(project),
                    &format!("Date: {}", info.latest_build_date),
                );
            }
        }
    }
}

// ============================================================================
// Build detail observer
// ============================================================================

/// Single-project observer for the detail header: ignores every other
/// project in the array, keeps the header class/text/link in sync, and
/// flips the link from the live view to the finished build when the
/// project stops building.
pub struct BuildDetailObserver {
    surface: SharedSurface,
    project_name: String,
}

impl BuildDetailObserver {
    pub fn new(surface: SharedSurface, project_name: impl Into<String>) -> Self {
        Self {
            surface,
            project_name: project_name.into(),
        }
    }
}

impl StatusObserver for BuildDetailObserver {
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]) {
        for snapshot in snapshots.iter().flatten() {
            let info = &snapshot.building_info;
            if info.project_name != self.project_name {
                continue;
            }
            let state = classify::classify(info);
            let mut surface = self.surface.lock().unwrap();

            renew_classes(&mut *surface, element_id::DETAIL_SUMMARY, &class_list(state));
            let status_text = if state.is_building() {
                "building".to_string()
            } else {
                info.previous_result().as_str().to_string()
            };
            surface.set_text(element_id::DETAIL_STATUS, &status_text);
            surface.set_href(element_id::DETAIL_LINK, &detail_link(info));
        }
    }
}

// ============================================================================
// Statistics observer
// ============================================================================

/// Reduces each snapshot array to summary counts and writes them to the
/// statistics elements.
pub struct StatisticsObserver {
    surface: SharedSurface,
}

impl StatisticsObserver {
    pub fn new(surface: SharedSurface) -> Self {
        Self { surface }
    }
}

impl StatusObserver for StatisticsObserver {
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]) {
        let summary = stats::aggregate(snapshots);
        let mut surface = self.surface.lock().unwrap();
        surface.set_text(element_id::STATISTICS_PASSED, &summary.passed.to_string());
        surface.set_text(element_id::STATISTICS_FAILED, &summary.failed.to_string());
        surface.set_text(
            element_id::STATISTICS_BUILDING,
            &summary.building.to_string(),
        );
        surface.set_text(
            element_id::STATISTICS_INACTIVE,
            &summary.inactive.to_string(),
        );
        surface.set_text(element_id::STATISTICS_TOTAL, &summary.total.to_string());
        surface.set_text(element_id::STATISTICS_RATE, &summary.rate());
    }
}

// ============================================================================
// Timer observer
// ============================================================================

/// Drives the timer registry from incoming snapshots: seeds and stops
/// timers on status transitions, and stops everything when the build
/// service goes away.
pub struct TimerObserver {
    registry: Arc<Mutex<TimerRegistry>>,
    surface: SharedSurface,
}

impl TimerObserver {
    pub fn new(registry: Arc<Mutex<TimerRegistry>>, surface: SharedSurface) -> Self {
        Self { registry, surface }
    }
}

impl StatusObserver for TimerObserver {
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]) {
        let mut registry = self.registry.lock().unwrap();
        let mut surface = self.surface.lock().unwrap();
        for snapshot in snapshots.iter().flatten() {
            registry.on_snapshot(&snapshot.building_info, &mut *surface);
        }
    }

    fn on_service_error(&mut self, _message: &str) {
        let mut registry = self.registry.lock().unwrap();
        let mut surface = self.surface.lock().unwrap();
        registry.stop_all(&mut *surface);
    }
}

// ============================================================================
// Service banner observer
// ============================================================================

/// Toggles the persistent "build service unreachable" banner.
pub struct ServiceBannerObserver {
    surface: SharedSurface,
}

impl ServiceBannerObserver {
    pub fn new(surface: SharedSurface) -> Self {
        Self { surface }
    }
}

impl StatusObserver for ServiceBannerObserver {
    fn notify(&mut self, _snapshots: &[Option<ProjectSnapshot>]) {}

    fn on_service_error(&mut self, message: &str) {
        let mut surface = self.surface.lock().unwrap();
        surface.set_text(element_id::SERVICE_BANNER, message);
        surface.set_visible(element_id::SERVICE_BANNER, true);
    }

    fn on_service_restored(&mut self) {
        let mut surface = self.surface.lock().unwrap();
        surface.set_visible(element_id::SERVICE_BANNER, false);
    }
}
