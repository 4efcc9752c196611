//! Watch TUI application state.
//!
//! The observers render into a [`MemorySurface`] exactly as they would
//! into a web page; the TUI reads that surface back when drawing. The
//! [`PageObserver`] plays the role of the server-rendered template: it
//! creates the per-project element set the first time a project appears
//! and keeps the ordered project list the table is drawn from.

use crate::bus::StatusObserver;
use crate::render::{element_id, MemorySurface};
use crate::snapshot::ProjectSnapshot;
use crate::stats::{self, StatusSummary};
use chrono::{DateTime, Local};
use ratatui::style::Color;
use std::sync::{Arc, Mutex};

/// Shared state between the observers and the draw loop.
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Projects in first-seen order.
    pub projects: Vec<String>,
    pub summary: StatusSummary,
    pub service_down: bool,
    pub last_poll: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

/// Creates page scaffolding for newly seen projects and maintains the
/// dashboard-level state. Must be registered before the rendering
/// observers so elements exist by the time they write.
pub struct PageObserver {
    surface: Arc<Mutex<MemorySurface>>,
    state: Arc<Mutex<DashboardState>>,
}

impl PageObserver {
    pub fn new(surface: Arc<Mutex<MemorySurface>>, state: Arc<Mutex<DashboardState>>) -> Self {
        Self { surface, state }
    }
}

impl StatusObserver for PageObserver {
    fn notify(&mut self, snapshots: &[Option<ProjectSnapshot>]) {
        let mut state = self.state.lock().unwrap();
        let mut surface = self.surface.lock().unwrap();
        for snapshot in snapshots.iter().flatten() {
            let name = &snapshot.building_info.project_name;
            if !state.projects.contains(name) {
                state.projects.push(name.clone());
                surface.create_project_elements(name);
            }
        }
        state.summary = stats::aggregate(snapshots);
        state.last_poll = Some(Local::now());
        state.last_error = None;
    }

    fn on_service_error(&mut self, _message: &str) {
        let mut state = self.state.lock().unwrap();
        state.service_down = true;
        state.last_poll = Some(Local::now());
    }

    fn on_service_restored(&mut self) {
        self.state.lock().unwrap().service_down = false;
    }
}

/// Everything the table needs for one project row, read back from the
/// surface elements.
#[derive(Debug, Clone)]
pub struct ProjectRow {
    pub name: String,
    pub status_class: String,
    pub build_date: String,
    pub timer: String,
    pub link: String,
}

/// Extract a row from the surface. The first status class on the bar
/// element is the project's current state.
pub fn project_row(surface: &MemorySurface, project: &str) -> ProjectRow {
    let status_class = surface
        .classes(&element_id::bar(project))
        .into_iter()
        .find(|c| crate::render::is_status_class(c))
        .unwrap_or_else(|| "unknown".to_string());
    ProjectRow {
        name: project.to_string(),
        status_class,
        build_date: surface.text(&element_id::build_date(project)),
        timer: surface.text(&element_id::timer(project)),
        link: surface.href(&element_id::bar_link(project)),
    }
}

/// Terminal color for a status class string.
pub fn status_color(status_class: &str) -> Color {
    match status_class {
        "passed" => Color::Green,
        "failed" => Color::Red,
        s if s.starts_with("building") => Color::Cyan,
        "queued" => Color::Blue,
        "paused" => Color::Yellow,
        "discontinued" => Color::DarkGray,
        "inactive" => Color::DarkGray,
        _ => Color::Gray,
    }
}
