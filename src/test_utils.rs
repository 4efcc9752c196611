//! Test utilities shared across modules.

use crate::error::Result;
use crate::fetch::StatusFetcher;
use crate::snapshot::{BuildingInfo, ProjectSnapshot};
use std::collections::VecDeque;

/// Build a `BuildingInfo` with the given name, status and previous result.
pub fn info(project: &str, status: &str, result: &str) -> BuildingInfo {
    BuildingInfo {
        project_name: project.to_string(),
        current_status: status.to_string(),
        previous_result: result.to_string(),
        latest_build_date: "2026-08-29 12:00:00".to_string(),
        build_duration: None,
        build_time_elapsed: 0,
        css_class_name: String::new(),
        level: 0,
    }
}

/// Build a full snapshot entry.
pub fn snapshot(project: &str, status: &str, result: &str) -> ProjectSnapshot {
    ProjectSnapshot {
        building_info: info(project, status, result),
    }
}

/// Serialize a snapshot array body the way the server would send it.
pub fn snapshot_body(projects: &[(&str, &str, &str)]) -> String {
    let entries: Vec<ProjectSnapshot> = projects
        .iter()
        .map(|(name, status, result)| snapshot(name, status, result))
        .collect();
    serde_json::to_string(&entries).expect("snapshot array serializes")
}

/// Fetcher that replays a scripted sequence of responses. Once the script
/// is exhausted it keeps returning empty bodies.
pub struct ScriptedFetcher {
    responses: VecDeque<Result<String>>,
    pub fetch_count: usize,
}

impl ScriptedFetcher {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: responses.into(),
            fetch_count: 0,
        }
    }
}

impl StatusFetcher for ScriptedFetcher {
    fn fetch(&mut self) -> Result<String> {
        self.fetch_count += 1;
        self.responses.pop_front().unwrap_or_else(|| Ok(String::new()))
    }
}
