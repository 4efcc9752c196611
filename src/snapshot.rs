//! Wire model for the dashboard status endpoint.
//!
//! One poll returns a JSON array in which each element is either `null`
//! (a hole the server left for a project it could not report on) or an
//! object wrapping a `building_info` payload. The canonical field scheme
//! is `current_status`/`previous_result`; the legacy `building_status`
//! field from older servers is not supported.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Server-asserted activity state of a project.
///
/// Parsed case-insensitively; anything unrecognized collapses to `Waiting`
/// so a newer server can never make the client error out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrentStatus {
    Building,
    Queued,
    Paused,
    Discontinued,
    Waiting,
}

impl CurrentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "building" => CurrentStatus::Building,
            "queued" => CurrentStatus::Queued,
            "paused" => CurrentStatus::Paused,
            "discontinued" => CurrentStatus::Discontinued,
            _ => CurrentStatus::Waiting,
        }
    }

    /// Lower-case form used in status text and CSS-style class names.
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrentStatus::Building => "building",
            CurrentStatus::Queued => "queued",
            CurrentStatus::Paused => "paused",
            CurrentStatus::Discontinued => "discontinued",
            CurrentStatus::Waiting => "waiting",
        }
    }
}

/// Outcome of the last completed build, independent of whether a new
/// build is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviousResult {
    Passed,
    Failed,
    Unknown,
}

impl PreviousResult {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "passed" => PreviousResult::Passed,
            "failed" => PreviousResult::Failed,
            _ => PreviousResult::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PreviousResult::Passed => "passed",
            PreviousResult::Failed => "failed",
            PreviousResult::Unknown => "unknown",
        }
    }
}

/// Per-project status payload within one poll response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildingInfo {
    pub project_name: String,
    #[serde(default = "default_status_field")]
    pub current_status: String,
    #[serde(default = "default_result_field")]
    pub previous_result: String,
    #[serde(default)]
    pub latest_build_date: String,
    /// Human-readable expected duration, e.g. "2 minutes 30 seconds".
    #[serde(default)]
    pub build_duration: Option<String>,
    /// Seconds already elapsed in the running build, at poll time.
    #[serde(default)]
    pub build_time_elapsed: u64,
    /// Server-suggested class name. Accepted but ignored; classes are
    /// always recomputed locally (see classify).
    #[serde(default)]
    pub css_class_name: String,
    /// Consecutive-failure severity bucket (0..8), styling only.
    #[serde(default)]
    pub level: u8,
}

fn default_status_field() -> String {
    "waiting".to_string()
}

fn default_result_field() -> String {
    "unknown".to_string()
}

impl BuildingInfo {
    pub fn current_status(&self) -> CurrentStatus {
        CurrentStatus::parse(&self.current_status)
    }

    pub fn previous_result(&self) -> PreviousResult {
        PreviousResult::parse(&self.previous_result)
    }

    /// Expected build duration in seconds, or `None` when the server sent
    /// nothing parsable. Never fails.
    pub fn build_duration_seconds(&self) -> Option<u64> {
        self.build_duration
            .as_deref()
            .and_then(parse_build_duration)
    }
}

/// One entry of the polled array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub building_info: BuildingInfo,
}

/// A parsed poll response body.
///
/// The server signals "build service unreachable" as a JSON object with an
/// `error` field instead of the usual array; that flag drives the persistent
/// banner and is distinct from a transport failure of the poll itself.
#[derive(Debug, Clone)]
pub enum StatusResponse {
    Snapshots(Vec<Option<ProjectSnapshot>>),
    ServiceError(String),
}

/// Shape of the error response body.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: String,
}

/// Parse a raw poll response body.
///
/// An empty/whitespace body is a valid empty snapshot array, and so is a
/// body that does not parse as JSON at all -- a malformed response must
/// never take the poll loop down. Array entries that are `null` or missing
/// their `building_info` are preserved as holes rather than dropped, so
/// observers see the same positions the server sent.
pub fn parse_status_response(body: &str) -> StatusResponse {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return StatusResponse::Snapshots(Vec::new());
    }

    if let Ok(err) = serde_json::from_str::<ServiceErrorBody>(trimmed) {
        return StatusResponse::ServiceError(err.error);
    }

    let raw: Vec<serde_json::Value> = match serde_json::from_str(trimmed) {
        Ok(values) => values,
        Err(_) => return StatusResponse::Snapshots(Vec::new()),
    };
    let snapshots = raw
        .into_iter()
        .map(|value| serde_json::from_value::<ProjectSnapshot>(value).ok())
        .collect();
    StatusResponse::Snapshots(snapshots)
}

/// Parse a human duration string like "2 minutes 30 seconds" into seconds.
///
/// Returns `None` for anything without a recognizable `<number> <unit>`
/// pair, and for values that overflow a seconds count. Units may be
/// abbreviated or pluralized ("1 hour", "90 sec").
pub fn parse_build_duration(raw: &str) -> Option<u64> {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    let re = DURATION_RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(hour|minute|min|second|sec)s?").expect("invalid duration regex")
    });

    let mut total: u64 = 0;
    let mut matched = false;
    for caps in re.captures_iter(raw) {
        let amount: u64 = caps[1].parse().ok()?;
        let unit = caps[2].to_ascii_lowercase();
        let factor = match unit.as_str() {
            "hour" => 3600,
            "minute" | "min" => 60,
            _ => 1,
        };
        total = total.checked_add(amount.checked_mul(factor)?)?;
        matched = true;
    }

    if matched {
        Some(total)
    } else {
        None
    }
}
