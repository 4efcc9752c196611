//! Per-project build timers.
//!
//! A [`BuildTimer`] tracks elapsed and remaining time for one project's
//! running build; the [`TimerRegistry`] owns one timer per project and
//! reconciles them against incoming snapshots.
//!
//! The timer is locally authoritative once started: the server snapshot
//! seeds the initial elapsed value and signals start/stop transitions, but
//! a running timer keeps counting from its own state across polls. Snapping
//! the counter to the server's value on every poll would make the display
//! jump with network latency variance.

use crate::render::{element_id, RenderSurface};
use crate::snapshot::BuildingInfo;
use std::collections::HashMap;

/// Format seconds as zero-padded `HH:MM:SS`.
///
/// Hours are not capped; a pathological elapsed time renders with however
/// many digits it needs.
pub fn format_clock(seconds: u64) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds / 60) % 60,
        seconds % 60
    )
}

/// Label for the remaining-time half of the timer display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLabel {
    /// Build is expected to finish in the displayed time.
    Remaining,
    /// Build has overrun its expected duration by the displayed time.
    LongerBy,
}

impl TimeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeLabel::Remaining => "Remaining",
            TimeLabel::LongerBy => "Longer by",
        }
    }
}

/// Elapsed/remaining-time state machine for one project.
///
/// `Stopped` (initial) -> `Running` -> `Stopped`; the stopped state is also
/// the terminal state, so a timer is reusable across builds.
#[derive(Debug, Clone, Default)]
pub struct BuildTimer {
    elapsed_seconds: u64,
    last_duration_seconds: u64,
    running: bool,
}

impl BuildTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin counting. A missing/unparsable expected duration starts the
    /// timer with `last_duration = 0`, which suppresses the remaining-time
    /// display. No-op when already running: counters must not reset
    /// mid-build.
    pub fn start(&mut self, initial_elapsed: u64, last_duration: Option<u64>) {
        if self.running {
            return;
        }
        self.elapsed_seconds = initial_elapsed;
        self.last_duration_seconds = last_duration.unwrap_or(0);
        self.running = true;
    }

    /// Advance one second. Returns `false` (and does nothing) unless running.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed_seconds += 1;
        true
    }

    /// Stop counting and reset. Idempotent; valid from any state.
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_seconds = 0;
        self.last_duration_seconds = 0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn last_duration_seconds(&self) -> u64 {
        self.last_duration_seconds
    }

    /// Signed remaining time; negative once the build overruns.
    pub fn remaining_seconds(&self) -> i64 {
        self.last_duration_seconds as i64 - self.elapsed_seconds as i64
    }

    /// Label for the remaining display: `Remaining` while positive,
    /// `Longer by` at zero or when overrunning.
    pub fn remaining_label(&self) -> TimeLabel {
        if self.remaining_seconds() > 0 {
            TimeLabel::Remaining
        } else {
            TimeLabel::LongerBy
        }
    }

    /// Remaining time formatted as `HH:MM:SS` of the absolute value.
    pub fn remaining_clock(&self) -> String {
        format_clock(self.remaining_seconds().unsigned_abs())
    }

    /// Full timer line, e.g. `Elapsed 00:00:40 | Remaining 00:01:20`.
    /// The remaining half is omitted when the expected duration is unknown.
    pub fn display_text(&self) -> String {
        let elapsed = format!("Elapsed {}", format_clock(self.elapsed_seconds));
        if self.last_duration_seconds == 0 {
            elapsed
        } else {
            format!(
                "{} | {} {}",
                elapsed,
                self.remaining_label().as_str(),
                self.remaining_clock()
            )
        }
    }
}

/// Owns the live timers, keyed by project name.
///
/// Timers are created lazily on first reference and live for the session;
/// stopping resets them rather than destroying them.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: HashMap<String, BuildTimer>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile one project's timer against a snapshot.
    ///
    /// Not building: stop (idempotent). Building and stopped: start from the
    /// server's elapsed value. Building and already running: leave the timer
    /// alone.
    pub fn on_snapshot(&mut self, info: &BuildingInfo, surface: &mut dyn RenderSurface) {
        let timer = self
            .timers
            .entry(info.project_name.clone())
            .or_insert_with(BuildTimer::new);

        if info.current_status() != crate::snapshot::CurrentStatus::Building {
            timer.stop();
        } else if !timer.is_running() {
            timer.start(info.build_time_elapsed, info.build_duration_seconds());
        }
        Self::render(&info.project_name, timer, surface);
    }

    /// Advance every running timer by one second and refresh its display.
    /// Driven once per second by the event loop.
    pub fn tick_all(&mut self, surface: &mut dyn RenderSurface) {
        for (project, timer) in &mut self.timers {
            if timer.tick() {
                Self::render(project, timer, surface);
            }
        }
    }

    /// Stop every timer. Used when the build service becomes unreachable.
    pub fn stop_all(&mut self, surface: &mut dyn RenderSurface) {
        for (project, timer) in &mut self.timers {
            timer.stop();
            Self::render(project, timer, surface);
        }
    }

    pub fn timer(&self, project: &str) -> Option<&BuildTimer> {
        self.timers.get(project)
    }

    fn render(project: &str, timer: &BuildTimer, surface: &mut dyn RenderSurface) {
        let text = if timer.is_running() {
            timer.display_text()
        } else {
            String::new()
        };
        surface.set_text(&element_id::timer(project), &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::MemorySurface;
    use crate::test_utils::info;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(59), "00:00:59");
        assert_eq!(format_clock(80), "00:01:20");
        assert_eq!(format_clock(3661), "01:01:01");
    }

    #[test]
    fn test_format_clock_uncapped_hours() {
        assert_eq!(format_clock(360_000), "100:00:00");
    }

    #[test]
    fn test_timer_round_trip() {
        let mut timer = BuildTimer::new();
        timer.start(30, Some(120));
        for _ in 0..10 {
            assert!(timer.tick());
        }
        assert_eq!(timer.elapsed_seconds(), 40);
        assert_eq!(timer.remaining_seconds(), 80);
        assert_eq!(timer.remaining_label(), TimeLabel::Remaining);
        assert_eq!(timer.remaining_clock(), "00:01:20");

        timer.stop();
        assert_eq!(timer.elapsed_seconds(), 0);
        assert_eq!(timer.last_duration_seconds(), 0);
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn test_start_while_running_does_not_reset() {
        let mut timer = BuildTimer::new();
        timer.start(10, Some(60));
        timer.tick();
        timer.start(99, Some(600));
        assert_eq!(timer.elapsed_seconds(), 11);
        assert_eq!(timer.last_duration_seconds(), 60);
    }

    #[test]
    fn test_tick_only_fires_while_running() {
        let mut timer = BuildTimer::new();
        assert!(!timer.tick());
        assert_eq!(timer.elapsed_seconds(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut timer = BuildTimer::new();
        timer.start(5, Some(60));
        timer.stop();
        timer.stop();
        assert_eq!(timer.elapsed_seconds(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_overrun_uses_longer_by_label() {
        let mut timer = BuildTimer::new();
        timer.start(120, Some(120));
        assert_eq!(timer.remaining_label(), TimeLabel::LongerBy);
        timer.tick();
        assert_eq!(timer.remaining_seconds(), -1);
        assert_eq!(timer.remaining_clock(), "00:00:01");
    }

    #[test]
    fn test_unknown_duration_suppresses_remaining() {
        let mut timer = BuildTimer::new();
        timer.start(40, None);
        assert_eq!(timer.display_text(), "Elapsed 00:00:40");
    }

    #[test]
    fn test_display_text_with_duration() {
        let mut timer = BuildTimer::new();
        timer.start(40, Some(120));
        assert_eq!(timer.display_text(), "Elapsed 00:00:40 | Remaining 00:01:20");
    }

    #[test]
    fn test_registry_building_snapshot_starts_once() {
        let mut registry = TimerRegistry::new();
        let mut surface = MemorySurface::new();
        surface.create_project_elements("api");

        let mut snap = info("api", "Building", "Passed");
        snap.build_time_elapsed = 30;
        snap.build_duration = Some("2 minutes".to_string());

        registry.on_snapshot(&snap, &mut surface);
        registry.tick_all(&mut surface);
        // Same snapshot again: the running timer keeps its own counter.
        registry.on_snapshot(&snap, &mut surface);

        let timer = registry.timer("api").unwrap();
        assert!(timer.is_running());
        assert_eq!(timer.elapsed_seconds(), 31);
    }

    #[test]
    fn test_registry_stops_on_non_building_snapshot() {
        let mut registry = TimerRegistry::new();
        let mut surface = MemorySurface::new();
        surface.create_project_elements("api");

        registry.on_snapshot(&info("api", "Building", "Passed"), &mut surface);
        assert!(registry.timer("api").unwrap().is_running());

        registry.on_snapshot(&info("api", "Waiting", "Passed"), &mut surface);
        let timer = registry.timer("api").unwrap();
        assert!(!timer.is_running());
        assert_eq!(timer.elapsed_seconds(), 0);

        // Repeated non-building snapshots keep it stopped, no counter drift.
        registry.on_snapshot(&info("api", "Waiting", "Passed"), &mut surface);
        assert_eq!(registry.timer("api").unwrap().elapsed_seconds(), 0);
    }

    #[test]
    fn test_registry_renders_timer_text() {
        let mut registry = TimerRegistry::new();
        let mut surface = MemorySurface::new();
        surface.create_project_elements("api");

        let mut snap = info("api", "Building", "Passed");
        snap.build_time_elapsed = 10;
        snap.build_duration = Some("1 minute".to_string());
        registry.on_snapshot(&snap, &mut surface);
        assert_eq!(
            surface.text("api_timer"),
            "Elapsed 00:00:10 | Remaining 00:00:50"
        );

        registry.on_snapshot(&info("api", "Waiting", "Passed"), &mut surface);
        assert_eq!(surface.text("api_timer"), "");
    }

    #[test]
    fn test_stop_all() {
        let mut registry = TimerRegistry::new();
        let mut surface = MemorySurface::new();
        surface.create_project_elements("api");
        surface.create_project_elements("web");

        registry.on_snapshot(&info("api", "Building", "Passed"), &mut surface);
        registry.on_snapshot(&info("web", "Building", "Failed"), &mut surface);
        registry.stop_all(&mut surface);

        assert!(!registry.timer("api").unwrap().is_running());
        assert!(!registry.timer("web").unwrap().is_running());
    }
}
