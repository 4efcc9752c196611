use crate::classify::{self, UiState};
use crate::snapshot::ProjectSnapshot;
use crate::stats::StatusSummary;
use crate::timer::format_clock;

// ANSI color codes
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";
pub const GRAY: &str = "\x1b[90m";

pub fn print_header() {
    println!("{CYAN}{BOLD}");
    println!("+---------------------------------------------------------+");
    println!(
        "|  buildwatch v{}                                       |",
        env!("CARGO_PKG_VERSION")
    );
    println!("+---------------------------------------------------------+");
    println!("{RESET}");
}

pub fn print_error(message: &str) {
    eprintln!("{RED}{BOLD}Error:{RESET} {message}");
}

/// ANSI color for a classified state in CLI output.
fn state_color(state: UiState) -> &'static str {
    match state {
        UiState::Passed => GREEN,
        UiState::Failed => RED,
        UiState::Building(_) => CYAN,
        UiState::Inactive => GRAY,
        UiState::Queued(_) => BLUE,
        UiState::Paused(_) => YELLOW,
        UiState::Discontinued(_) => GRAY,
    }
}

/// One-line summary: passed/failed/building/inactive counts and pass rate.
pub fn print_summary(summary: &StatusSummary) {
    println!(
        "{GREEN}{} passed{RESET} | {RED}{} failed{RESET} | {CYAN}{} building{RESET} | \
         {GRAY}{} inactive{RESET} | {} total | rate {BOLD}{}{RESET}",
        summary.passed,
        summary.failed,
        summary.building,
        summary.inactive,
        summary.total,
        summary.rate()
    );
}

/// Per-project table for the one-shot status report.
pub fn print_status_report(snapshots: &[Option<ProjectSnapshot>], summary: &StatusSummary) {
    let width = snapshots
        .iter()
        .flatten()
        .map(|s| s.building_info.project_name.len())
        .max()
        .unwrap_or(7)
        .max(7);

    println!("{BOLD}{:width$}  {:20}  {}{RESET}", "PROJECT", "STATE", "LAST BUILD");
    for snapshot in snapshots.iter().flatten() {
        let info = &snapshot.building_info;
        let state = classify::classify(info);
        let color = state_color(state);
        let date = if classify::is_inactive(info) {
            String::new()
        } else {
            info.latest_build_date.clone()
        };
        let mut line = format!(
            "{:width$}  {color}{:20}{RESET}  {DIM}{date}{RESET}",
            info.project_name,
            state.css_class(),
        );
        if classify::is_building(info) {
            line.push_str(&format!(
                " {CYAN}(elapsed {}){RESET}",
                format_clock(info.build_time_elapsed)
            ));
        }
        println!("{line}");
    }
    println!();
    print_summary(summary);
}
