//! One-shot status report: fetch once, print the classified table.

use crate::config::{load_effective_config, validate_config};
use crate::error::Result;
use crate::fetch::{HttpFetcher, StatusFetcher};
use crate::output::{self, BOLD, DIM, RED, RESET};
use crate::snapshot::{parse_status_response, StatusResponse};
use crate::stats;
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

pub fn status_command(url_override: Option<String>) -> Result<()> {
    let mut config = load_effective_config()?;
    if let Some(url) = url_override {
        config.server_url = Some(url);
    }
    validate_config(&config)?;
    let server_url = config.require_server_url()?;
    let mut fetcher = HttpFetcher::new(server_url)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(SPINNER_CHARS)
            .template("{spinner:.cyan} {msg}")
            .expect("invalid template"),
    );
    spinner.set_message(format!("Fetching build status from {server_url}..."));
    spinner.enable_steady_tick(Duration::from_millis(80));
    let fetched = fetcher.fetch();
    spinner.finish_and_clear();

    let body = fetched?;
    output::print_header();
    println!(
        "{DIM}{} · fetched {}{RESET}",
        server_url,
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!();

    match parse_status_response(&body) {
        StatusResponse::ServiceError(message) => {
            println!("{RED}{BOLD}Build service unreachable:{RESET} {message}");
        }
        StatusResponse::Snapshots(snapshots) => {
            if snapshots.iter().flatten().next().is_none() {
                println!("{DIM}No projects reported.{RESET}");
            } else {
                let summary = stats::aggregate(&snapshots);
                output::print_status_report(&snapshots, &summary);
            }
        }
    }
    Ok(())
}
