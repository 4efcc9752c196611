//! The live watch command: resolves config overrides and hands off to the
//! TUI event loop.

use crate::config::{load_effective_config, validate_config};
use crate::error::Result;
use crate::tui;

pub fn watch_command(
    url_override: Option<String>,
    interval_override: Option<u64>,
    project: Option<String>,
) -> Result<()> {
    let mut config = load_effective_config()?;
    if let Some(url) = url_override {
        config.server_url = Some(url);
    }
    if let Some(interval) = interval_override {
        config.poll_interval_secs = interval;
    }
    validate_config(&config)?;
    tui::run_watch(&config, project)
}
