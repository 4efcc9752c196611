//! Config display and mutation commands.

use crate::config::{
    global_config_path, load_effective_config, load_global_config, project_config_path,
    save_global_config, validate_config,
};
use crate::error::Result;
use crate::output::{BLUE, DIM, GREEN, RESET};

/// Settable configuration keys.
#[derive(Debug, Clone)]
pub enum ConfigSetting {
    ServerUrl(String),
    PollInterval(u64),
    ForceBuildEnabled(bool),
}

pub fn config_show_command() -> Result<()> {
    let effective = load_effective_config()?;
    println!("{BLUE}server_url:{RESET}          {}", effective.server_url.as_deref().unwrap_or("(unset)"));
    println!("{BLUE}poll_interval_secs:{RESET}  {}", effective.poll_interval_secs);
    println!("{BLUE}force_build_enabled:{RESET} {}", effective.force_build_enabled);
    println!();
    println!("{DIM}global:  {}{RESET}", global_config_path()?.display());
    let project_path = project_config_path()?;
    if project_path.exists() {
        println!("{DIM}project: {} (overrides global){RESET}", project_path.display());
    }
    Ok(())
}

/// Write one setting into the global config file.
pub fn config_set_command(setting: ConfigSetting) -> Result<()> {
    let mut config = load_global_config()?;
    match setting {
        ConfigSetting::ServerUrl(url) => config.server_url = Some(url),
        ConfigSetting::PollInterval(secs) => config.poll_interval_secs = secs,
        ConfigSetting::ForceBuildEnabled(enabled) => config.force_build_enabled = enabled,
    }
    validate_config(&config)?;
    save_global_config(&config)?;
    println!("{GREEN}Saved{RESET} {}", global_config_path()?.display());
    Ok(())
}
