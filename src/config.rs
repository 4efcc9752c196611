//! buildwatch configuration.
//!
//! Settings come from two TOML files: a global one under
//! `~/.config/buildwatch/config.toml` and an optional project-local
//! `.buildwatch.toml` in the working directory. The project file wins
//! field by field over the global one; CLI flags win over both (handled
//! at the command layer).

use crate::error::{BuildwatchError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// The base config directory name under ~/.config/
const CONFIG_DIR_NAME: &str = "buildwatch";

/// File name of the project-local config.
const PROJECT_CONFIG_FILE: &str = ".buildwatch.toml";

/// Default seconds between polls, matching the original dashboard refresh.
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the dashboard server, e.g. `http://ci.example.com:8080/dashboard`.
    #[serde(default)]
    pub server_url: Option<String>,

    /// Seconds between status polls. The next poll is armed after the
    /// previous one completes, so this is a floor, not a fixed rate.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Global force-build switch. When off, every force-build affordance
    /// renders disabled regardless of project state.
    #[serde(default = "default_true")]
    pub force_build_enabled: bool,
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: None,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            force_build_enabled: true,
        }
    }
}

impl Config {
    /// The server URL, or an error telling the user how to set one.
    pub fn require_server_url(&self) -> Result<&str> {
        self.server_url.as_deref().ok_or_else(|| {
            BuildwatchError::Config(
                "no server URL configured; pass --url or set server_url in \
                 ~/.config/buildwatch/config.toml"
                    .to_string(),
            )
        })
    }
}

/// Validate a configuration for logical consistency.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.poll_interval_secs == 0 {
        return Err(BuildwatchError::Config(
            "poll_interval_secs must be at least 1".to_string(),
        ));
    }
    if let Some(url) = &config.server_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(BuildwatchError::InvalidServerUrl(url.clone()));
        }
    }
    Ok(())
}

/// Path of the global config file.
pub fn global_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| BuildwatchError::Config("could not determine home directory".to_string()))?;
    Ok(home.join(".config").join(CONFIG_DIR_NAME).join("config.toml"))
}

/// Path of the project-local config file in the current directory.
pub fn project_config_path() -> Result<PathBuf> {
    Ok(env::current_dir()?.join(PROJECT_CONFIG_FILE))
}

/// The project-local file as written: only fields actually present are
/// overlaid, so a file containing just `server_url` leaves the global
/// tunables alone.
#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    server_url: Option<String>,
    poll_interval_secs: Option<u64>,
    force_build_enabled: Option<bool>,
}

fn load_config_file(path: &PathBuf) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)?;
    Ok(Some(config))
}

fn load_overlay_file(path: &PathBuf) -> Result<Option<ConfigOverlay>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)?;
    let overlay: ConfigOverlay = toml::from_str(&contents)?;
    Ok(Some(overlay))
}

pub fn load_global_config() -> Result<Config> {
    Ok(load_config_file(&global_config_path()?)?.unwrap_or_default())
}

pub fn save_global_config(config: &Config) -> Result<()> {
    let path = global_config_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, toml::to_string_pretty(config)?)?;
    Ok(())
}

/// The effective config: global settings overridden field by field by the
/// project-local file, when one exists.
pub fn load_effective_config() -> Result<Config> {
    let global = load_global_config()?;
    let project = load_overlay_file(&project_config_path()?)?;
    Ok(merge(global, project))
}

fn merge(global: Config, project: Option<ConfigOverlay>) -> Config {
    let Some(project) = project else {
        return global;
    };
    Config {
        server_url: project.server_url.or(global.server_url),
        poll_interval_secs: project.poll_interval_secs.unwrap_or(global.poll_interval_secs),
        force_build_enabled: project
            .force_build_enabled
            .unwrap_or(global.force_build_enabled),
    }
}
