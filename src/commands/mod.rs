//! CLI command handlers.

mod config;
mod status;
mod watch;

pub use config::{config_set_command, config_show_command, ConfigSetting};
pub use status::status_command;
pub use watch::watch_command;
