//! buildwatch CLI entry point.
//!
//! Parses command-line arguments and dispatches to the appropriate command handler.

use buildwatch::commands::{
    config_set_command, config_show_command, status_command, watch_command, ConfigSetting,
};
use buildwatch::output::print_error;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "buildwatch")]
#[command(
    version,
    about = "Terminal dashboard for watching CruiseControl-style CI build status",
    after_help = "EXAMPLES:
    # Watch every project on the configured server
    buildwatch

    # Watch a specific server without touching the config
    buildwatch watch --url http://ci.example.com:8080/dashboard

    # Follow a single project's build in detail
    buildwatch watch --project my-service

    # One-shot report, suitable for scripts and CI shells
    buildwatch status

    # Point the config at your server once
    buildwatch config set-url http://ci.example.com:8080/dashboard"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch build status live in a full-screen dashboard (default)
    #[command(after_help = "EXAMPLES:
    buildwatch watch                          # All projects, configured server
    buildwatch watch --interval 2             # Poll every 2 seconds
    buildwatch watch --project my-service     # Single-project detail view

KEYS:
    q / Esc    quit
    r          force an immediate poll")]
    Watch {
        /// Dashboard server base URL (overrides config)
        #[arg(long)]
        url: Option<String>,

        /// Seconds between polls (overrides config)
        #[arg(long)]
        interval: Option<u64>,

        /// Watch a single project's detail view instead of the table
        #[arg(long)]
        project: Option<String>,
    },

    /// Fetch the current build status once and print a report
    Status {
        /// Dashboard server base URL (overrides config)
        #[arg(long)]
        url: Option<String>,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration and where it comes from
    Show,
    /// Set the dashboard server base URL
    SetUrl { url: String },
    /// Set the poll interval in seconds
    SetInterval { secs: u64 },
    /// Enable or disable the force-build affordances
    SetForceBuild { enabled: bool },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        None => watch_command(None, None, None),
        Some(Commands::Watch {
            url,
            interval,
            project,
        }) => watch_command(url, interval, project),
        Some(Commands::Status { url }) => status_command(url),
        Some(Commands::Config { action }) => match action {
            ConfigCommands::Show => config_show_command(),
            ConfigCommands::SetUrl { url } => config_set_command(ConfigSetting::ServerUrl(url)),
            ConfigCommands::SetInterval { secs } => {
                config_set_command(ConfigSetting::PollInterval(secs))
            }
            ConfigCommands::SetForceBuild { enabled } => {
                config_set_command(ConfigSetting::ForceBuildEnabled(enabled))
            }
        },
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(err) = result {
        print_error(&err.to_string());
        std::process::exit(1);
    }
}
