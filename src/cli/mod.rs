//! CLI module for statuswatch
//!
//! Command-line interface definitions and handlers for the status board.
//!
//! # Commands
//!
//! - `watch` - Poll the status endpoint and redraw the board until interrupted
//! - `status` - Fetch once and print the board (or JSON)
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Watch the default endpoint every 30 seconds
//! statuswatch watch --interval 30
//!
//! # One-shot check suitable for scripts
//! statuswatch status --json
//!
//! # Generate shell completions
//! statuswatch completions bash > ~/.bash_completion.d/statuswatch
//! ```

pub mod completions;
pub mod config;
pub mod output;
pub mod status;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::board::{BoardService, PlotOptions, TerminalBoard, TerminalCharts};
use crate::config::{ConfigError, StatusWatchConfig};
use crate::dashboard::Dashboard;
use crate::render::Renderer;
use crate::status::{ServiceKey, StatusReport};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_PATH: &str = "statuswatch.toml";

/// statuswatch - Terminal status board for a homelab status API
#[derive(Parser, Debug)]
#[command(
    name = "statuswatch",
    version,
    about = "Poll a service status API and show it as a live board"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll continuously and redraw the board
    Watch(WatchArgs),
    /// Fetch once and print the current status
    Status(StatusArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options shared by every command that talks to the status endpoint.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override the status endpoint URL
    #[arg(short, long, env = "STATUSWATCH_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Override the request timeout in seconds
    #[arg(short, long, env = "STATUSWATCH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "STATUSWATCH_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Override the poll interval in seconds
    #[arg(short, long, env = "STATUSWATCH_INTERVAL")]
    pub interval: Option<u64>,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with CLI overrides
///
/// A missing file at the default path falls back to defaults; a missing
/// file the user named explicitly is an error.
pub fn load_config_with_overrides(args: &SourceArgs) -> Result<StatusWatchConfig, ConfigError> {
    let mut config = if args.config.exists() {
        StatusWatchConfig::load(Some(&args.config))?
    } else if args.config.as_os_str() == DEFAULT_CONFIG_PATH {
        tracing::debug!("Config file not found, using defaults");
        StatusWatchConfig::default()
    } else {
        return Err(ConfigError::NotFound(args.config.clone()));
    };

    // Apply environment variable overrides
    config = config.with_env_overrides();

    // Apply CLI overrides (highest priority)
    if let Some(ref endpoint) = args.endpoint {
        config.client.endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        config.client.timeout_seconds = timeout;
    }
    if let Some(ref log_level) = args.log_level {
        config.logging.level = log_level.clone();
    }

    Ok(config)
}

/// Turn off ANSI colors for this process when requested.
pub fn apply_color_choice(args: &SourceArgs) {
    if args.no_color {
        colored::control::set_override(false);
    }
}

/// Cards for the services listed in the config.
pub fn configured_services(config: &StatusWatchConfig) -> Result<Vec<BoardService>, ConfigError> {
    Ok(config
        .board
        .resolved_services()?
        .into_iter()
        .map(|(key, name)| BoardService::new(key, name))
        .collect())
}

/// Cards for every service in `report`, in response order.
///
/// Entries whose key cannot be used as an element id are skipped.
pub fn discover_services(report: &StatusReport) -> Vec<BoardService> {
    report
        .iter()
        .filter_map(|(raw_key, snapshot)| match ServiceKey::parse(raw_key) {
            Ok(key) => {
                let name = snapshot
                    .name
                    .clone()
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| raw_key.clone());
                Some(BoardService::new(key, name))
            }
            Err(error) => {
                tracing::warn!(key = %raw_key, error = %error, "Skipping service with invalid key");
                None
            }
        })
        .collect()
}

/// Lay out a terminal dashboard for `services`.
pub fn build_dashboard(
    services: Vec<BoardService>,
    config: &StatusWatchConfig,
    color: bool,
) -> Dashboard<TerminalBoard, TerminalCharts> {
    let charts = TerminalCharts::new(PlotOptions {
        recent_changes: config.board.recent_changes,
        color,
    });
    let renderer = Renderer::new(TerminalBoard::new(services), charts)
        .with_max_ticks(config.board.max_ticks);
    Dashboard::new(renderer)
}

/// Draw the dashboard's board with its charts.
pub fn draw_dashboard(dashboard: &Dashboard<TerminalBoard, TerminalCharts>) -> String {
    let renderer = dashboard.renderer();
    renderer.surface().draw(renderer.charts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ServiceSnapshot;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn source_args(config: PathBuf) -> SourceArgs {
        SourceArgs {
            config,
            endpoint: None,
            timeout: None,
            log_level: None,
            no_color: false,
        }
    }

    #[test]
    fn test_cli_parse_watch_defaults() {
        let cli = Cli::try_parse_from(["statuswatch", "watch"]).unwrap();
        match cli.command {
            Commands::Watch(args) => {
                assert_eq!(args.source.config, PathBuf::from(DEFAULT_CONFIG_PATH));
                assert!(!args.source.no_color);
            }
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_watch_with_interval() {
        let cli = Cli::try_parse_from(["statuswatch", "watch", "-i", "15"]).unwrap();
        match cli.command {
            Commands::Watch(args) => assert_eq!(args.interval, Some(15)),
            _ => panic!("Expected Watch command"),
        }
    }

    #[test]
    fn test_cli_parse_status_json() {
        let cli = Cli::try_parse_from([
            "statuswatch",
            "status",
            "--json",
            "--endpoint",
            "http://localhost:5000/api/status",
        ])
        .unwrap();
        match cli.command {
            Commands::Status(args) => {
                assert!(args.json);
                assert_eq!(
                    args.source.endpoint.as_deref(),
                    Some("http://localhost:5000/api/status")
                );
            }
            _ => panic!("Expected Status command"),
        }
    }

    #[test]
    fn test_cli_parse_config_init() {
        let cli = Cli::try_parse_from(["statuswatch", "config", "init", "--force"]).unwrap();
        match cli.command {
            Commands::Config(ConfigCommands::Init(args)) => assert!(args.force),
            _ => panic!("Expected Config Init command"),
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[client]\ntimeout_seconds = 3").unwrap();

        let config = load_config_with_overrides(&source_args(temp.path().to_path_buf())).unwrap();
        assert_eq!(config.client.timeout_seconds, 3);
    }

    #[test]
    fn test_cli_overrides_config() {
        let temp = NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[client]\ntimeout_seconds = 3").unwrap();

        let mut args = source_args(temp.path().to_path_buf());
        args.timeout = Some(7);
        args.endpoint = Some("https://status.example.com/api/status".to_string());

        let config = load_config_with_overrides(&args).unwrap();
        assert_eq!(config.client.timeout_seconds, 7);
        assert_eq!(config.client.endpoint, "https://status.example.com/api/status");
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let args = source_args(PathBuf::from("/nonexistent/statuswatch.toml"));
        assert!(matches!(
            load_config_with_overrides(&args),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_discover_services_keeps_order_and_names() {
        let mut report = StatusReport::new();
        report.insert(
            "zeta".to_string(),
            ServiceSnapshot {
                name: Some("Zeta Service".to_string()),
                ..Default::default()
            },
        );
        report.insert("Bad Key".to_string(), ServiceSnapshot::default());
        report.insert("alpha".to_string(), ServiceSnapshot::default());

        let services = discover_services(&report);
        let keys: Vec<_> = services.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        assert_eq!(services[0].name, "Zeta Service");
        assert_eq!(services[1].name, "alpha");
    }

    #[test]
    fn test_configured_services_resolve_keys() {
        let config: StatusWatchConfig = toml::from_str(
            r#"
            [[board.services]]
            name = "Beszel (Status)"
            "#,
        )
        .unwrap();
        let services = configured_services(&config).unwrap();
        assert_eq!(services[0].key.as_str(), "beszel-status");
    }
}
