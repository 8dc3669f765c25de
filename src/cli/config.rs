//! Config command handlers

use crate::cli::ConfigInitArgs;
use crate::config::{ConfigError, StatusWatchConfig};
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../statuswatch.example.toml");

/// Parse and validate the bundled example configuration.
pub fn example_config() -> Result<StatusWatchConfig, ConfigError> {
    let config: StatusWatchConfig =
        toml::from_str(EXAMPLE_CONFIG).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate()?;
    Ok(config)
}

/// Handle `statuswatch config init` command
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "File already exists: {}. Use --force to overwrite.",
            args.output.display()
        )
        .into());
    }

    let config = example_config()?;
    let services = config.board.resolved_services()?;
    fs::write(&args.output, EXAMPLE_CONFIG)?;

    println!("✓ Configuration file created: {}", args.output.display());
    println!("  Endpoint: {}", config.client.endpoint);
    let keys: Vec<_> = services.iter().map(|(key, _)| key.as_str()).collect();
    println!("  Services: {}", keys.join(", "));
    println!("  Edit the [[board.services]] entries to match your status API.");

    Ok(())
}
