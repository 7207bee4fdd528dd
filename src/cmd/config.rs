//! Configuration view and initialization commands: `interview-companion config`.

use std::path::Path;

use anyhow::Result;

use interview_companion::config::AppConfig;

use super::super::{Cli, ConfigCommands};

pub fn cmd_config(
    project_dir: &Path,
    cli: &Cli,
    config: &AppConfig,
    command: Option<ConfigCommands>,
) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| AppConfig::default_path(project_dir));

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Interview Companion Configuration");
            println!("=================================");
            println!();
            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No config file at {}; using defaults.", config_path.display());
            }
            println!("Effective values (with env/CLI overrides):");
            println!();
            println!("{}", config.to_display_toml()?);
        }
        Some(ConfigCommands::Validate) => {
            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
        }
        Some(ConfigCommands::Init { force }) => {
            if config_path.exists() && !force {
                println!("{} already exists.", config_path.display());
                println!("Use --force to overwrite it.");
                return Ok(());
            }
            if let Some(parent) = config_path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }

            AppConfig::default().save(&config_path)?;

            println!("Created {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] host, port, cors_origins");
            println!("  - [feedback] base_url, model, temperature, timeout_secs");
            println!("  - [questions] extra, only_extra");
            println!("  - [client] server_url");
            println!();
            println!("Keep the API key in OPENAI_API_KEY rather than the file.");
        }
    }

    Ok(())
}
