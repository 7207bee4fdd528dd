use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use interview_companion::config::AppConfig;
use interview_companion::logging;

mod cmd;

#[derive(Parser)]
#[command(name = "interview-companion")]
#[command(version, about = "System design interview practice with AI feedback")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to interview.toml. Defaults to interview.toml in the project directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// URL of the interview server used by the session commands
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interview HTTP API
    Serve {
        /// Port to serve on
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,
    },
    /// Print a random system design question
    Question,
    /// Start a new interview session
    Start {
        /// End the current session first, if there is one
        #[arg(long)]
        force: bool,
    },
    /// Show the question, phase progress, notes and evaluations
    Status,
    /// Write notes for a section (reads stdin when no text or file is given)
    Note {
        /// Section key, e.g. assumptions or high-level-design
        section: String,

        /// Note text
        text: Option<String>,

        /// Read the note from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },
    /// Ask for feedback on a section's notes
    Evaluate {
        section: String,
    },
    /// Ask for a hint on a section
    Hint {
        section: String,
    },
    /// End the current session
    End {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// View or initialize configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Write a default interview.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json);

    let project_dir = match cli.project_dir.clone() {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    let mut config = AppConfig::load(cli.config.as_deref(), &project_dir)?;
    if let Some(url) = &cli.server {
        config.client.server_url = url.clone();
    }

    match &cli.command {
        Commands::Serve { port, host } => {
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            cmd::cmd_serve(&config).await?;
        }
        Commands::Question => cmd::cmd_question(&config)?,
        Commands::Start { force } => cmd::cmd_start(&project_dir, &config, *force).await?,
        Commands::Status => cmd::cmd_status(&project_dir, &config).await?,
        Commands::Note {
            section,
            text,
            file,
        } => {
            cmd::cmd_note(
                &project_dir,
                &config,
                section,
                text.as_deref(),
                file.as_deref(),
            )
            .await?
        }
        Commands::Evaluate { section } => cmd::cmd_evaluate(&project_dir, &config, section).await?,
        Commands::Hint { section } => cmd::cmd_hint(&project_dir, &config, section).await?,
        Commands::End { yes } => cmd::cmd_end(&project_dir, &config, *yes).await?,
        Commands::Config { command } => {
            cmd::cmd_config(&project_dir, &cli, &config, command.clone())?
        }
    }

    Ok(())
}
