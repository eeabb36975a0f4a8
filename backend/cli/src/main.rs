mod check_cmd;
mod config;
mod preview_cmd;
mod terminal_output;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use embedtool_channels::{ChannelAdapter, DiscordAdapter};
use embedtool_config::{config_file_path, load_and_prepare};
use embedtool_logging::init_logger;

#[derive(Parser)]
#[command(name = "embedtool")]
#[command(about = "Discord bot for building and editing embeds interactively")]
#[command(version)]
struct Cli {
    /// Config file (default: $EMBEDTOOL_CONFIG, then the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve /embed
    Run,
    /// Validate the config and print it with secrets masked
    CheckConfig,
    /// Print the starter embed and editor panel as Discord JSON
    Preview {
        /// Include the tutorial overlay
        #[arg(long)]
        tutorial: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = config_file_path(cli.config.as_deref());

    match cli.command {
        Commands::Run => run_bot(path).await?,
        Commands::CheckConfig => {
            if !check_cmd::run(&path).await? {
                std::process::exit(1);
            }
        }
        Commands::Preview { tutorial } => {
            let (cfg, _report) = load_and_prepare(&path).await?;
            preview_cmd::run(&cfg, tutorial)?;
        }
    }

    Ok(())
}

async fn run_bot(path: PathBuf) -> Result<()> {
    let (cfg, report) = load_and_prepare(&path).await?;
    init_logger(&config::logger_options(&cfg))?;

    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, "{}", warning.message);
    }
    if !report.is_valid() {
        for error in &report.errors {
            tracing::error!(path = %error.path, "{}", error.message);
        }
        bail!("Invalid config at {}; run `embedtool check-config` for details", path.display());
    }

    let settings = config::discord_settings(&cfg)?;
    info!(
        config = %path.display(),
        guild = ?settings.guild_id,
        idle_timeout_secs = settings.sessions.idle_timeout.as_secs(),
        "Starting embedtool"
    );

    let adapter = DiscordAdapter::new(settings);
    info!("[{}] adapter starting", adapter.name());
    adapter.start().await
}
