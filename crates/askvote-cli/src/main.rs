use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use askvote_client::config::ClientConfig;
use askvote_core::models::target::VoteTarget;
use cli::{Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let path = commands::config_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Vote {
            kind,
            id,
            direction,
            rating,
        } => {
            let cfg = commands::resolve_config(&path)?;
            let target = VoteTarget::new(kind.into(), id);
            commands::vote(&cfg, target, direction.into(), rating).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Init {
                base_url,
                session_cookie,
                csrf_token,
                timeout_secs,
            } => {
                let cfg = ClientConfig {
                    session_cookie,
                    csrf_token,
                    ..ClientConfig::new(base_url)
                };
                commands::init_config(&path, cfg, timeout_secs)
            }
            ConfigCommands::Show => {
                let cfg = commands::resolve_config(&path)?;
                commands::show_config(&cfg);
                Ok(())
            }
        },
    }
}
