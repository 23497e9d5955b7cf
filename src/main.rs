//! K90 driver entry point

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use k90_driver::DriverConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let config_path = cli.config.clone().unwrap_or_else(DriverConfig::default_path);
    info!("Loading config from {:?}", config_path);
    let config = DriverConfig::load(&config_path)?;

    match cli.command {
        None | Some(Commands::Status) => commands::query::status(&config, cli.monitor),
        Some(Commands::List) => commands::query::list(),
        Some(Commands::Get { attr }) => commands::query::get(&config, cli.monitor, &attr),
        Some(Commands::Set { attr, value }) => {
            commands::set::set(&config, cli.monitor, &attr, &value)
        }
        Some(Commands::Keymap { save }) => {
            commands::query::keymap(&config)?;
            if save {
                commands::set::save_keymap(&config, &config_path)?;
            }
            Ok(())
        }
        Some(Commands::Run) => commands::run::run(&config, cli.monitor),
    }
}
