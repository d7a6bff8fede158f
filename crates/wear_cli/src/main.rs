//! wear - command line tools for watch face styles and tiles

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};
use config::WearConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = WearConfig::load(cli.config.as_deref())?;

    let filter = if cli.verbose {
        EnvFilter::new("wear_cli=debug,wear_style=debug,wear_tiles=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    debug!("config: {:?}", config);

    match cli.command {
        Commands::Schema(command) => commands::schema::run(command),
        Commands::Tile(command) => commands::tile::run(command, &config.inflater),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
