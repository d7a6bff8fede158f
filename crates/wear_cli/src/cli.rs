use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wear")]
#[command(about = "Inspect watch face style schemas and inflate tile layouts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file or directory containing wear.toml
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Style schema operations
    #[command(subcommand)]
    Schema(SchemaCommands),

    /// Tile layout operations
    #[command(subcommand)]
    Tile(TileCommands),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Subcommand)]
pub enum SchemaCommands {
    /// Print the schema's digest hash
    Digest {
        /// Schema JSON file
        schema: PathBuf,
    },

    /// Print the style with every setting at its default
    Default {
        /// Schema JSON file
        schema: PathBuf,
    },

    /// Resolve a stored style against a schema
    Resolve(ResolveArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Schema JSON file
    pub schema: PathBuf,

    /// Stored style as a JSON object of setting id to option name
    #[arg(short, long)]
    pub style: Option<PathBuf>,

    /// Select an option, as SETTING=VALUE (repeatable)
    #[arg(long = "set", value_name = "SETTING=VALUE")]
    pub set: Vec<String>,
}

#[derive(Subcommand)]
pub enum TileCommands {
    /// Inflate a layout and print the measured view tree
    Inflate(InflateArgs),
}

#[derive(Args)]
pub struct InflateArgs {
    /// Layout JSON file
    pub layout: PathBuf,

    /// Inline image resources as a JSON object of resource id to image
    #[arg(short, long)]
    pub resources: Option<PathBuf>,

    /// Pixels per dp (overrides config)
    #[arg(long)]
    pub density: Option<f32>,

    /// Screen width in pixels (overrides config)
    #[arg(long)]
    pub width: Option<u32>,

    /// Screen height in pixels (overrides config)
    #[arg(long)]
    pub height: Option<u32>,
}
