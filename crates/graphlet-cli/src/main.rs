//! Graphlet CLI - Run and configure the property graph server

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;

use commands::{completions, config as config_cmd, serve};
use config::{default_config_path, Config};

#[derive(Parser)]
#[command(name = "graphlet")]
#[command(author, version, about = "In-memory property graph over HTTP")]
pub struct Cli {
    /// Config file path
    #[arg(short, long, global = true, env = "GRAPHLET_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Get the config file path
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(default_config_path)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve(serve::ServeArgs),
    /// Manage the config file
    Config(config_cmd::ConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config_path());

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error".to_string(),
        0 => config
            .as_ref()
            .ok()
            .and_then(|c| c.log_level.clone())
            .unwrap_or_else(|| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting graphlet CLI");

    match &cli.command {
        Commands::Serve(args) => serve::run(args, config?).await?,
        Commands::Config(args) => config_cmd::run(args, &cli, config)?,
        Commands::Completions(args) => completions::run(args)?,
    }

    Ok(())
}
