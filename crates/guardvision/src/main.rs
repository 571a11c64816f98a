//! GuardVision CLI - proof-read posters and marketing copy through third-party
//! OCR and LLM vendors.
//!
//! The `serve` command runs the HTTP API that talks to the vendors; the
//! other commands are a terminal front end for that API.
//!
//! # Usage
//!
//! ```bash
//! # Run the API
//! guardvision serve --bind 0.0.0.0:3000
//!
//! # Scan posters: OCR with Baidu, review with Claude
//! guardvision scan poster1.png poster2.jpg --ocr baidu --llm anthropic
//!
//! # Review a snippet of copy
//! guardvision check "4K waterproof camra with night vision" --llm deepseek
//!
//! # Which vendors are configured and answering
//! guardvision status
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;

/// GuardVision - poster and copy proof-reading for security-equipment marketing.
#[derive(Parser, Debug)]
#[command(name = "guardvision")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "GUARDVISION_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API (/api/ocr, /api/analyze, /api/test)
    Serve(cli::serve::ServeArgs),

    /// OCR and review one or more poster images
    Scan(cli::scan::ScanArgs),

    /// Review a piece of marketing copy
    Check(cli::check::CheckArgs),

    /// Show which vendors are configured and reachable
    Status(cli::status::StatusArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln
    let loaded = match &cli.config {
        Some(path) => guardvision_core::Config::load_from(path),
        None => guardvision_core::Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `guardvision config path`."
            );
            guardvision_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("GuardVision v{}", guardvision_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Scan(args) => cli::scan::execute(args, config).await,
        Commands::Check(args) => cli::check::execute(args, config).await,
        Commands::Status(args) => cli::status::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, config, cli.config).await,
    }
}
