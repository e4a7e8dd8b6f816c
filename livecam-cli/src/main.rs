//! LiveCam CLI
//!
//! Inspect and drive live camera devices.
//!
//! # Usage
//!
//! ```bash
//! # List capture devices
//! livecam list
//!
//! # Find the closest mode to 1280x720
//! livecam select 0 --width 1280 --height 720
//!
//! # Capture for ten seconds and print statistics
//! livecam watch "Integrated Webcam" --seconds 10
//! ```

mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// LiveCam - live camera device manager
#[derive(Parser)]
#[command(name = "livecam")]
#[command(version)]
#[command(about = "Inspect and drive live camera devices", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Simulated device rig (TOML) to use instead of the built-in one
    #[arg(long, global = true)]
    rig: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/livecam/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List capture devices
    #[command(alias = "ls")]
    List(commands::ListArgs),

    /// List the capture modes of a device
    Modes(commands::ModesArgs),

    /// Show or change camera controls
    Settings(commands::SettingsArgs),

    /// Pick the mode closest to a requested resolution
    Select(commands::SelectArgs),

    /// Capture from a device and print live statistics
    Watch(commands::WatchArgs),

    /// Show backend and conversion information
    Info,

    /// Manage the configuration file
    Config(commands::ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(format!("livecam={}", level).parse()?),
        )
        .with_target(false)
        .init();

    let ctx = commands::Context {
        rig: cli.rig,
        config: cli.config,
    };

    match cli.command {
        Commands::List(args) => commands::list(&ctx, args).await?,
        Commands::Modes(args) => commands::modes(&ctx, args).await?,
        Commands::Settings(args) => commands::settings(&ctx, args).await?,
        Commands::Select(args) => commands::select(&ctx, args).await?,
        Commands::Watch(args) => commands::watch(&ctx, args).await?,
        Commands::Info => commands::info(&ctx).await?,
        Commands::Config(args) => commands::config(&ctx, args).await?,
    }

    Ok(())
}
