//! Config command - manage configuration files

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use livecam_core::config::{sample_config, ConfigFile};

use super::Context;

/// Arguments for the config command
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the path to the config file
    Path,

    /// Show the current configuration
    Show,

    /// Generate a default config file
    Init {
        /// Force overwrite if file exists
        #[arg(short, long)]
        force: bool,
    },

    /// Print a sample configuration to stdout
    Sample,
}

/// Run config subcommand
pub async fn config(ctx: &Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Path => {
            let path = ctx.config_path();
            println!("{}", path.display());
            if path.exists() {
                println!("(file exists)");
            } else {
                println!("(file does not exist)");
            }
        }
        ConfigCommand::Show => {
            let path = ctx.config_path();
            if !path.exists() {
                println!("No configuration file found at: {}", path.display());
                println!();
                println!("Using default settings. Create a config file with:");
                println!("  livecam config init");
                return Ok(());
            }

            let config = ctx.load_config()?;
            let content = toml::to_string_pretty(&config).context("Failed to render config")?;

            println!("Configuration file: {}\n", path.display());
            println!("{}", content);

            let manager = config.manager_config()?;
            println!(
                "# graphics API: {}, hot swapping: {}",
                manager.graphics_api,
                if manager.support_hot_swapping { "on" } else { "off" }
            );
        }
        ConfigCommand::Init { force } => {
            let path = ctx.config_path();

            if path.exists() && !force {
                println!("Configuration file already exists: {}", path.display());
                println!();
                println!("Use --force to overwrite, or edit the existing file.");
                return Ok(());
            }

            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent).context("Failed to create config directory")?;
                }
            }

            std::fs::write(&path, sample_config()).context("Failed to write config file")?;

            println!("Created configuration file: {}", path.display());
            println!();
            println!("Edit this file to choose a device, resolution and shaders.");
        }
        ConfigCommand::Sample => {
            print!("{}", sample_config());
        }
    }

    Ok(())
}
