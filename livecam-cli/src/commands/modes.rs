//! Modes command - show the capture modes of a device

use anyhow::Result;
use clap::Args;
use livecam_core::formats::format_rank;

use super::{device_query, Context};

/// Arguments for the modes command
#[derive(Args)]
pub struct ModesArgs {
    /// Device index or name (defaults to the configured device)
    device: Option<String>,
}

/// List the capture modes of a device
pub async fn modes(ctx: &Context, args: ModesArgs) -> Result<()> {
    let (config, mut manager) = ctx.open_manager()?;
    let device = manager.find_device_mut(&device_query(args.device, &config))?;

    println!("{} - {} modes\n", device.name(), device.num_modes());
    println!(
        "{:<4} {:>11} {:>8} {:<16} {:>5}",
        "#", "Resolution", "FPS", "Format", "Rank"
    );
    println!("{}", "-".repeat(48));

    for mode in device.modes() {
        println!(
            "{:<4} {:>11} {:>8.2} {:<16} {:>5}",
            mode.index(),
            format!("{}x{}", mode.width(), mode.height()),
            mode.fps(),
            mode.format(),
            format_rank(mode.format())
        );
    }

    if device.num_video_inputs() > 0 {
        println!("\nVideo inputs:");
        for (i, input) in device.video_inputs().iter().enumerate() {
            println!("  {}: {}", i, input);
        }
    }

    Ok(())
}
