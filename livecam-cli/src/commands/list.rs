//! List command - show capture devices

use anyhow::Result;
use clap::Args;
use livecam_core::types::DeviceSummary;

use super::{truncate, Context};

/// Arguments for the list command
#[derive(Args)]
pub struct ListArgs {
    /// Print the device list as JSON
    #[arg(long)]
    json: bool,
}

/// List capture devices
pub async fn list(ctx: &Context, args: ListArgs) -> Result<()> {
    let (_, manager) = ctx.open_manager()?;
    let summaries: Vec<DeviceSummary> = manager.devices().iter().map(|d| d.summary()).collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("LiveCam - Capture Devices\n");

    if summaries.is_empty() {
        println!("No devices found.");
        println!("\nCheck that a camera is connected and not in use by another application.");
        return Ok(());
    }

    println!(
        "{:<4} {:<28} {:<30} {:>6} {:>9}  {}",
        "#", "Name", "GUID", "Modes", "Settings", "Inputs"
    );
    println!("{}", "-".repeat(90));

    for summary in &summaries {
        let inputs = if summary.video_inputs.is_empty() {
            "-".to_string()
        } else {
            summary.video_inputs.join(", ")
        };
        let status = if summary.connected { "" } else { " (disconnected)" };

        println!(
            "{:<4} {:<28} {:<30} {:>6} {:>9}  {}{}",
            summary.index,
            truncate(&summary.name, 26),
            truncate(&summary.guid, 28),
            summary.modes,
            summary.settings,
            inputs,
            status
        );
    }

    println!("\nUse 'livecam modes <device>' to see the capture modes of a device.");

    Ok(())
}
