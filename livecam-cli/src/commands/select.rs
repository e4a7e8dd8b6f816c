//! Select command - pick the closest capture mode

use anyhow::Result;
use clap::Args;

use super::{device_query, Context};

/// Arguments for the select command
#[derive(Args)]
pub struct SelectArgs {
    /// Device index or name (defaults to the configured device)
    device: Option<String>,

    /// Requested width (defaults to the configured width)
    #[arg(long)]
    width: Option<i32>,

    /// Requested height (defaults to the configured height)
    #[arg(long)]
    height: Option<i32>,

    /// Only consider modes with the requested aspect ratio
    #[arg(long)]
    keep_aspect: bool,
}

/// Print the mode closest to the requested resolution
pub async fn select(ctx: &Context, args: SelectArgs) -> Result<()> {
    let (config, mut manager) = ctx.open_manager()?;
    let width = args.width.unwrap_or(config.selection.width);
    let height = args.height.unwrap_or(config.selection.height);
    let keep_aspect = args.keep_aspect || config.selection.maintain_aspect_ratio;

    let device = manager.find_device_mut(&device_query(args.device, &config))?;

    match device.closest_mode(width, height, keep_aspect) {
        Some(mode) => {
            println!("{}: mode #{} {}", device.name(), mode.index(), mode);
            if mode.width() != width || mode.height() != height {
                println!("(no exact match for {}x{})", width, height);
            }
        }
        None => {
            println!(
                "{}: no mode matches {}x{}{}",
                device.name(),
                width,
                height,
                if keep_aspect { " with the same aspect ratio" } else { "" }
            );
        }
    }

    Ok(())
}
