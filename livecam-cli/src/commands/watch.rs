//! Watch command - capture from a device and print live statistics

use std::time::{Duration, Instant};

use anyhow::{Context as _, Result};
use clap::Args;
use livecam_core::types::CaptureStats;
use tokio::signal;
use tracing::info;

use super::{device_query, Context};

/// Arguments for the watch command
#[derive(Args)]
pub struct WatchArgs {
    /// Device index or name (defaults to the configured device)
    device: Option<String>,

    /// Requested width (defaults to the configured width)
    #[arg(long)]
    width: Option<i32>,

    /// Requested height (defaults to the configured height)
    #[arg(long)]
    height: Option<i32>,

    /// Stop after this many seconds (runs until Ctrl+C otherwise)
    #[arg(short, long)]
    seconds: Option<u64>,

    /// Host frame rate driving updates
    #[arg(long, default_value = "30")]
    fps: u32,
}

/// Start a device and drive it from a fixed-rate host loop
pub async fn watch(ctx: &Context, args: WatchArgs) -> Result<()> {
    let (config, mut manager, backend) = ctx.open_simulated()?;
    manager.set_new_device_listener(|added| {
        info!("{} new device(s) at {:?}", added.len(), added);
    });

    let width = args.width.unwrap_or(config.selection.width);
    let height = args.height.unwrap_or(config.selection.height);
    let query = device_query(args.device, &config);

    let device = manager.find_device_mut(&query)?;
    let mode = device
        .closest_mode(width, height, config.selection.maintain_aspect_ratio)
        .map(|m| m.index());
    device
        .start(mode, config.selection.video_input)
        .with_context(|| format!("Failed to start '{}'", device.name()))?;
    device.update_frame_rates = true;

    let guid = device.guid().to_string();
    let backend_index = device.index();
    println!(
        "Watching {} at {}x{} {} ({:.2} fps)",
        device.name(),
        device.current_width(),
        device.current_height(),
        device.current_format(),
        device.current_frame_rate()
    );
    println!("Press Ctrl+C to stop.\n");

    let host_fps = args.fps.max(1);
    backend.set_capture_stats(
        backend_index,
        CaptureStats {
            capture_fps: host_fps as f32,
            frames_dropped: 0.0,
        },
    );

    let deadline = args
        .seconds
        .map(|s| Instant::now() + Duration::from_secs(s));
    let mut ticker = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(host_fps)));
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut frame_number: u64 = 0;
    let mut last_report = Instant::now();

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut ctrl_c => {
                println!("\nStopping...");
                break;
            }
        }

        // The simulated camera delivers one frame per host frame
        backend.push_frames(backend_index, 1);
        manager.tick(false);
        manager.render_frame(frame_number);
        frame_number += 1;

        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            if let Some(device) = manager.device_by_guid(&guid) {
                println!(
                    "capture {:>6.2} fps | display {:>6.2} fps | dropped {:>4} | frames {:>6} | {}",
                    device.capture_fps(),
                    device.display_fps(),
                    device.capture_frames_dropped(),
                    device.frames_total(),
                    if device.is_connected() { "connected" } else { "disconnected" }
                );
            }
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
    }

    if let Some(device) = manager.device_by_guid(&guid) {
        println!(
            "\n{} frames displayed, {} dropped",
            device.frames_total(),
            device.capture_frames_dropped()
        );
    }
    manager.deinit();

    Ok(())
}
