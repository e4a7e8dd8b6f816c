//! Settings command - show or change camera controls

use anyhow::{bail, Context as _, Result};
use clap::Args;
use livecam_core::capture::SettingDataType;
use livecam_core::Device;

use super::{device_query, truncate, Context};

/// Arguments for the settings command
#[derive(Args)]
pub struct SettingsArgs {
    /// Device index or name (defaults to the configured device)
    device: Option<String>,

    /// Change a setting, e.g. `--set 0=200` or `--set 2=false`
    #[arg(long, value_name = "INDEX=VALUE")]
    set: Vec<String>,

    /// Switch a setting to automatic control
    #[arg(long, value_name = "INDEX")]
    auto: Vec<usize>,

    /// Restore a setting to its default value
    #[arg(long, value_name = "INDEX")]
    reset: Vec<usize>,
}

/// Show or change the settings of a device
pub async fn settings(ctx: &Context, args: SettingsArgs) -> Result<()> {
    let (config, mut manager) = ctx.open_manager()?;
    let device = manager.find_device_mut(&device_query(args.device, &config))?;

    for assignment in &args.set {
        apply_assignment(device, assignment)?;
    }
    for &index in &args.auto {
        device.set_setting_automatic(index, true)?;
    }
    for &index in &args.reset {
        device.reset_setting(index)?;
    }

    println!("{} - {} settings\n", device.name(), device.num_settings());

    if device.num_settings() == 0 {
        println!("This device exposes no camera controls.");
        return Ok(());
    }

    println!("{:<4} {:<6} {:<22} {:<5} {}", "#", "Key", "Name", "Auto", "Value");
    println!("{}", "-".repeat(72));

    for setting in device.settings() {
        let auto = match (setting.can_automatic(), setting.is_automatic()) {
            (false, _) => "-",
            (true, true) => "on",
            (true, false) => "off",
        };
        println!(
            "{:<4} {:<6} {:<22} {:<5} {}",
            setting.index(),
            setting.type_key(),
            truncate(setting.name(), 20),
            auto,
            setting.value()
        );
    }

    Ok(())
}

fn apply_assignment(device: &mut Device, assignment: &str) -> Result<()> {
    let (index, value) = assignment
        .split_once('=')
        .with_context(|| format!("Expected INDEX=VALUE, got '{}'", assignment))?;
    let index: usize = index
        .trim()
        .parse()
        .with_context(|| format!("Invalid setting index '{}'", index))?;

    let Some(data_type) = device.setting(index).map(|s| s.data_type()) else {
        bail!("Device has no setting #{}", index);
    };

    match data_type {
        SettingDataType::Boolean => {
            let value: bool = value
                .trim()
                .parse()
                .with_context(|| format!("Expected true or false, got '{}'", value))?;
            device.set_setting_bool(index, value)?;
        }
        SettingDataType::Float => {
            let value: f32 = value
                .trim()
                .parse()
                .with_context(|| format!("Expected a number, got '{}'", value))?;
            let written = device.set_setting_float(index, value)?;
            if written != value {
                println!("Setting #{} clamped to {:.2}", index, written);
            }
        }
    }
    Ok(())
}
