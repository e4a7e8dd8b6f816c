//! Info command - show backend and conversion information

use anyhow::Result;
use livecam_core::formats::VideoFrameFormat;
use livecam_core::ConversionMethod;

use super::Context;

/// Show backend, conversion and shader information
pub async fn info(ctx: &Context) -> Result<()> {
    let (config, manager) = ctx.open_manager()?;
    let backend = manager.backend();

    println!("LiveCam - System Information\n");

    println!("Capture Backend:");
    println!("  Version:          {:.2}", backend.version());
    println!(
        "  Frames always ready: {}",
        if backend.capabilities().frames_always_ready { "yes" } else { "no" }
    );
    println!("  Devices:          {}", manager.num_devices());
    println!(
        "  Hot swapping:     {}",
        if manager.config().support_hot_swapping { "enabled" } else { "disabled" }
    );

    println!();

    println!("Conversion:");
    println!("  Graphics API:     {}", manager.config().graphics_api);
    println!("  Method:           {}", manager.conversion_method());
    if manager.conversion_method() == ConversionMethod::NativeTexture {
        println!("                    (textures updated once per rendered frame)");
    }
    println!(
        "  Swap red/blue:    {}",
        if manager.swap_red_blue() { "yes" } else { "no" }
    );
    println!("  Shader keyword:   {}", manager.shader_keyword());
    println!(
        "  Internal format conversion: {}",
        if config.manager.internal_format_conversion { "yes" } else { "no" }
    );

    println!();

    println!("Shaders:");
    for format in VideoFrameFormat::SUPPORTED {
        if let Some(shader) = manager.pixel_conversion_shader(format) {
            println!("  {:<18} {}", format.name(), shader);
        }
    }
    println!("  {:<18} {}", "deinterlace", manager.deinterlace_shader());

    println!();
    println!("Configuration: {}", ctx.config_path().display());

    Ok(())
}
