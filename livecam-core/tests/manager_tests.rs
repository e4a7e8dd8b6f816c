//! Integration tests for the device manager

mod mocks;

use std::sync::{Arc, Mutex};

use livecam_core::capture::simulated::SimulatedDevice;
use livecam_core::config::ShaderSet;
use livecam_core::formats::VideoFrameFormat;
use livecam_core::manager::{SWAP_RED_BLUE_OFF, SWAP_RED_BLUE_ON};
use livecam_core::{ConversionMethod, GraphicsApi, LiveCamError, ManagerConfig, SimulatedRig};
use mocks::{initialised_manager, manager_with, two_device_rig, webcam};

#[test]
fn test_init_failure_disables_manager() {
    let (backend, mut manager) = manager_with(two_device_rig(), ManagerConfig::default());
    backend.set_fail_init(true);

    let err = manager.init().unwrap_err();

    assert!(matches!(err, LiveCamError::InitFailed(_)));
    assert!(!manager.is_initialised());
    assert!(!manager.is_enabled());
    assert_eq!(manager.num_devices(), 0);
    assert_eq!(backend.deinit_calls(), 1);
}

#[test]
fn test_missing_library_reports_hint() {
    let (backend, mut manager) = manager_with(two_device_rig(), ManagerConfig::default());
    backend.set_library_missing(true);

    let err = manager.init().unwrap_err();

    assert!(matches!(err, LiveCamError::LibraryNotFound(_)));
    assert!(err.user_hint().unwrap().contains("plugin"));
    assert_eq!(manager.num_devices(), 0);
}

#[test]
fn test_disabled_manager_ignores_hot_swap() {
    let (backend, mut manager) = manager_with(
        two_device_rig(),
        ManagerConfig::default().with_hot_swapping(true),
    );
    backend.set_fail_init(true);
    assert!(manager.init().is_err());

    backend.plug(webcam("Late Webcam", "test://late"));
    assert!(manager.update().is_empty());
    assert_eq!(manager.num_devices(), 0);
}

#[test]
fn test_init_skips_devices_without_modes() {
    let mut rig = two_device_rig();
    rig.devices.insert(1, SimulatedDevice::new("Empty", "test://empty"));
    let (_, mut manager) = manager_with(rig, ManagerConfig::default());

    manager.init().unwrap();

    assert_eq!(manager.num_devices(), 2);
    assert!(manager.device_by_name("Empty").is_none());
    // Backend indices are kept even when a device is skipped
    assert_eq!(manager.device(1).unwrap().index(), 2);
}

#[test]
fn test_deinit_is_idempotent() {
    let (backend, mut manager) = initialised_manager();
    manager.device_mut(0).unwrap().start(None, None).unwrap();

    manager.deinit();
    manager.deinit();

    assert!(!manager.is_initialised());
    assert_eq!(manager.num_devices(), 0);
    assert_eq!(backend.deinit_calls(), 1);
    assert!(!backend.is_capturing(0));
    assert!(backend.converter_params(0).is_none());

    drop(manager);
    assert_eq!(backend.deinit_calls(), 1);
}

#[test]
fn test_reinit_after_deinit() {
    let (_, mut manager) = initialised_manager();
    manager.deinit();
    manager.init().unwrap();
    assert_eq!(manager.num_devices(), 2);
}

#[test]
fn test_hot_plug_adds_device_once() {
    let (backend, mut manager) = initialised_manager();
    backend.plug(webcam("Late Webcam", "test://late"));

    let added = manager.tick(false);
    assert_eq!(added, vec![2]);
    assert_eq!(manager.num_devices(), 3);

    // Nothing changed since the last poll
    assert!(manager.tick(false).is_empty());
    // Explicit rescans never duplicate a GUID
    assert!(manager.add_new_devices().is_empty());
    assert_eq!(manager.num_devices(), 3);
}

#[test]
fn test_add_new_devices_never_removes() {
    let (backend, mut manager) = initialised_manager();
    let guids: Vec<String> = manager.devices().iter().map(|d| d.guid().to_string()).collect();

    backend.set_connected(0, false);
    manager.tick(false);
    manager.add_new_devices();

    let after: Vec<String> = manager.devices().iter().map(|d| d.guid().to_string()).collect();
    assert_eq!(guids, after);
}

#[test]
fn test_hot_swapping_disabled() {
    let (backend, mut manager) = manager_with(two_device_rig(), ManagerConfig::default());
    manager.init().unwrap();

    backend.plug(webcam("Late Webcam", "test://late"));
    assert!(manager.update().is_empty());
    assert_eq!(manager.num_devices(), 2);

    // Explicit rescans still work
    assert_eq!(manager.add_new_devices(), vec![2]);
}

#[test]
fn test_new_device_listener() {
    let (backend, mut manager) = initialised_manager();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    manager.set_new_device_listener(move |added| {
        sink.lock().unwrap().extend_from_slice(added);
    });

    backend.plug(webcam("Late Webcam", "test://late"));
    backend.plug(webcam("Later Webcam", "test://later"));
    manager.tick(false);
    manager.tick(false);

    assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
}

#[test]
fn test_tick_updates_active_devices_only() {
    let (backend, mut manager) = initialised_manager();
    manager.device_mut(0).unwrap().start(None, None).unwrap();
    backend.push_frames(0, 1);
    backend.push_frames(1, 1);

    manager.tick(false);

    assert_eq!(manager.device(0).unwrap().frames_total(), 1);
    assert_eq!(backend.pending_frames(0), 0);
    assert_eq!(backend.pending_frames(1), 1);
}

#[test]
fn test_tick_drives_reconnect() {
    let (backend, mut manager) = initialised_manager();
    manager.device_mut(1).unwrap().start(Some(1), Some(0)).unwrap();

    backend.set_connected(1, false);
    manager.tick(false);
    assert!(manager.device(1).unwrap().is_paused());

    backend.set_connected(1, true);
    manager.tick(false);
    let card = manager.device(1).unwrap();
    assert!(!card.is_paused());
    assert_eq!(card.last_mode(), Some(1));
    assert_eq!(card.last_video_input(), Some(0));
}

#[test]
fn test_render_frame_once_per_frame() {
    let (backend, mut manager) = manager_with(
        two_device_rig(),
        ManagerConfig::default().with_native_texture_updates(true),
    );
    manager.render_frame(1);
    assert_eq!(backend.texture_updates(), 0);

    manager.init().unwrap();
    manager.render_frame(1);
    manager.render_frame(1);
    manager.render_frame(2);
    manager.render_frame(2);
    manager.render_frame(3);

    assert_eq!(backend.texture_updates(), 3);
}

#[test]
fn test_render_frame_without_native_updates() {
    let (backend, mut manager) = initialised_manager();
    assert_eq!(manager.conversion_method(), ConversionMethod::Script);

    manager.render_frame(1);
    manager.render_frame(2);

    assert_eq!(backend.texture_updates(), 0);
}

#[test]
fn test_conversion_method_selection() {
    let cases = [
        (true, GraphicsApi::Direct3D11, ConversionMethod::NativeTexture, true),
        (true, GraphicsApi::OpenGl, ConversionMethod::NativeTexture, false),
        (true, GraphicsApi::Direct3D9, ConversionMethod::NativeTexture, false),
        (false, GraphicsApi::Direct3D11, ConversionMethod::Script, true),
        (false, GraphicsApi::OpenGl, ConversionMethod::Script, true),
    ];

    for (native, api, method, swap) in cases {
        let (_, mut manager) = manager_with(
            SimulatedRig::default_rig(),
            ManagerConfig::default()
                .with_native_texture_updates(native)
                .with_graphics_api(api),
        );
        manager.init().unwrap();

        assert_eq!(manager.conversion_method(), method, "{:?} {}", api, native);
        assert_eq!(manager.swap_red_blue(), swap, "{:?} {}", api, native);
        let expected = if swap { SWAP_RED_BLUE_ON } else { SWAP_RED_BLUE_OFF };
        assert_eq!(manager.shader_keyword(), expected);
    }
}

#[test]
fn test_shader_routing() {
    let shaders = ShaderSet {
        yuy2: "Custom/YUY2".to_string(),
        ..ShaderSet::default()
    };
    let (_, manager) = manager_with(
        two_device_rig(),
        ManagerConfig::default().with_shaders(shaders),
    );

    assert_eq!(
        manager.pixel_conversion_shader(VideoFrameFormat::Yuy2),
        Some("Custom/YUY2")
    );
    assert_eq!(
        manager.pixel_conversion_shader(VideoFrameFormat::Bgra32),
        Some("LiveCamera/CompositeBGRA")
    );
    assert_eq!(manager.pixel_conversion_shader(VideoFrameFormat::Unknown), None);
    assert_eq!(manager.deinterlace_shader(), "LiveCamera/Deinterlace");
}

#[test]
fn test_lookup_by_name_and_guid() {
    let (_, mut manager) = initialised_manager();

    assert_eq!(manager.device_by_name("Test Capture").unwrap().index(), 1);
    assert_eq!(manager.device_by_guid("test://webcam").unwrap().index(), 0);
    assert!(manager.device_by_name("Missing").is_none());
    assert!(manager.device(7).is_none());

    manager.device_by_name_mut("Test Webcam").unwrap().set_flip_x(true);
    assert!(manager.device(0).unwrap().flip_x());
}

#[test]
fn test_device_defaults_applied() {
    let mut config = ManagerConfig::default();
    config.device_defaults.flip_x = true;
    config.device_defaults.update_frame_rates = true;
    let (_, mut manager) = manager_with(two_device_rig(), config);
    manager.init().unwrap();

    for device in manager.devices() {
        assert!(device.flip_x());
        assert!(device.update_frame_rates);
        assert!(!device.update_settings);
    }
}
