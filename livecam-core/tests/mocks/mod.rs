//! Mock infrastructure for testing
//!
//! Provides simulated rigs and managers wired to a shared backend handle so
//! tests can hot-plug devices and feed frames.

#![allow(dead_code)]

use livecam_core::capture::simulated::SimulatedDevice;
use livecam_core::setting::SettingKind;
use livecam_core::{Manager, ManagerConfig, SimulatedBackend, SimulatedRig};
use std::sync::Arc;

/// A webcam with one mode per common resolution and mixed formats
pub fn webcam(name: &str, guid: &str) -> SimulatedDevice {
    SimulatedDevice::new(name, guid)
        .with_mode(640, 480, 30.0, "MJPG")
        .with_mode(640, 480, 30.0, "YUV_YUY2")
        .with_mode(1280, 720, 30.0, "MJPG")
        .with_mode(1920, 1080, 30.0, "RGB24")
        .with_float_setting(SettingKind::Brightness, "Brightness", 0.0, 255.0, 128.0, false)
        .with_float_setting(SettingKind::Exposure, "Exposure", -11.0, -2.0, -6.0, true)
        .with_bool_setting(SettingKind::ColorEnable, "Color Enable", true)
}

/// A capture card with several inputs delivering top-down frames
pub fn capture_card(name: &str, guid: &str) -> SimulatedDevice {
    SimulatedDevice::new(name, guid)
        .with_mode(1920, 1080, 60.0, "YUV_UYVY_HDYC")
        .with_mode(1280, 720, 60.0, "YUV_UYVY")
        .with_input("HDMI")
        .with_input("SDI")
        .with_top_down(true)
}

/// Rig with a webcam at index 0 and a capture card at index 1
pub fn two_device_rig() -> SimulatedRig {
    SimulatedRig {
        devices: vec![
            webcam("Test Webcam", "test://webcam"),
            capture_card("Test Capture", "test://capture"),
        ],
    }
}

/// Backend over `rig` plus an uninitialised manager sharing it
pub fn manager_with(rig: SimulatedRig, config: ManagerConfig) -> (SimulatedBackend, Manager) {
    let backend = SimulatedBackend::new(rig);
    let manager = Manager::new(Arc::new(backend.clone()), config);
    (backend, manager)
}

/// Initialised manager over the two-device rig with hot swapping on
pub fn initialised_manager() -> (SimulatedBackend, Manager) {
    let (backend, mut manager) = manager_with(
        two_device_rig(),
        ManagerConfig::default().with_hot_swapping(true),
    );
    manager.init().expect("simulated init");
    (backend, manager)
}
