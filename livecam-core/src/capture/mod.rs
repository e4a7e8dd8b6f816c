//! Capture backend interface
//!
//! This module handles:
//! - The [`CaptureBackend`] trait every native capture layer implements
//! - Descriptors the backend hands out during enumeration
//! - An in-process [`SimulatedBackend`] for demos and tests
//!
//! Device and mode indices are the backend's own enumeration indices. A mode
//! or video input of `None` asks the backend for its default.

pub mod simulated;

pub use simulated::{SimulatedBackend, SimulatedRig};

use serde::{Deserialize, Serialize};

use crate::converter::FormatConverter;
use crate::error::Result;
use crate::types::{CaptureStats, SessionFormat};

/// One supported capture mode as described by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeInfo {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
    /// Frame rate
    pub fps: f32,
    /// Format tag (e.g. "YUV_YUY2", "MJPG")
    pub format: String,
}

/// Data type of a camera setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingDataType {
    /// On/off control
    Boolean,
    /// Ranged control
    Float,
}

/// Static description of a setting
#[derive(Debug, Clone, PartialEq)]
pub struct SettingInfo {
    /// Native type key (see [`SettingKind`](crate::setting::SettingKind))
    pub type_key: i32,
    /// Data type
    pub data_type: SettingDataType,
    /// Display name
    pub name: String,
    /// Whether the device can drive this setting automatically
    pub can_automatic: bool,
}

/// Live state of a boolean setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoolSettingState {
    /// Factory default
    pub default: bool,
    /// Current value
    pub current: bool,
    /// Whether automatic mode is on
    pub automatic: bool,
}

/// Live state of a float setting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatSettingState {
    /// Factory default
    pub default: f32,
    /// Current value
    pub current: f32,
    /// Lower bound
    pub min: f32,
    /// Upper bound
    pub max: f32,
    /// Whether automatic mode is on
    pub automatic: bool,
}

/// Static capabilities of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendCapabilities {
    /// The backend delivers frames on its own schedule; skip frame-ready polling
    pub frames_always_ready: bool,
}

/// Native capture layer
///
/// All calls are synchronous and must return within a frame budget; capture
/// itself runs asynchronously inside the backend. Enumeration getters return
/// `None` when an entry cannot be described, and callers treat that as absence.
pub trait CaptureBackend: Send + Sync {
    /// Initialise the native layer
    fn init(&self, internal_format_conversion: bool) -> Result<()>;

    /// Release the native layer
    fn deinit(&self);

    /// Backend version for logging
    fn version(&self) -> f32;

    /// Static capabilities
    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::default()
    }

    /// Number of devices currently known
    fn device_count(&self) -> usize;

    /// Human-readable device name
    fn device_name(&self, device: usize) -> Option<String>;

    /// Stable device identifier
    fn device_guid(&self, device: usize) -> Option<String>;

    /// Number of modes the device reports
    fn mode_count(&self, device: usize) -> usize;

    /// Describe one mode
    fn mode_info(&self, device: usize, mode: usize) -> Option<ModeInfo>;

    /// Number of video inputs (crossbar inputs on capture cards)
    fn video_input_count(&self, device: usize) -> usize;

    /// Name of one video input
    fn video_input_name(&self, device: usize, input: usize) -> Option<String>;

    /// Route a video input
    fn set_video_input(&self, device: usize, input: usize);

    /// Number of settings the device exposes
    fn setting_count(&self, device: usize) -> usize;

    /// Describe one setting
    fn setting_info(&self, device: usize, setting: usize) -> Option<SettingInfo>;

    /// Read a boolean setting
    fn setting_bool(&self, device: usize, setting: usize) -> Option<BoolSettingState>;

    /// Read a float setting
    fn setting_float(&self, device: usize, setting: usize) -> Option<FloatSettingState>;

    /// Write a boolean setting
    fn set_setting_bool(&self, device: usize, setting: usize, value: bool, automatic: bool)
    -> bool;

    /// Write a float setting
    fn set_setting_float(&self, device: usize, setting: usize, value: f32, automatic: bool)
    -> bool;

    /// Begin a capture session
    fn start(&self, device: usize, mode: Option<usize>, input: Option<usize>) -> bool;

    /// End the capture session
    fn stop(&self, device: usize);

    /// Resume frame delivery
    fn play(&self, device: usize) -> bool;

    /// Suspend frame delivery
    fn pause(&self, device: usize);

    /// Mark the device as active for native texture updates
    fn set_active(&self, device: usize, active: bool);

    /// Format negotiated for the current session
    fn session_format(&self, device: usize) -> SessionFormat;

    /// Capture-side statistics
    fn capture_stats(&self, device: usize) -> CaptureStats;

    /// Whether the device is physically present
    fn is_connected(&self, device: usize) -> bool;

    /// Whether a new frame is waiting to be grabbed
    fn is_frame_ready(&self, device: usize) -> bool;

    /// Refresh connection states; true if the device list changed
    fn poll_device_changes(&self) -> bool;

    /// Upload pending frames into every native texture
    fn update_all_textures(&self);

    /// Whether the device has a vendor configuration dialog
    fn has_config_window(&self, device: usize) -> bool;

    /// Open the vendor configuration dialog
    fn show_config_window(&self, device: usize) -> bool;

    /// Create a converter bound to a device
    fn create_converter(&self, device: usize) -> Box<dyn FormatConverter>;
}
