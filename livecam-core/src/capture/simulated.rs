//! In-process simulated capture backend
//!
//! Behaves like a native capture plugin driven by a [`SimulatedRig`]: a TOML
//! description of devices, their modes, inputs and settings. Clones of a
//! [`SimulatedBackend`] share state, so one clone can be handed to a
//! [`Manager`](crate::manager::Manager) while another hot-plugs devices,
//! disconnects them or feeds frames.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::{
    BackendCapabilities, BoolSettingState, CaptureBackend, FloatSettingState, ModeInfo,
    SettingInfo,
};
use crate::converter::{ConverterParams, FormatConverter};
use crate::error::{LiveCamError, Result};
use crate::formats::VideoFrameFormat;
use crate::setting::{SettingKind, SettingValue};
use crate::types::{CaptureStats, SessionFormat, TextureHandle};

/// Version reported by the simulated backend
pub const SIMULATED_VERSION: f32 = 1.0;

/// A set of simulated devices
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulatedRig {
    /// Devices in enumeration order
    #[serde(default)]
    pub devices: Vec<SimulatedDevice>,
}

/// One simulated capture device
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedDevice {
    /// Human-readable name
    pub name: String,
    /// Stable identifier
    pub guid: String,
    /// Supported modes; entries with a non-positive size cannot be described
    #[serde(default)]
    pub modes: Vec<ModeInfo>,
    /// Video input names
    #[serde(default)]
    pub video_inputs: Vec<String>,
    /// Exposed settings
    #[serde(default)]
    pub settings: Vec<SimulatedSetting>,
    /// Whether the device starts out plugged in
    #[serde(default = "default_true")]
    pub connected: bool,
    /// Whether frames are delivered top row first
    #[serde(default)]
    pub top_down: bool,
    /// Whether the device has a vendor configuration dialog
    #[serde(default)]
    pub config_window: bool,
}

/// One simulated camera control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatedSetting {
    /// Native type key
    pub key: i32,
    /// Display name
    pub name: String,
    /// Whether automatic mode is available
    #[serde(default)]
    pub can_automatic: bool,
    /// Whether automatic mode is on
    #[serde(default)]
    pub automatic: bool,
    /// Value and bounds
    pub value: SettingValue,
}

fn default_true() -> bool {
    true
}

impl SimulatedDevice {
    /// Create a connected device with no modes, inputs or settings
    pub fn new(name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            guid: guid.into(),
            modes: Vec::new(),
            video_inputs: Vec::new(),
            settings: Vec::new(),
            connected: true,
            top_down: false,
            config_window: false,
        }
    }

    /// Add a mode
    pub fn with_mode(mut self, width: i32, height: i32, fps: f32, format: &str) -> Self {
        self.modes.push(ModeInfo {
            width,
            height,
            fps,
            format: format.to_string(),
        });
        self
    }

    /// Add a video input
    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.video_inputs.push(name.into());
        self
    }

    /// Add a boolean setting
    pub fn with_bool_setting(mut self, kind: SettingKind, name: &str, default: bool) -> Self {
        self.settings.push(SimulatedSetting {
            key: kind.code(),
            name: name.to_string(),
            can_automatic: false,
            automatic: false,
            value: SettingValue::Boolean {
                current: default,
                default,
            },
        });
        self
    }

    /// Add a float setting
    pub fn with_float_setting(
        mut self,
        kind: SettingKind,
        name: &str,
        min: f32,
        max: f32,
        default: f32,
        can_automatic: bool,
    ) -> Self {
        self.settings.push(SimulatedSetting {
            key: kind.code(),
            name: name.to_string(),
            can_automatic,
            automatic: false,
            value: SettingValue::Float {
                current: default,
                default,
                min,
                max,
            },
        });
        self
    }

    /// Set frame row order
    pub fn with_top_down(mut self, top_down: bool) -> Self {
        self.top_down = top_down;
        self
    }

    /// Expose a vendor configuration dialog
    pub fn with_config_window(mut self) -> Self {
        self.config_window = true;
        self
    }
}

impl SimulatedRig {
    /// Two devices: a webcam with controls and an HDMI capture card with inputs
    pub fn default_rig() -> Self {
        let webcam = SimulatedDevice::new("Integrated Webcam", "sim://integrated-webcam")
            .with_mode(640, 480, 30.0, "YUV_YUY2")
            .with_mode(640, 480, 30.0, "MJPG")
            .with_mode(1280, 720, 10.0, "YUV_YUY2")
            .with_mode(1280, 720, 30.0, "MJPG")
            .with_mode(1920, 1080, 30.0, "MJPG")
            .with_mode(320, 240, 30.0, "YUV_YUY2")
            .with_float_setting(SettingKind::Brightness, "Brightness", 0.0, 255.0, 128.0, false)
            .with_float_setting(SettingKind::Contrast, "Contrast", 0.0, 100.0, 50.0, false)
            .with_bool_setting(SettingKind::ColorEnable, "Color Enable", true)
            .with_float_setting(
                SettingKind::WhiteBalance,
                "White Balance",
                2800.0,
                6500.0,
                4600.0,
                true,
            )
            .with_float_setting(SettingKind::Exposure, "Exposure", -11.0, -2.0, -6.0, true);

        let capture_card = SimulatedDevice::new("HDMI Capture", "sim://hdmi-capture")
            .with_mode(1920, 1080, 60.0, "YUV_UYVY_HDYC")
            .with_mode(1920, 1080, 60.0, "YUV_UYVY")
            .with_mode(1280, 720, 60.0, "YUV_UYVY")
            .with_input("HDMI")
            .with_input("Composite")
            .with_input("S-Video")
            .with_top_down(true)
            .with_config_window();

        Self {
            devices: vec![webcam, capture_card],
        }
    }

    /// Parse a rig from TOML
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| LiveCamError::Config(format!("Failed to parse rig: {}", e)))
    }

    /// Load a rig from a TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LiveCamError::Config(format!("Failed to read rig {}: {}", path.display(), e))
        })?;
        let rig = Self::from_toml_str(&content)?;
        info!("Loaded simulated rig from {:?} ({} devices)", path, rig.devices.len());
        Ok(rig)
    }
}

/// A start request as seen by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRequest {
    /// Device index
    pub device: usize,
    /// Requested mode
    pub mode: Option<usize>,
    /// Requested video input
    pub input: Option<usize>,
}

#[derive(Debug)]
struct Session {
    mode: Option<usize>,
    playing: bool,
}

#[derive(Debug)]
struct DeviceState {
    desc: SimulatedDevice,
    session: Option<Session>,
    pending_frames: u32,
    active: bool,
    reject_next_start: bool,
    dimension_override: Option<(i32, i32)>,
    stats: CaptureStats,
    selected_input: Option<usize>,
    converter: Option<ConverterParams>,
}

impl DeviceState {
    fn new(desc: SimulatedDevice) -> Self {
        Self {
            desc,
            session: None,
            pending_frames: 0,
            active: false,
            reject_next_start: false,
            dimension_override: None,
            stats: CaptureStats::default(),
            selected_input: None,
            converter: None,
        }
    }

    fn is_playing(&self) -> bool {
        self.desc.connected && self.session.as_ref().is_some_and(|s| s.playing)
    }
}

#[derive(Debug, Default)]
struct State {
    initialised: bool,
    library_missing: bool,
    fail_init: bool,
    devices: Vec<DeviceState>,
    list_changed: bool,
    start_log: Vec<StartRequest>,
    texture_updates: u64,
    next_texture: u64,
    deinit_calls: u32,
}

/// Programmable capture backend
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    state: Arc<Mutex<State>>,
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(SimulatedRig::default_rig())
    }
}

impl SimulatedBackend {
    /// Create a backend serving the given rig
    pub fn new(rig: SimulatedRig) -> Self {
        let state = State {
            devices: rig.devices.into_iter().map(DeviceState::new).collect(),
            ..State::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Attach a new device; it is reported on the next device-change poll.
    ///
    /// Returns the new device's index.
    pub fn plug(&self, device: SimulatedDevice) -> usize {
        let mut state = self.state.lock();
        info!("Simulated device '{}' plugged in", device.name);
        state.devices.push(DeviceState::new(device));
        state.list_changed = true;
        state.devices.len() - 1
    }

    /// Connect or disconnect a device
    pub fn set_connected(&self, device: usize, connected: bool) {
        let mut state = self.state.lock();
        if let Some(dev) = state.devices.get_mut(device) {
            if dev.desc.connected != connected {
                dev.desc.connected = connected;
                if !connected {
                    dev.pending_frames = 0;
                }
                state.list_changed = true;
            }
        }
    }

    /// Queue frames for delivery
    pub fn push_frames(&self, device: usize, count: u32) {
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            dev.pending_frames += count;
        }
    }

    /// Make the next start request on a device fail
    pub fn reject_next_start(&self, device: usize) {
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            dev.reject_next_start = true;
        }
    }

    /// Report these dimensions for every following session of a device
    pub fn override_dimensions(&self, device: usize, width: i32, height: i32) {
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            dev.dimension_override = Some((width, height));
        }
    }

    /// Set the capture statistics reported for a device
    pub fn set_capture_stats(&self, device: usize, stats: CaptureStats) {
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            dev.stats = stats;
        }
    }

    /// Change a float setting device-side, as a user turning a knob would
    pub fn set_float_setting_externally(&self, device: usize, setting: usize, value: f32) {
        if let Some(SimulatedSetting {
            value: SettingValue::Float { current, .. },
            ..
        }) = self
            .state
            .lock()
            .devices
            .get_mut(device)
            .and_then(|d| d.desc.settings.get_mut(setting))
        {
            *current = value;
        }
    }

    /// Pretend the native library is missing on the next init
    pub fn set_library_missing(&self, missing: bool) {
        self.state.lock().library_missing = missing;
    }

    /// Make the next init fail
    pub fn set_fail_init(&self, fail: bool) {
        self.state.lock().fail_init = fail;
    }

    /// Every start request received so far
    pub fn start_requests(&self) -> Vec<StartRequest> {
        self.state.lock().start_log.clone()
    }

    /// Number of texture update triggers received
    pub fn texture_updates(&self) -> u64 {
        self.state.lock().texture_updates
    }

    /// Number of deinit calls received
    pub fn deinit_calls(&self) -> u32 {
        self.state.lock().deinit_calls
    }

    /// Whether the backend is initialised
    pub fn is_initialised(&self) -> bool {
        self.state.lock().initialised
    }

    /// Whether a capture session exists for the device
    pub fn is_capturing(&self, device: usize) -> bool {
        self.state
            .lock()
            .devices
            .get(device)
            .is_some_and(|d| d.session.is_some())
    }

    /// Whether the device is delivering frames
    pub fn is_playing(&self, device: usize) -> bool {
        self.state
            .lock()
            .devices
            .get(device)
            .is_some_and(|d| d.is_playing())
    }

    /// Whether the device was marked active
    pub fn is_active(&self, device: usize) -> bool {
        self.state
            .lock()
            .devices
            .get(device)
            .is_some_and(|d| d.active)
    }

    /// Last routed video input
    pub fn selected_input(&self, device: usize) -> Option<usize> {
        self.state
            .lock()
            .devices
            .get(device)
            .and_then(|d| d.selected_input)
    }

    /// Parameters of the device's converter, if built
    pub fn converter_params(&self, device: usize) -> Option<ConverterParams> {
        self.state
            .lock()
            .devices
            .get(device)
            .and_then(|d| d.converter)
    }

    /// Frames queued but not yet converted
    pub fn pending_frames(&self, device: usize) -> u32 {
        self.state
            .lock()
            .devices
            .get(device)
            .map(|d| d.pending_frames)
            .unwrap_or(0)
    }

    fn with_setting<T>(
        &self,
        device: usize,
        setting: usize,
        f: impl FnOnce(&mut SimulatedSetting) -> Option<T>,
    ) -> Option<T> {
        let mut state = self.state.lock();
        if !state.initialised {
            return None;
        }
        state
            .devices
            .get_mut(device)
            .and_then(|d| d.desc.settings.get_mut(setting))
            .and_then(f)
    }
}

impl CaptureBackend for SimulatedBackend {
    fn init(&self, internal_format_conversion: bool) -> Result<()> {
        let mut state = self.state.lock();
        if state.library_missing {
            return Err(LiveCamError::LibraryNotFound("livecam-sim".to_string()));
        }
        if state.fail_init {
            return Err(LiveCamError::init("simulated init failure"));
        }
        debug!(
            "Simulated backend init (internal format conversion: {})",
            internal_format_conversion
        );
        state.initialised = true;
        Ok(())
    }

    fn deinit(&self) {
        let mut state = self.state.lock();
        state.initialised = false;
        state.deinit_calls += 1;
        for dev in &mut state.devices {
            dev.session = None;
            dev.pending_frames = 0;
        }
    }

    fn version(&self) -> f32 {
        SIMULATED_VERSION
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities {
            frames_always_ready: false,
        }
    }

    fn device_count(&self) -> usize {
        let state = self.state.lock();
        if state.initialised { state.devices.len() } else { 0 }
    }

    fn device_name(&self, device: usize) -> Option<String> {
        let state = self.state.lock();
        state.devices.get(device).map(|d| d.desc.name.clone())
    }

    fn device_guid(&self, device: usize) -> Option<String> {
        let state = self.state.lock();
        state.devices.get(device).map(|d| d.desc.guid.clone())
    }

    fn mode_count(&self, device: usize) -> usize {
        let state = self.state.lock();
        state.devices.get(device).map(|d| d.desc.modes.len()).unwrap_or(0)
    }

    fn mode_info(&self, device: usize, mode: usize) -> Option<ModeInfo> {
        let state = self.state.lock();
        state
            .devices
            .get(device)
            .and_then(|d| d.desc.modes.get(mode))
            .filter(|m| m.width > 0 && m.height > 0)
            .cloned()
    }

    fn video_input_count(&self, device: usize) -> usize {
        let state = self.state.lock();
        state
            .devices
            .get(device)
            .map(|d| d.desc.video_inputs.len())
            .unwrap_or(0)
    }

    fn video_input_name(&self, device: usize, input: usize) -> Option<String> {
        let state = self.state.lock();
        state
            .devices
            .get(device)
            .and_then(|d| d.desc.video_inputs.get(input))
            .cloned()
    }

    fn set_video_input(&self, device: usize, input: usize) {
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            if input < dev.desc.video_inputs.len() {
                dev.selected_input = Some(input);
            }
        }
    }

    fn setting_count(&self, device: usize) -> usize {
        let state = self.state.lock();
        state
            .devices
            .get(device)
            .map(|d| d.desc.settings.len())
            .unwrap_or(0)
    }

    fn setting_info(&self, device: usize, setting: usize) -> Option<SettingInfo> {
        self.with_setting(device, setting, |s| {
            Some(SettingInfo {
                type_key: s.key,
                data_type: s.value.data_type(),
                name: s.name.clone(),
                can_automatic: s.can_automatic,
            })
        })
    }

    fn setting_bool(&self, device: usize, setting: usize) -> Option<BoolSettingState> {
        self.with_setting(device, setting, |s| match s.value {
            SettingValue::Boolean { current, default } => Some(BoolSettingState {
                default,
                current,
                automatic: s.automatic,
            }),
            SettingValue::Float { .. } => None,
        })
    }

    fn setting_float(&self, device: usize, setting: usize) -> Option<FloatSettingState> {
        self.with_setting(device, setting, |s| match s.value {
            SettingValue::Float {
                current,
                default,
                min,
                max,
            } => Some(FloatSettingState {
                default,
                current,
                min,
                max,
                automatic: s.automatic,
            }),
            SettingValue::Boolean { .. } => None,
        })
    }

    fn set_setting_bool(&self, device: usize, setting: usize, value: bool, automatic: bool) -> bool {
        self.with_setting(device, setting, |s| match &mut s.value {
            SettingValue::Boolean { current, .. } => {
                *current = value;
                s.automatic = automatic && s.can_automatic;
                Some(())
            }
            SettingValue::Float { .. } => None,
        })
        .is_some()
    }

    fn set_setting_float(&self, device: usize, setting: usize, value: f32, automatic: bool) -> bool {
        self.with_setting(device, setting, |s| match &mut s.value {
            SettingValue::Float { current, .. } => {
                *current = value;
                s.automatic = automatic && s.can_automatic;
                Some(())
            }
            SettingValue::Boolean { .. } => None,
        })
        .is_some()
    }

    fn start(&self, device: usize, mode: Option<usize>, input: Option<usize>) -> bool {
        let mut state = self.state.lock();
        state.start_log.push(StartRequest {
            device,
            mode,
            input,
        });
        if !state.initialised {
            return false;
        }
        let Some(dev) = state.devices.get_mut(device) else {
            return false;
        };
        if std::mem::take(&mut dev.reject_next_start) || !dev.desc.connected {
            return false;
        }
        if mode.is_some_and(|m| m >= dev.desc.modes.len()) || dev.desc.modes.is_empty() {
            return false;
        }

        if let Some(input) = input {
            dev.selected_input = Some(input);
        }
        dev.session = Some(Session {
            mode,
            playing: false,
        });
        trace!("Simulated device #{} started (mode {:?})", device, mode);
        true
    }

    fn stop(&self, device: usize) {
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            dev.session = None;
            dev.pending_frames = 0;
        }
    }

    fn play(&self, device: usize) -> bool {
        let mut state = self.state.lock();
        match state.devices.get_mut(device) {
            Some(dev) if dev.desc.connected => match dev.session.as_mut() {
                Some(session) => {
                    session.playing = true;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    fn pause(&self, device: usize) {
        if let Some(session) = self
            .state
            .lock()
            .devices
            .get_mut(device)
            .and_then(|d| d.session.as_mut())
        {
            session.playing = false;
        }
    }

    fn set_active(&self, device: usize, active: bool) {
        if let Some(dev) = self.state.lock().devices.get_mut(device) {
            dev.active = active;
        }
    }

    fn session_format(&self, device: usize) -> SessionFormat {
        let state = self.state.lock();
        let empty = SessionFormat {
            width: 0,
            height: 0,
            format: VideoFrameFormat::Unknown,
            frame_rate: 0.0,
            frame_duration_hns: 0,
            top_down: false,
        };
        let Some(dev) = state.devices.get(device) else {
            return empty;
        };
        let Some(session) = dev.session.as_ref() else {
            return empty;
        };
        let Some(mode) = dev.desc.modes.get(session.mode.unwrap_or(0)) else {
            return empty;
        };

        let (width, height) = dev.dimension_override.unwrap_or((mode.width, mode.height));
        let frame_duration_hns = if mode.fps > 0.0 {
            (10_000_000.0 / mode.fps as f64).round() as i64
        } else {
            0
        };
        SessionFormat {
            width,
            height,
            format: VideoFrameFormat::from_mode_tag(&mode.format),
            frame_rate: mode.fps,
            frame_duration_hns,
            top_down: dev.desc.top_down,
        }
    }

    fn capture_stats(&self, device: usize) -> CaptureStats {
        let state = self.state.lock();
        state
            .devices
            .get(device)
            .filter(|d| d.session.is_some())
            .map(|d| d.stats)
            .unwrap_or_default()
    }

    fn is_connected(&self, device: usize) -> bool {
        let state = self.state.lock();
        state.devices.get(device).is_some_and(|d| d.desc.connected)
    }

    fn is_frame_ready(&self, device: usize) -> bool {
        let state = self.state.lock();
        state
            .devices
            .get(device)
            .is_some_and(|d| d.is_playing() && d.pending_frames > 0)
    }

    fn poll_device_changes(&self) -> bool {
        std::mem::take(&mut self.state.lock().list_changed)
    }

    fn update_all_textures(&self) {
        self.state.lock().texture_updates += 1;
    }

    fn has_config_window(&self, device: usize) -> bool {
        let state = self.state.lock();
        state.devices.get(device).is_some_and(|d| d.desc.config_window)
    }

    fn show_config_window(&self, device: usize) -> bool {
        let shown = self.has_config_window(device);
        if shown {
            info!("Simulated config window for device #{}", device);
        }
        shown
    }

    fn create_converter(&self, device: usize) -> Box<dyn FormatConverter> {
        Box::new(SimulatedConverter {
            state: Arc::clone(&self.state),
            device,
            params: None,
            texture: None,
            frames_converted: 0,
        })
    }
}

/// Converter that consumes queued simulated frames
struct SimulatedConverter {
    state: Arc<Mutex<State>>,
    device: usize,
    params: Option<ConverterParams>,
    texture: Option<TextureHandle>,
    frames_converted: u64,
}

impl SimulatedConverter {
    fn publish_params(&self) {
        if let Some(dev) = self.state.lock().devices.get_mut(self.device) {
            dev.converter = self.params;
        }
    }
}

impl FormatConverter for SimulatedConverter {
    fn build(&mut self, params: ConverterParams) -> bool {
        self.frames_converted = 0;
        if !params.format.is_supported() || params.width == 0 || params.height == 0 {
            self.params = None;
            self.texture = None;
            self.publish_params();
            return false;
        }

        self.params = Some(params);
        if self.texture.is_none() {
            let mut state = self.state.lock();
            state.next_texture += 1;
            self.texture = Some(TextureHandle::new(state.next_texture));
        }
        self.publish_params();
        true
    }

    fn update(&mut self) -> bool {
        if self.params.is_none() {
            return false;
        }
        let mut state = self.state.lock();
        let Some(dev) = state.devices.get_mut(self.device) else {
            return false;
        };
        if !dev.is_playing() || dev.pending_frames == 0 {
            return false;
        }
        dev.pending_frames -= 1;
        self.frames_converted += 1;
        true
    }

    fn output_texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    fn has_valid_picture(&self) -> bool {
        self.params.is_some() && self.frames_converted > 0
    }

    fn set_flip_x(&mut self, flip: bool) {
        if let Some(params) = self.params.as_mut() {
            params.flip_x = flip;
        }
        self.publish_params();
    }

    fn set_flip_y(&mut self, flip: bool) {
        if let Some(params) = self.params.as_mut() {
            params.flip_y = flip;
        }
        self.publish_params();
    }
}

impl Drop for SimulatedConverter {
    fn drop(&mut self) {
        if let Some(dev) = self.state.lock().devices.get_mut(self.device) {
            dev.converter = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_count_requires_init() {
        let backend = SimulatedBackend::default();
        assert_eq!(backend.device_count(), 0);
        backend.init(false).unwrap();
        assert_eq!(backend.device_count(), 2);
    }

    #[test]
    fn test_start_logs_request_even_when_rejected() {
        let backend = SimulatedBackend::default();
        backend.init(false).unwrap();
        backend.reject_next_start(0);
        assert!(!backend.start(0, Some(1), None));
        assert!(backend.start(0, Some(1), None));
        assert_eq!(backend.start_requests().len(), 2);
    }

    #[test]
    fn test_session_format_follows_mode() {
        let backend = SimulatedBackend::default();
        backend.init(false).unwrap();
        assert!(backend.start(1, Some(0), Some(2)));
        let format = backend.session_format(1);
        assert_eq!((format.width, format.height), (1920, 1080));
        assert_eq!(format.format, VideoFrameFormat::Hdyc);
        assert_eq!(format.frame_duration_hns, 166_667);
        assert!(format.top_down);
        assert_eq!(backend.selected_input(1), Some(2));
    }

    #[test]
    fn test_frames_only_ready_while_playing() {
        let backend = SimulatedBackend::default();
        backend.init(false).unwrap();
        backend.start(0, None, None);
        backend.push_frames(0, 2);
        assert!(!backend.is_frame_ready(0));
        backend.play(0);
        assert!(backend.is_frame_ready(0));
    }

    #[test]
    fn test_poll_device_changes_clears_flag() {
        let backend = SimulatedBackend::default();
        backend.plug(SimulatedDevice::new("USB Cam", "sim://usb"));
        assert!(backend.poll_device_changes());
        assert!(!backend.poll_device_changes());
    }

    #[test]
    fn test_rig_from_toml() {
        let rig = SimulatedRig::from_toml_str(
            r#"
[[devices]]
name = "Lab Camera"
guid = "sim://lab"
video_inputs = ["SDI"]

[[devices.modes]]
width = 1280
height = 720
fps = 50.0
format = "YUV_UYVY"

[[devices.settings]]
key = 1003
name = "Zoom"
value = { type = "float", current = 1.0, default = 1.0, min = 1.0, max = 4.0 }
"#,
        )
        .unwrap();
        assert_eq!(rig.devices.len(), 1);
        assert!(rig.devices[0].connected);
        assert_eq!(rig.devices[0].modes[0].format, "YUV_UYVY");
        assert_eq!(rig.devices[0].settings[0].key, SettingKind::Zoom.code());
    }
}
