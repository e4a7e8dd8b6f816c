//! Capture device lifecycle
//!
//! A [`Device`] owns the modes, settings and video inputs of one capture
//! source and drives its session:
//!
//! ```text
//! Closed ──start()──▶ Started ──play()──▶ Playing ◀──▶ Paused
//!    ▲                                        │           │
//!    └──────────────── close() ───────────────┴───────────┘
//! ```
//!
//! Connection changes are polled from [`Device::update`]. A disconnect pauses
//! the session; a reconnect restarts it with the mode and input it was last
//! started with.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::capture::CaptureBackend;
use crate::config::DeviceDefaults;
use crate::converter::{ConverterParams, FormatConverter};
use crate::error::{LiveCamError, Result};
use crate::formats::VideoFrameFormat;
use crate::mode::{self, DeviceMode};
use crate::setting::{Setting, SettingKind};
use crate::stats::DisplayFps;
use crate::types::{CaptureStats, DeviceSummary, TextureHandle};

/// Physical presence of a device as last polled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Device is plugged in
    Connected,
    /// Device was unplugged
    Disconnected,
}

impl ConnectionState {
    fn from_connected(connected: bool) -> Self {
        if connected {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

/// Per-session negotiated format; zeroed while closed
#[derive(Debug, Clone, Default, PartialEq)]
struct SessionState {
    width: u32,
    height: u32,
    format: Option<VideoFrameFormat>,
    frame_rate: f32,
    frame_duration_hns: i64,
    top_down: bool,
}

/// One capture source
pub struct Device {
    backend: Arc<dyn CaptureBackend>,
    index: usize,
    name: String,
    guid: String,

    modes: Vec<DeviceMode>,
    settings: Vec<Setting>,
    settings_by_key: HashMap<i32, usize>,
    video_inputs: Vec<String>,
    converter: Option<Box<dyn FormatConverter>>,

    session: SessionState,
    last_mode: Option<usize>,
    last_video_input: Option<usize>,

    running: bool,
    paused: bool,
    picture: bool,
    active: bool,
    connection: ConnectionState,

    flip_x: bool,
    flip_y: bool,
    deinterlace: bool,

    /// Poll connectivity every update
    pub update_hot_swap: bool,
    /// Refresh capture fps and dropped frames every update
    pub update_frame_rates: bool,
    /// Refresh every setting every update
    pub update_settings: bool,

    display_fps: DisplayFps,
    capture_stats: CaptureStats,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("index", &self.index)
            .field("name", &self.name)
            .field("guid", &self.guid)
            .field("modes", &self.modes.len())
            .field("settings", &self.settings.len())
            .field("running", &self.running)
            .field("paused", &self.paused)
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

impl Device {
    /// Create a device and enumerate its modes, video inputs and settings.
    ///
    /// Entries the backend cannot describe are skipped.
    pub fn new(
        backend: Arc<dyn CaptureBackend>,
        index: usize,
        name: impl Into<String>,
        guid: impl Into<String>,
        defaults: &DeviceDefaults,
    ) -> Self {
        let converter = backend.create_converter(index);
        let mut device = Self {
            backend,
            index,
            name: name.into(),
            guid: guid.into(),
            modes: Vec::new(),
            settings: Vec::new(),
            settings_by_key: HashMap::new(),
            video_inputs: Vec::new(),
            converter: Some(converter),
            session: SessionState::default(),
            last_mode: None,
            last_video_input: None,
            running: false,
            paused: true,
            picture: false,
            active: false,
            connection: ConnectionState::Connected,
            flip_x: defaults.flip_x,
            flip_y: defaults.flip_y,
            deinterlace: defaults.deinterlace,
            update_hot_swap: defaults.update_hot_swap,
            update_frame_rates: defaults.update_frame_rates,
            update_settings: defaults.update_settings,
            display_fps: DisplayFps::new(),
            capture_stats: CaptureStats::default(),
        };
        device.enumerate_modes();
        device.enumerate_video_inputs();
        device.enumerate_settings();
        debug!(
            "Device #{} '{}': {} modes, {} inputs, {} settings",
            device.index,
            device.name,
            device.modes.len(),
            device.video_inputs.len(),
            device.settings.len()
        );
        device
    }

    fn enumerate_modes(&mut self) {
        let count = self.backend.mode_count(self.index);
        self.modes.reserve(count);
        for i in 0..count {
            match self.backend.mode_info(self.index, i) {
                Some(info) => self.modes.push(DeviceMode::new(self.index, i, info)),
                None => debug!("Device #{}: skipping undescribed mode {}", self.index, i),
            }
        }
    }

    fn enumerate_video_inputs(&mut self) {
        let count = self.backend.video_input_count(self.index);
        for i in 0..count {
            match self.backend.video_input_name(self.index, i) {
                Some(name) => self.video_inputs.push(name),
                None => debug!("Device #{}: skipping unnamed video input {}", self.index, i),
            }
        }
    }

    fn enumerate_settings(&mut self) {
        let count = self.backend.setting_count(self.index);
        for i in 0..count {
            let Some(setting) = Setting::enumerate(self.backend.as_ref(), self.index, i) else {
                debug!("Device #{}: skipping undescribed setting {}", self.index, i);
                continue;
            };
            if self.settings_by_key.contains_key(&setting.type_key()) {
                debug!(
                    "Device #{}: skipping setting '{}' with duplicate key {}",
                    self.index,
                    setting.name(),
                    setting.type_key()
                );
                continue;
            }
            self.settings_by_key
                .insert(setting.type_key(), self.settings.len());
            self.settings.push(setting);
        }
    }

    // ---- identity ----

    /// Backend device index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Human-readable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable identifier
    pub fn guid(&self) -> &str {
        &self.guid
    }

    // ---- lifecycle ----

    /// Start capturing in a mode and on a video input (`None` = backend default).
    ///
    /// On any failure the device is fully closed before the error is returned.
    pub fn start(&mut self, mode: Option<usize>, video_input: Option<usize>) -> Result<()> {
        if !self.backend.start(self.index, mode, video_input) {
            warn!("Device #{} '{}': unable to start camera", self.index, self.name);
            self.close();
            return Err(LiveCamError::StartRejected(self.index));
        }

        let format = self.backend.session_format(self.index);
        if !format.has_valid_dimensions() {
            warn!(
                "Device #{} '{}': invalid width or height {}x{}",
                self.index, self.name, format.width, format.height
            );
            self.close();
            return Err(LiveCamError::InvalidDimensions {
                width: format.width,
                height: format.height,
            });
        }

        let params = ConverterParams {
            width: format.width as u32,
            height: format.height as u32,
            format: format.format,
            flip_x: self.flip_x,
            flip_y: format.top_down != self.flip_y,
            deinterlace: self.deinterlace,
        };
        let built = self
            .converter
            .as_mut()
            .map(|converter| converter.build(params))
            .unwrap_or(false);
        if !built {
            warn!(
                "Device #{} '{}': unable to convert camera format {}",
                self.index, self.name, format.format
            );
            self.close();
            return Err(LiveCamError::converter(format.format.name()));
        }

        self.session = SessionState {
            width: params.width,
            height: params.height,
            format: Some(format.format),
            frame_rate: format.frame_rate,
            frame_duration_hns: format.frame_duration_hns,
            top_down: format.top_down,
        };
        self.set_active(true);
        self.running = true;
        self.picture = false;
        self.paused = true;
        self.last_mode = mode;
        self.last_video_input = video_input;
        info!(
            "Device #{} '{}' started: {}x{} {} @ {:.2}fps",
            self.index, self.name, params.width, params.height, format.format, format.frame_rate
        );

        self.play();
        Ok(())
    }

    /// Start capturing in the given mode
    pub fn start_with_mode(&mut self, mode: &DeviceMode, video_input: Option<usize>) -> Result<()> {
        if mode.device_index() != self.index {
            return Err(LiveCamError::ModeNotFound(format!(
                "mode #{} belongs to device #{}",
                mode.index(),
                mode.device_index()
            )));
        }
        self.start(Some(mode.index()), video_input)
    }

    /// Resume frame delivery. No-op unless running and paused.
    pub fn play(&mut self) {
        if !(self.running && self.paused) {
            return;
        }
        if self.backend.play(self.index) {
            self.display_fps.reset();
            self.paused = false;
        } else {
            warn!("Device #{} '{}': failed to play camera", self.index, self.name);
        }
    }

    /// Suspend frame delivery. No-op unless running and playing.
    pub fn pause(&mut self) {
        if self.running && !self.paused {
            self.backend.pause(self.index);
            self.paused = true;
        }
    }

    /// Stop capturing and forget the session
    pub fn close(&mut self) {
        self.display_fps.reset();
        self.session = SessionState::default();
        self.last_mode = None;
        self.last_video_input = None;
        self.capture_stats = CaptureStats::default();
        self.running = false;
        self.paused = true;
        self.backend.stop(self.index);
    }

    /// Release the format converter
    pub fn dispose(&mut self) {
        self.converter = None;
    }

    /// Per-frame tick
    pub fn update(&mut self, force: bool) {
        self.update_at(force, Instant::now());
    }

    /// Per-frame tick with an explicit clock reading
    pub fn update_at(&mut self, force: bool, now: Instant) {
        if self.update_hot_swap {
            self.update_hot_swap_state();
        }

        if !self.running {
            return;
        }

        let ready = self.backend.capabilities().frames_always_ready
            || (!force && self.backend.is_frame_ready(self.index));
        if ready || force {
            let changed = self
                .converter
                .as_mut()
                .is_some_and(|converter| converter.update());
            if changed {
                self.display_fps.record_frame(now);
            }
        }

        if self.update_frame_rates {
            self.capture_stats = self.backend.capture_stats(self.index);
        }

        if self.update_settings {
            self.refresh_settings();
        }
    }

    fn update_hot_swap_state(&mut self) {
        let state = ConnectionState::from_connected(self.backend.is_connected(self.index));
        if state == self.connection {
            return;
        }

        match state {
            ConnectionState::Disconnected => {
                info!("Device #{} '{}' disconnected", self.index, self.name);
                self.pause();
            }
            ConnectionState::Connected => {
                info!("Device #{} '{}' reconnected", self.index, self.name);
                if self.running {
                    let (mode, input) = (self.last_mode, self.last_video_input);
                    if let Err(e) = self.start(mode, input) {
                        warn!(
                            "Device #{} '{}': restart after reconnect failed: {}",
                            self.index, self.name, e
                        );
                    }
                }
            }
        }
        self.connection = state;
    }

    // ---- state ----

    /// Whether a capture session is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether frame delivery is suspended
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the device shows a still picture instead of live video
    pub fn is_picture(&self) -> bool {
        self.picture
    }

    /// Whether the device was last seen connected
    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Connection state as last polled
    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// Whether the device takes part in native texture updates
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Include or exclude the device from native texture updates
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
        self.backend.set_active(self.index, active);
    }

    /// Mode the running session was started with
    pub fn last_mode(&self) -> Option<usize> {
        self.last_mode
    }

    /// Video input the running session was started with
    pub fn last_video_input(&self) -> Option<usize> {
        self.last_video_input
    }

    /// Negotiated width; 0 while closed
    pub fn current_width(&self) -> u32 {
        self.session.width
    }

    /// Negotiated height; 0 while closed
    pub fn current_height(&self) -> u32 {
        self.session.height
    }

    /// Negotiated pixel format name; empty while closed
    pub fn current_format(&self) -> &str {
        self.session.format.map(|f| f.name()).unwrap_or("")
    }

    /// Negotiated pixel format
    pub fn current_frame_format(&self) -> Option<VideoFrameFormat> {
        self.session.format
    }

    /// Negotiated frame rate; 0 while closed
    pub fn current_frame_rate(&self) -> f32 {
        self.session.frame_rate
    }

    /// Negotiated frame duration in 100-ns units; 0 while closed
    pub fn current_frame_duration_hns(&self) -> i64 {
        self.session.frame_duration_hns
    }

    /// Converted output, once the converter holds a picture
    pub fn output_texture(&self) -> Option<TextureHandle> {
        self.converter
            .as_ref()
            .filter(|converter| converter.has_valid_picture())
            .and_then(|converter| converter.output_texture())
    }

    // ---- statistics ----

    /// Frames per second arriving from the device
    pub fn capture_fps(&self) -> f32 {
        self.capture_stats.capture_fps
    }

    /// Frames dropped by the capture pipeline
    pub fn capture_frames_dropped(&self) -> f32 {
        self.capture_stats.frames_dropped
    }

    /// Frames per second shown to the host
    pub fn display_fps(&self) -> f32 {
        self.display_fps.fps()
    }

    /// Frames shown since playback last started
    pub fn frames_total(&self) -> u64 {
        self.display_fps.frames_total()
    }

    // ---- presentation ----

    /// Horizontal mirroring
    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    /// Mirror horizontally; applies to the live converter immediately
    pub fn set_flip_x(&mut self, flip: bool) {
        self.flip_x = flip;
        if let Some(converter) = self.converter.as_mut() {
            converter.set_flip_x(flip);
        }
    }

    /// Vertical mirroring
    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    /// Mirror vertically; applies to the live converter immediately
    pub fn set_flip_y(&mut self, flip: bool) {
        self.flip_y = flip;
        let effective = self.session.top_down != flip;
        if let Some(converter) = self.converter.as_mut() {
            converter.set_flip_y(effective);
        }
    }

    /// Deinterlacing
    pub fn deinterlace(&self) -> bool {
        self.deinterlace
    }

    /// Enable deinterlacing; takes effect at the next start
    pub fn set_deinterlace(&mut self, deinterlace: bool) {
        self.deinterlace = deinterlace;
    }

    /// Whether the device has a vendor configuration dialog
    pub fn can_show_config_window(&self) -> bool {
        self.backend.has_config_window(self.index)
    }

    /// Open the vendor configuration dialog
    pub fn show_config_window(&self) -> bool {
        self.backend.show_config_window(self.index)
    }

    // ---- modes ----

    /// All modes in enumeration order
    pub fn modes(&self) -> &[DeviceMode] {
        &self.modes
    }

    /// Number of modes
    pub fn num_modes(&self) -> usize {
        self.modes.len()
    }

    /// Mode by position
    pub fn mode(&self, index: usize) -> Option<&DeviceMode> {
        self.modes.get(index)
    }

    /// Mode closest to the requested size; see [`mode::closest_mode`]
    pub fn closest_mode(
        &self,
        width: i32,
        height: i32,
        maintain_aspect_ratio: bool,
    ) -> Option<&DeviceMode> {
        mode::closest_mode(&self.modes, width, height, maintain_aspect_ratio)
    }

    // ---- video inputs ----

    /// Video input names
    pub fn video_inputs(&self) -> &[String] {
        &self.video_inputs
    }

    /// Number of video inputs
    pub fn num_video_inputs(&self) -> usize {
        self.video_inputs.len()
    }

    /// Video input name; empty if out of range
    pub fn video_input_name(&self, index: usize) -> &str {
        self.video_inputs.get(index).map(String::as_str).unwrap_or("")
    }

    /// Route a video input
    pub fn set_video_input(&self, index: usize) {
        self.backend.set_video_input(self.index, index);
    }

    // ---- settings ----

    /// All settings in enumeration order
    pub fn settings(&self) -> &[Setting] {
        &self.settings
    }

    /// Number of settings
    pub fn num_settings(&self) -> usize {
        self.settings.len()
    }

    /// Setting by position
    pub fn setting(&self, index: usize) -> Option<&Setting> {
        self.settings.get(index)
    }

    /// Setting by kind
    pub fn setting_by_kind(&self, kind: SettingKind) -> Option<&Setting> {
        self.setting_by_key(kind.code())
    }

    /// Setting by raw type key
    pub fn setting_by_key(&self, key: i32) -> Option<&Setting> {
        self.settings_by_key
            .get(&key)
            .and_then(|&i| self.settings.get(i))
    }

    /// Position of a setting kind
    pub fn setting_index(&self, kind: SettingKind) -> Option<usize> {
        self.settings_by_key.get(&kind.code()).copied()
    }

    /// Re-read every setting from the backend
    pub fn refresh_settings(&mut self) {
        for setting in &mut self.settings {
            setting.refresh(self.backend.as_ref());
        }
    }

    fn setting_mut(&mut self, index: usize) -> Result<&mut Setting> {
        let device = self.index;
        self.settings
            .get_mut(index)
            .ok_or_else(|| LiveCamError::setting(format!("device #{} has no setting #{}", device, index)))
    }

    /// Write a boolean setting
    pub fn set_setting_bool(&mut self, index: usize, value: bool) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        self.setting_mut(index)?.set_bool(backend.as_ref(), value)
    }

    /// Write a float setting, clamped to its range. Returns the written value.
    pub fn set_setting_float(&mut self, index: usize, value: f32) -> Result<f32> {
        let backend = Arc::clone(&self.backend);
        self.setting_mut(index)?.set_float(backend.as_ref(), value)
    }

    /// Switch a setting's automatic mode
    pub fn set_setting_automatic(&mut self, index: usize, automatic: bool) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        self.setting_mut(index)?
            .set_automatic(backend.as_ref(), automatic)
    }

    /// Restore a setting's factory default
    pub fn reset_setting(&mut self, index: usize) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        self.setting_mut(index)?.reset_to_default(backend.as_ref())
    }

    /// Snapshot for listings
    pub fn summary(&self) -> DeviceSummary {
        DeviceSummary {
            index: self.index,
            name: self.name.clone(),
            guid: self.guid.clone(),
            modes: self.modes.len(),
            settings: self.settings.len(),
            video_inputs: self.video_inputs.clone(),
            connected: self.is_connected(),
            running: self.running,
        }
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        self.dispose();
    }
}
