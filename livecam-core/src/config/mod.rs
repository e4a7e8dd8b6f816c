//! Configuration types for livecam
//!
//! Provides manager options, per-device defaults, shader routing and the
//! startup mode selection.

mod file;

pub use file::{sample_config, ConfigFile};

use serde::{Deserialize, Serialize};

use crate::formats::VideoFrameFormat;
use crate::types::GraphicsApi;

/// Defaults applied to every device the manager creates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDefaults {
    /// Poll connectivity every update
    #[serde(default = "default_true")]
    pub update_hot_swap: bool,

    /// Refresh capture fps and dropped frames every update
    #[serde(default)]
    pub update_frame_rates: bool,

    /// Refresh every setting every update
    #[serde(default)]
    pub update_settings: bool,

    /// Mirror horizontally
    #[serde(default)]
    pub flip_x: bool,

    /// Mirror vertically
    #[serde(default)]
    pub flip_y: bool,

    /// Deinterlace captured frames
    #[serde(default)]
    pub deinterlace: bool,
}

impl Default for DeviceDefaults {
    fn default() -> Self {
        Self {
            update_hot_swap: true,
            update_frame_rates: false,
            update_settings: false,
            flip_x: false,
            flip_y: false,
            deinterlace: false,
        }
    }
}

/// Shader names used to convert each pixel format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderSet {
    /// 32-bit BGRA frames
    #[serde(default = "default_shader_bgra32")]
    pub bgra32: String,
    /// 8-bit greyscale frames
    #[serde(default = "default_shader_mono8")]
    pub mono8: String,
    /// Packed YUY2 frames
    #[serde(default = "default_shader_yuy2")]
    pub yuy2: String,
    /// Packed UYVY frames
    #[serde(default = "default_shader_uyvy")]
    pub uyvy: String,
    /// Packed YVYU frames
    #[serde(default = "default_shader_yvyu")]
    pub yvyu: String,
    /// Packed HDYC (BT.709 UYVY) frames
    #[serde(default = "default_shader_hdyc")]
    pub hdyc: String,
    /// Planar I420 frames
    #[serde(default = "default_shader_i420")]
    pub i420: String,
    /// Planar YV12 frames
    #[serde(default = "default_shader_yv12")]
    pub yv12: String,
    /// Deinterlace pass
    #[serde(default = "default_shader_deinterlace")]
    pub deinterlace: String,
}

fn default_true() -> bool {
    true
}

fn default_shader_bgra32() -> String {
    "LiveCamera/CompositeBGRA".to_string()
}

fn default_shader_mono8() -> String {
    "LiveCamera/CompositeMono8".to_string()
}

fn default_shader_yuy2() -> String {
    "LiveCamera/CompositeYUY2".to_string()
}

fn default_shader_uyvy() -> String {
    "LiveCamera/CompositeUYVY".to_string()
}

fn default_shader_yvyu() -> String {
    "LiveCamera/CompositeYVYU".to_string()
}

fn default_shader_hdyc() -> String {
    "LiveCamera/CompositeHDYC".to_string()
}

fn default_shader_i420() -> String {
    "LiveCamera/CompositeI420".to_string()
}

fn default_shader_yv12() -> String {
    "LiveCamera/CompositeYV12".to_string()
}

fn default_shader_deinterlace() -> String {
    "LiveCamera/Deinterlace".to_string()
}

impl Default for ShaderSet {
    fn default() -> Self {
        Self {
            bgra32: default_shader_bgra32(),
            mono8: default_shader_mono8(),
            yuy2: default_shader_yuy2(),
            uyvy: default_shader_uyvy(),
            yvyu: default_shader_yvyu(),
            hdyc: default_shader_hdyc(),
            i420: default_shader_i420(),
            yv12: default_shader_yv12(),
            deinterlace: default_shader_deinterlace(),
        }
    }
}

impl ShaderSet {
    /// Shader that converts the given format, if any
    pub fn for_format(&self, format: VideoFrameFormat) -> Option<&str> {
        let shader = match format {
            VideoFrameFormat::Yuy2 => &self.yuy2,
            VideoFrameFormat::Uyvy => &self.uyvy,
            VideoFrameFormat::Yvyu => &self.yvyu,
            VideoFrameFormat::Hdyc => &self.hdyc,
            VideoFrameFormat::Bgra32 => &self.bgra32,
            VideoFrameFormat::Mono8 => &self.mono8,
            VideoFrameFormat::I420 => &self.i420,
            VideoFrameFormat::Yv12 => &self.yv12,
            VideoFrameFormat::Unknown => return None,
        };
        Some(shader.as_str())
    }
}

/// Which device and mode to start with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// Device name (first match); `None` picks the first device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,

    /// Requested width (0 = backend default mode)
    #[serde(default = "default_width")]
    pub width: i32,

    /// Requested height (0 = backend default mode)
    #[serde(default = "default_height")]
    pub height: i32,

    /// Only consider modes with the requested aspect ratio
    #[serde(default)]
    pub maintain_aspect_ratio: bool,

    /// Video input to route (`None` = backend default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_input: Option<usize>,
}

fn default_width() -> i32 {
    1280
}

fn default_height() -> i32 {
    720
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            device: None,
            width: default_width(),
            height: default_height(),
            maintain_aspect_ratio: false,
            video_input: None,
        }
    }
}

/// Runtime configuration for a [`Manager`](crate::manager::Manager)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ManagerConfig {
    /// Poll the backend for newly attached devices
    pub support_hot_swapping: bool,
    /// Ask the backend to convert formats internally
    pub internal_format_conversion: bool,
    /// The host can take native texture updates once per rendered frame
    pub native_texture_updates: bool,
    /// Graphics API the host renders with
    pub graphics_api: GraphicsApi,
    /// Applied to every new device
    pub device_defaults: DeviceDefaults,
    /// Per-format conversion shaders
    pub shaders: ShaderSet,
}

impl ManagerConfig {
    /// Enable or disable hot-swap discovery
    pub fn with_hot_swapping(mut self, enabled: bool) -> Self {
        self.support_hot_swapping = enabled;
        self
    }

    /// Request backend-internal format conversion
    pub fn with_internal_format_conversion(mut self, enabled: bool) -> Self {
        self.internal_format_conversion = enabled;
        self
    }

    /// Declare native texture update support
    pub fn with_native_texture_updates(mut self, enabled: bool) -> Self {
        self.native_texture_updates = enabled;
        self
    }

    /// Set the graphics API
    pub fn with_graphics_api(mut self, api: GraphicsApi) -> Self {
        self.graphics_api = api;
        self
    }

    /// Set device defaults
    pub fn with_device_defaults(mut self, defaults: DeviceDefaults) -> Self {
        self.device_defaults = defaults;
        self
    }

    /// Set conversion shaders
    pub fn with_shaders(mut self, shaders: ShaderSet) -> Self {
        self.shaders = shaders;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_routing() {
        let shaders = ShaderSet::default();
        assert_eq!(
            shaders.for_format(VideoFrameFormat::Yuy2),
            Some("LiveCamera/CompositeYUY2")
        );
        assert_eq!(
            shaders.for_format(VideoFrameFormat::Hdyc),
            Some("LiveCamera/CompositeHDYC")
        );
        assert_eq!(shaders.for_format(VideoFrameFormat::Unknown), None);
    }

    #[test]
    fn test_every_supported_format_has_a_shader() {
        let shaders = ShaderSet::default();
        for format in VideoFrameFormat::SUPPORTED {
            assert!(shaders.for_format(format).is_some(), "{:?}", format);
        }
    }

    #[test]
    fn test_manager_config_builder() {
        let config = ManagerConfig::default()
            .with_hot_swapping(true)
            .with_native_texture_updates(true)
            .with_graphics_api(GraphicsApi::Direct3D11);
        assert!(config.support_hot_swapping);
        assert!(config.native_texture_updates);
        assert!(!config.internal_format_conversion);
        assert_eq!(config.graphics_api, GraphicsApi::Direct3D11);
    }
}
