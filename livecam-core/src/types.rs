//! Core types for livecam
//!
//! Value types shared between the capture backend, devices and the manager.

use serde::{Deserialize, Serialize};

use crate::formats::VideoFrameFormat;

/// Largest frame width or height a session may negotiate
pub const MAX_FRAME_DIMENSION: i32 = 4096;

/// Opaque handle to a renderable texture owned by a format converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(u64);

impl TextureHandle {
    /// Wrap a raw handle value
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for TextureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Texture({})", self.0)
    }
}

/// Format negotiated by the backend for a running capture session
///
/// Dimensions are signed because they come straight from the backend and are
/// validated by the device before use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionFormat {
    /// Frame width in pixels
    pub width: i32,
    /// Frame height in pixels
    pub height: i32,
    /// Frame layout
    pub format: VideoFrameFormat,
    /// Nominal frame rate
    pub frame_rate: f32,
    /// Frame duration in 100-ns units
    pub frame_duration_hns: i64,
    /// Whether rows are delivered top row first
    pub top_down: bool,
}

impl SessionFormat {
    /// Whether both dimensions are within [1, MAX_FRAME_DIMENSION]
    pub fn has_valid_dimensions(&self) -> bool {
        (1..=MAX_FRAME_DIMENSION).contains(&self.width)
            && (1..=MAX_FRAME_DIMENSION).contains(&self.height)
    }
}

/// Capture-side statistics reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CaptureStats {
    /// Frames per second arriving from the device
    pub capture_fps: f32,
    /// Frames dropped by the capture pipeline
    pub frames_dropped: f32,
}

/// Graphics API the host renders with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GraphicsApi {
    /// Direct3D 9
    Direct3D9,
    /// Direct3D 11
    Direct3D11,
    /// OpenGL
    #[serde(rename = "opengl")]
    OpenGl,
    /// Unknown or not reported
    #[default]
    Unknown,
}

impl std::fmt::Display for GraphicsApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct3D9 => write!(f, "Direct3D 9"),
            Self::Direct3D11 => write!(f, "Direct3D 11"),
            Self::OpenGl => write!(f, "OpenGL"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for GraphicsApi {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "d3d9" | "direct3d9" | "dx9" => Ok(Self::Direct3D9),
            "d3d11" | "direct3d11" | "dx11" => Ok(Self::Direct3D11),
            "gl" | "opengl" => Ok(Self::OpenGl),
            "unknown" | "" => Ok(Self::Unknown),
            _ => Err(format!("Unknown graphics API: {}", s)),
        }
    }
}

/// How converted frames reach the host's textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConversionMethod {
    /// Not determined yet (manager not initialised)
    #[default]
    Unknown,
    /// Backend writes into native textures; needs one update trigger per rendered frame
    NativeTexture,
    /// Frames are copied through the host's scripting layer
    Script,
}

impl ConversionMethod {
    /// Pick the conversion method and whether red/blue must be swapped
    pub fn determine(native_texture_updates: bool, api: GraphicsApi) -> (Self, bool) {
        if native_texture_updates {
            (Self::NativeTexture, api == GraphicsApi::Direct3D11)
        } else {
            (Self::Script, true)
        }
    }
}

impl std::fmt::Display for ConversionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::NativeTexture => write!(f, "native texture"),
            Self::Script => write!(f, "script"),
        }
    }
}

/// Serializable snapshot of a device for listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSummary {
    /// Backend device index
    pub index: usize,
    /// Human-readable name
    pub name: String,
    /// Stable identifier
    pub guid: String,
    /// Number of supported modes
    pub modes: usize,
    /// Number of exposed settings
    pub settings: usize,
    /// Video input names
    pub video_inputs: Vec<String>,
    /// Whether the device is currently connected
    pub connected: bool,
    /// Whether a capture session is running
    pub running: bool,
}

impl std::fmt::Display for DeviceSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} {} [{}] ({} modes, {} settings)",
            self.index, self.name, self.guid, self.modes, self.settings
        )?;
        if !self.connected {
            write!(f, " disconnected")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(width: i32, height: i32) -> SessionFormat {
        SessionFormat {
            width,
            height,
            format: VideoFrameFormat::Yuy2,
            frame_rate: 30.0,
            frame_duration_hns: 333_333,
            top_down: false,
        }
    }

    #[test]
    fn test_session_dimension_bounds() {
        assert!(session(1, 1).has_valid_dimensions());
        assert!(session(4096, 4096).has_valid_dimensions());
        assert!(!session(0, 480).has_valid_dimensions());
        assert!(!session(640, -1).has_valid_dimensions());
        assert!(!session(4097, 480).has_valid_dimensions());
    }

    #[test]
    fn test_conversion_method_native() {
        assert_eq!(
            ConversionMethod::determine(true, GraphicsApi::Direct3D11),
            (ConversionMethod::NativeTexture, true)
        );
        assert_eq!(
            ConversionMethod::determine(true, GraphicsApi::OpenGl),
            (ConversionMethod::NativeTexture, false)
        );
    }

    #[test]
    fn test_conversion_method_script_always_swaps() {
        for api in [GraphicsApi::Direct3D9, GraphicsApi::OpenGl, GraphicsApi::Unknown] {
            assert_eq!(
                ConversionMethod::determine(false, api),
                (ConversionMethod::Script, true)
            );
        }
    }

    #[test]
    fn test_graphics_api_from_str() {
        assert_eq!("d3d11".parse::<GraphicsApi>().ok(), Some(GraphicsApi::Direct3D11));
        assert_eq!("OpenGL".parse::<GraphicsApi>().ok(), Some(GraphicsApi::OpenGl));
        assert!("metal".parse::<GraphicsApi>().is_err());
    }
}
