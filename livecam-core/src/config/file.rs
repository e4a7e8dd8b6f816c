//! Configuration file loading and saving
//!
//! Loads user configuration from `~/.config/livecam/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::{DeviceDefaults, ManagerConfig, Selection, ShaderSet};
use crate::error::{LiveCamError, Result};
use crate::types::GraphicsApi;

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Manager settings
    #[serde(default)]
    pub manager: ManagerSettings,

    /// Defaults for every device
    #[serde(default)]
    pub device: DeviceDefaults,

    /// Startup device and mode
    #[serde(default)]
    pub selection: Selection,

    /// Conversion shaders
    #[serde(default)]
    pub shaders: ShaderSet,
}

/// Manager settings as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManagerSettings {
    /// Poll for newly attached devices
    #[serde(default = "default_true")]
    pub hot_swap: bool,

    /// Ask the backend to convert formats internally
    #[serde(default)]
    pub internal_format_conversion: bool,

    /// Host accepts native texture updates
    #[serde(default = "default_true")]
    pub native_texture_updates: bool,

    /// Graphics API (d3d9, d3d11, opengl, unknown)
    #[serde(default = "default_graphics_api")]
    pub graphics_api: String,
}

fn default_true() -> bool {
    true
}

fn default_graphics_api() -> String {
    "opengl".to_string()
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            hot_swap: true,
            internal_format_conversion: false,
            native_texture_updates: true,
            graphics_api: default_graphics_api(),
        }
    }
}

impl ConfigFile {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("livecam").join("config.toml")
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("livecam")
                .join("config.toml")
        } else {
            PathBuf::from("/etc/livecam/config.toml")
        }
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            debug!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .map_err(|e| LiveCamError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ConfigFile = toml::from_str(&content)
            .map_err(|e| LiveCamError::Config(format!("Failed to parse config file: {}", e)))?;

        info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load configuration, logging warnings but returning defaults on error
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::default_path())
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    LiveCamError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| LiveCamError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&path, content)
            .map_err(|e| LiveCamError::Config(format!("Failed to write config file: {}", e)))?;

        info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Typed manager configuration
    pub fn manager_config(&self) -> Result<ManagerConfig> {
        let graphics_api: GraphicsApi = self
            .manager
            .graphics_api
            .parse()
            .map_err(LiveCamError::Config)?;

        Ok(ManagerConfig {
            support_hot_swapping: self.manager.hot_swap,
            internal_format_conversion: self.manager.internal_format_conversion,
            native_texture_updates: self.manager.native_texture_updates,
            graphics_api,
            device_defaults: self.device.clone(),
            shaders: self.shaders.clone(),
        })
    }
}

/// Generate a sample configuration file
pub fn sample_config() -> String {
    r#"# livecam configuration

[manager]
# Poll for cameras plugged in while running
hot_swap = true

# Ask the capture backend to convert pixel formats itself
internal_format_conversion = false

# The host accepts native texture updates once per rendered frame
native_texture_updates = true

# Graphics API: d3d9, d3d11, opengl, unknown
# Decides whether red and blue are swapped during conversion
graphics_api = "opengl"

[device]
# Detect disconnects and restart capture on reconnect
update_hot_swap = true

# Refresh capture fps and dropped frame counts every update
update_frame_rates = true

# Re-read camera controls every update
update_settings = false

flip_x = false
flip_y = false
deinterlace = false

[selection]
# Device name to open (omit to use the first device)
# device = "Integrated Webcam"

# Requested resolution; the closest supported mode is used
width = 1280
height = 720

# Only consider modes with the same aspect ratio
maintain_aspect_ratio = false

# Video input on capture cards (omit for the default input)
# video_input = 0

[shaders]
bgra32 = "LiveCamera/CompositeBGRA"
mono8 = "LiveCamera/CompositeMono8"
yuy2 = "LiveCamera/CompositeYUY2"
uyvy = "LiveCamera/CompositeUYVY"
yvyu = "LiveCamera/CompositeYVYU"
hdyc = "LiveCamera/CompositeHDYC"
i420 = "LiveCamera/CompositeI420"
yv12 = "LiveCamera/CompositeYV12"
deinterlace = "LiveCamera/Deinterlace"
"#
    .to_string()
}
