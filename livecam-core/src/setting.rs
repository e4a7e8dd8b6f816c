//! Camera control settings
//!
//! A [`Setting`] caches the backend state of one control (brightness, zoom,
//! ...). Boolean and float controls share one type, with the data-specific
//! part carried by [`SettingValue`].

use serde::{Deserialize, Serialize};

use crate::capture::{
    BoolSettingState, CaptureBackend, FloatSettingState, SettingDataType, SettingInfo,
};
use crate::error::{LiveCamError, Result};

/// Well-known setting type keys
///
/// Keys are grouped: video proc-amp controls from 0, camera controls from
/// 1000, vendor extensions from 2000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum SettingKind {
    Brightness = 0,
    Contrast = 1,
    Hue = 2,
    Saturation = 3,
    Sharpness = 4,
    Gamma = 5,
    ColorEnable = 6,
    WhiteBalance = 7,
    BacklightCompensation = 8,
    Gain = 9,
    DigitalMultiplier = 10,
    DigitalMultiplierLimit = 11,
    WhiteBalanceComponent = 12,
    PowerlineFrequency = 13,

    Pan = 1000,
    Tilt = 1001,
    Roll = 1002,
    Zoom = 1003,
    Exposure = 1004,
    Iris = 1005,
    Focus = 1006,
    ScanMode = 1007,
    Privacy = 1008,
    PanTilt = 1009,
    PanRelative = 1010,
    TiltRelative = 1011,
    RollRelative = 1012,
    ZoomRelative = 1013,
    ExposureRelative = 1014,
    IrisRelative = 1015,
    FocusRelative = 1016,
    PanTiltRelative = 1017,
    FocalLength = 1018,
    AutoExposurePriority = 1019,

    LogitechVersion = 2000,
    LogitechDigitalPan = 2001,
    LogitechDigitalTilt = 2002,
    LogitechDigitalZoom = 2003,
    LogitechDigitalPanTiltZoom = 2004,
    LogitechExposureTime = 2005,
    LogitechFaceTracking = 2006,
    LogitechLed = 2007,
    LogitechFindFace = 2008,
}

impl SettingKind {
    /// Every known kind
    pub const ALL: [SettingKind; 43] = [
        Self::Brightness,
        Self::Contrast,
        Self::Hue,
        Self::Saturation,
        Self::Sharpness,
        Self::Gamma,
        Self::ColorEnable,
        Self::WhiteBalance,
        Self::BacklightCompensation,
        Self::Gain,
        Self::DigitalMultiplier,
        Self::DigitalMultiplierLimit,
        Self::WhiteBalanceComponent,
        Self::PowerlineFrequency,
        Self::Pan,
        Self::Tilt,
        Self::Roll,
        Self::Zoom,
        Self::Exposure,
        Self::Iris,
        Self::Focus,
        Self::ScanMode,
        Self::Privacy,
        Self::PanTilt,
        Self::PanRelative,
        Self::TiltRelative,
        Self::RollRelative,
        Self::ZoomRelative,
        Self::ExposureRelative,
        Self::IrisRelative,
        Self::FocusRelative,
        Self::PanTiltRelative,
        Self::FocalLength,
        Self::AutoExposurePriority,
        Self::LogitechVersion,
        Self::LogitechDigitalPan,
        Self::LogitechDigitalTilt,
        Self::LogitechDigitalZoom,
        Self::LogitechDigitalPanTiltZoom,
        Self::LogitechExposureTime,
        Self::LogitechFaceTracking,
        Self::LogitechLed,
        Self::LogitechFindFace,
    ];

    /// Native type key
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Look up a kind by native type key
    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.code() == code)
    }

    /// Whether this is a vendor extension
    pub fn is_vendor_specific(self) -> bool {
        self.code() >= 2000
    }
}

/// Typed value of a setting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SettingValue {
    /// On/off control
    Boolean {
        /// Current value
        current: bool,
        /// Factory default
        default: bool,
    },
    /// Ranged control
    Float {
        /// Current value
        current: f32,
        /// Factory default
        default: f32,
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },
}

impl SettingValue {
    /// Data type of this value
    pub fn data_type(&self) -> SettingDataType {
        match self {
            Self::Boolean { .. } => SettingDataType::Boolean,
            Self::Float { .. } => SettingDataType::Float,
        }
    }
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean { current, default } => {
                write!(f, "{} (default {})", current, default)
            }
            Self::Float {
                current,
                default,
                min,
                max,
            } => write!(
                f,
                "{:.2} in [{:.2}, {:.2}] (default {:.2})",
                current, min, max, default
            ),
        }
    }
}

/// One camera control on a device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    device: usize,
    index: usize,
    type_key: i32,
    name: String,
    can_automatic: bool,
    automatic: bool,
    value: SettingValue,
}

impl Setting {
    /// Read a setting's description and state from the backend.
    ///
    /// Returns `None` if the backend cannot describe it.
    pub fn enumerate(backend: &dyn CaptureBackend, device: usize, index: usize) -> Option<Self> {
        let info = backend.setting_info(device, index)?;
        let SettingInfo {
            type_key,
            data_type,
            name,
            can_automatic,
        } = info;

        let (value, automatic) = match data_type {
            SettingDataType::Boolean => {
                let state = backend.setting_bool(device, index)?;
                (bool_value(state), state.automatic)
            }
            SettingDataType::Float => {
                let state = backend.setting_float(device, index)?;
                (float_value(state), state.automatic)
            }
        };

        Some(Self {
            device,
            index,
            type_key,
            name,
            can_automatic,
            automatic,
            value,
        })
    }

    /// Index within the owning device
    pub fn index(&self) -> usize {
        self.index
    }

    /// Native type key
    pub fn type_key(&self) -> i32 {
        self.type_key
    }

    /// Known kind, if the type key is recognised
    pub fn kind(&self) -> Option<SettingKind> {
        SettingKind::from_code(self.type_key)
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the device can drive this setting automatically
    pub fn can_automatic(&self) -> bool {
        self.can_automatic
    }

    /// Whether automatic mode is on
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    /// Cached value
    pub fn value(&self) -> &SettingValue {
        &self.value
    }

    /// Data type
    pub fn data_type(&self) -> SettingDataType {
        self.value.data_type()
    }

    /// Current boolean value, if this is a boolean setting
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            SettingValue::Boolean { current, .. } => Some(current),
            SettingValue::Float { .. } => None,
        }
    }

    /// Current float value, if this is a float setting
    pub fn as_float(&self) -> Option<f32> {
        match self.value {
            SettingValue::Float { current, .. } => Some(current),
            SettingValue::Boolean { .. } => None,
        }
    }

    /// Re-read the cached state from the backend.
    ///
    /// The cache is left untouched if the backend cannot report the state.
    pub fn refresh(&mut self, backend: &dyn CaptureBackend) {
        match self.value {
            SettingValue::Boolean { .. } => {
                if let Some(state) = backend.setting_bool(self.device, self.index) {
                    self.value = bool_value(state);
                    self.automatic = state.automatic;
                }
            }
            SettingValue::Float { .. } => {
                if let Some(state) = backend.setting_float(self.device, self.index) {
                    self.value = float_value(state);
                    self.automatic = state.automatic;
                }
            }
        }
    }

    /// Write a boolean value
    pub fn set_bool(&mut self, backend: &dyn CaptureBackend, value: bool) -> Result<()> {
        let SettingValue::Boolean { default, .. } = self.value else {
            return Err(LiveCamError::SettingTypeMismatch {
                index: self.index,
                expected: "boolean",
            });
        };

        if !backend.set_setting_bool(self.device, self.index, value, self.automatic) {
            return Err(LiveCamError::setting(format!(
                "backend rejected value {} for '{}'",
                value, self.name
            )));
        }
        self.value = SettingValue::Boolean {
            current: value,
            default,
        };
        Ok(())
    }

    /// Write a float value, clamped to the setting's range.
    ///
    /// Returns the value actually written.
    pub fn set_float(&mut self, backend: &dyn CaptureBackend, value: f32) -> Result<f32> {
        let SettingValue::Float {
            default, min, max, ..
        } = self.value
        else {
            return Err(LiveCamError::SettingTypeMismatch {
                index: self.index,
                expected: "float",
            });
        };

        if value.is_nan() {
            return Err(LiveCamError::setting(format!("NaN written to '{}'", self.name)));
        }
        let clamped = value.clamp(min.min(max), max.max(min));
        if !backend.set_setting_float(self.device, self.index, clamped, self.automatic) {
            return Err(LiveCamError::setting(format!(
                "backend rejected value {} for '{}'",
                clamped, self.name
            )));
        }
        self.value = SettingValue::Float {
            current: clamped,
            default,
            min,
            max,
        };
        Ok(clamped)
    }

    /// Switch automatic mode on or off
    pub fn set_automatic(&mut self, backend: &dyn CaptureBackend, automatic: bool) -> Result<()> {
        if automatic && !self.can_automatic {
            return Err(LiveCamError::setting(format!(
                "'{}' has no automatic mode",
                self.name
            )));
        }

        let accepted = match self.value {
            SettingValue::Boolean { current, .. } => {
                backend.set_setting_bool(self.device, self.index, current, automatic)
            }
            SettingValue::Float { current, .. } => {
                backend.set_setting_float(self.device, self.index, current, automatic)
            }
        };
        if !accepted {
            return Err(LiveCamError::setting(format!(
                "backend rejected automatic={} for '{}'",
                automatic, self.name
            )));
        }
        self.automatic = automatic;
        Ok(())
    }

    /// Write the factory default back
    pub fn reset_to_default(&mut self, backend: &dyn CaptureBackend) -> Result<()> {
        match self.value {
            SettingValue::Boolean { default, .. } => self.set_bool(backend, default),
            SettingValue::Float { default, .. } => self.set_float(backend, default).map(|_| ()),
        }
    }
}

fn bool_value(state: BoolSettingState) -> SettingValue {
    SettingValue::Boolean {
        current: state.current,
        default: state.default,
    }
}

fn float_value(state: FloatSettingState) -> SettingValue {
    SettingValue::Float {
        current: state.current,
        default: state.default,
        min: state.min,
        max: state.max,
    }
}
