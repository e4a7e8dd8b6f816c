//! Error types for livecam

use thiserror::Error;

/// Result type alias using LiveCamError
pub type Result<T> = std::result::Result<T, LiveCamError>;

/// Main error type for livecam operations
#[derive(Debug, Error)]
pub enum LiveCamError {
    /// Capture backend reported a failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// The native capture library could not be loaded
    #[error("Capture library not found: {0}")]
    LibraryNotFound(String),

    /// Backend initialisation failed
    #[error("Initialisation failed: {0}")]
    InitFailed(String),

    /// Manager used before `init()` or after `deinit()`
    #[error("Manager is not initialised")]
    NotInitialised,

    /// Device not found
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Mode not found
    #[error("Mode not found: {0}")]
    ModeNotFound(String),

    /// Backend refused to start capture
    #[error("Device #{0} refused to start capture")]
    StartRejected(usize),

    /// Negotiated frame size outside the supported range
    #[error("Invalid frame dimensions {width}x{height}")]
    InvalidDimensions {
        /// Reported width
        width: i32,
        /// Reported height
        height: i32,
    },

    /// Format converter could not be built for the negotiated format
    #[error("Unable to convert camera format: {0}")]
    ConverterBuild(String),

    /// Setting lookup or update failure
    #[error("Setting error: {0}")]
    Setting(String),

    /// Boolean operation on a float setting or vice versa
    #[error("Setting #{index} is not a {expected} setting")]
    SettingTypeMismatch {
        /// Setting index on the device
        index: usize,
        /// Expected data type
        expected: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<LiveCamError>,
    },
}

impl LiveCamError {
    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }

    /// Create an init error
    pub fn init(msg: impl Into<String>) -> Self {
        Self::InitFailed(msg.into())
    }

    /// Create a converter build error
    pub fn converter(msg: impl Into<String>) -> Self {
        Self::ConverterBuild(msg.into())
    }

    /// Create a setting error
    pub fn setting(msg: impl Into<String>) -> Self {
        Self::Setting(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Remediation hint for the user, if there is one
    pub fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::WithContext { source, .. } => source.user_hint(),
            Self::LibraryNotFound(_) => Some(
                "The capture plugin could not be found. Make sure the plugin library is \
                 deployed next to the executable or on the library search path.",
            ),
            Self::InitFailed(_) => {
                Some("Check that no other application holds the capture devices exclusively.")
            }
            Self::NotInitialised => Some("Call Manager::init() before using devices."),
            Self::DeviceNotFound(_) => Some("Run 'livecam list' to see connected devices."),
            Self::ModeNotFound(_) => {
                Some("Run 'livecam modes <device>' to see the supported modes.")
            }
            Self::InvalidDimensions { .. } | Self::ConverterBuild(_) => {
                Some("Try a different mode; this format is not supported for display.")
            }
            Self::Config(_) => {
                Some("Check ~/.config/livecam/config.toml or regenerate it with 'livecam config init --force'.")
            }
            _ => None,
        }
    }

    /// Whether the user can fix this without code changes
    pub fn is_user_recoverable(&self) -> bool {
        match self {
            Self::WithContext { source, .. } => source.is_user_recoverable(),
            Self::LibraryNotFound(_)
            | Self::DeviceNotFound(_)
            | Self::ModeNotFound(_)
            | Self::StartRejected(_)
            | Self::InvalidDimensions { .. }
            | Self::ConverterBuild(_)
            | Self::Config(_) => true,
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl From<toml::de::Error> for LiveCamError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse TOML: {}", err))
    }
}

impl From<toml::ser::Error> for LiveCamError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Config(format!("Failed to serialize TOML: {}", err))
    }
}
