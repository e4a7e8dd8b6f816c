//! LiveCam Core Library
//!
//! Live video capture device management for real-time hosts.
//!
//! This library provides:
//! - Device enumeration with hot-plug discovery
//! - Capture mode selection by resolution, aspect ratio and pixel format
//! - Camera controls (brightness, exposure, white balance, ...)
//! - Per-frame conversion and display statistics
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────┐    ┌─────────────────┐
//! │ Capture Backend │───▶│   Device     │───▶│ Format Converter│
//! │ (native plugin) │    │ (session)    │    │ (host texture)  │
//! └─────────────────┘    └──────────────┘    └─────────────────┘
//!          ▲                    ▲
//!          └───── Manager ──────┘
//! ```

pub mod capture;
pub mod config;
pub mod converter;
pub mod device;
pub mod error;
pub mod formats;
pub mod manager;
pub mod mode;
pub mod setting;
pub mod stats;
pub mod types;

pub use capture::{CaptureBackend, SimulatedBackend, SimulatedRig};
pub use config::{ConfigFile, ManagerConfig};
pub use device::Device;
pub use error::{LiveCamError, Result};
pub use formats::VideoFrameFormat;
pub use manager::Manager;
pub use mode::DeviceMode;
pub use setting::{Setting, SettingKind, SettingValue};
pub use types::{ConversionMethod, GraphicsApi};
