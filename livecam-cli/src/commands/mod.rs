//! CLI command implementations

mod config;
mod info;
mod list;
mod modes;
mod select;
mod settings;
mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use livecam_core::{ConfigFile, Manager, SimulatedBackend, SimulatedRig};
use tracing::debug;

pub use config::{config, ConfigArgs};
pub use info::info;
pub use list::{list, ListArgs};
pub use modes::{modes, ModesArgs};
pub use select::{select, SelectArgs};
pub use settings::{settings, SettingsArgs};
pub use watch::{watch, WatchArgs};

/// Options shared by every command
pub struct Context {
    /// Simulated rig file
    pub rig: Option<PathBuf>,
    /// Configuration file override
    pub config: Option<PathBuf>,
}

impl Context {
    /// Path of the configuration file in use
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(ConfigFile::default_path)
    }

    /// Load the configuration file, falling back to defaults when absent
    pub fn load_config(&self) -> Result<ConfigFile> {
        let path = self.config_path();
        ConfigFile::load_from(path.clone())
            .with_context(|| format!("Failed to load configuration from {}", path.display()))
    }

    /// Build and initialise a manager over the capture backend
    pub fn open_manager(&self) -> Result<(ConfigFile, Manager)> {
        let (config, manager, _) = self.open_simulated()?;
        Ok((config, manager))
    }

    /// Like [`Context::open_manager`], also returning the backend handle so
    /// the caller can feed frames to the simulated devices
    pub fn open_simulated(&self) -> Result<(ConfigFile, Manager, SimulatedBackend)> {
        let config = self.load_config()?;

        let rig = match &self.rig {
            Some(path) => SimulatedRig::load_from(path)
                .with_context(|| format!("Failed to load rig from {}", path.display()))?,
            None => SimulatedRig::default_rig(),
        };
        debug!("Using rig with {} devices", rig.devices.len());

        let backend = SimulatedBackend::new(rig);
        let mut manager = Manager::new(Arc::new(backend.clone()), config.manager_config()?);
        if let Err(e) = manager.init() {
            if let Some(hint) = e.user_hint() {
                eprintln!("Hint: {}", hint);
            }
            return Err(e.into());
        }
        Ok((config, manager, backend))
    }
}

/// Device query from the command line, or the configured default
pub(crate) fn device_query(arg: Option<String>, config: &ConfigFile) -> String {
    arg.or_else(|| config.selection.device.clone())
        .unwrap_or_else(|| "0".to_string())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
