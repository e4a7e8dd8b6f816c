//! Device manager
//!
//! The [`Manager`] owns the capture backend handle and every [`Device`] it
//! enumerated. The host creates one manager, calls [`Manager::init`] once,
//! then drives it from its frame loop with [`Manager::tick`] and
//! [`Manager::render_frame`]. Dropping the manager tears everything down.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::capture::CaptureBackend;
use crate::config::ManagerConfig;
use crate::device::Device;
use crate::error::{LiveCamError, Result};
use crate::formats::VideoFrameFormat;
use crate::types::ConversionMethod;

/// Shader keyword enabled when red and blue must be swapped
pub const SWAP_RED_BLUE_ON: &str = "SWAP_RED_BLUE_ON";
/// Shader keyword enabled when channels are left as delivered
pub const SWAP_RED_BLUE_OFF: &str = "SWAP_RED_BLUE_OFF";

/// Callback fired with the list positions of newly discovered devices
pub type NewDeviceListener = Box<dyn FnMut(&[usize]) + Send>;

/// Owner of the capture backend and all devices
pub struct Manager {
    backend: Arc<dyn CaptureBackend>,
    config: ManagerConfig,
    devices: Vec<Device>,
    initialised: bool,
    enabled: bool,
    /// The backend may hold native resources and needs a deinit
    backend_acquired: bool,
    conversion_method: ConversionMethod,
    swap_red_blue: bool,
    last_render_frame: Option<u64>,
    on_devices_added: Option<NewDeviceListener>,
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("initialised", &self.initialised)
            .field("enabled", &self.enabled)
            .field("conversion_method", &self.conversion_method)
            .field("swap_red_blue", &self.swap_red_blue)
            .field("devices", &self.devices)
            .finish_non_exhaustive()
    }
}

impl Manager {
    /// Create an uninitialised manager
    pub fn new(backend: Arc<dyn CaptureBackend>, config: ManagerConfig) -> Self {
        Self {
            backend,
            config,
            devices: Vec::new(),
            initialised: false,
            enabled: true,
            backend_acquired: false,
            conversion_method: ConversionMethod::Unknown,
            swap_red_blue: false,
            last_render_frame: None,
            on_devices_added: None,
        }
    }

    /// Initialise the backend and enumerate devices. No-op if already initialised.
    ///
    /// On failure the manager disables itself and releases the backend.
    pub fn init(&mut self) -> Result<()> {
        if self.initialised {
            return Ok(());
        }

        self.backend_acquired = true;
        if let Err(e) = self.backend.init(self.config.internal_format_conversion) {
            if let LiveCamError::LibraryNotFound(_) = e {
                error!("Capture library not found: {}", e.user_hint().unwrap_or_default());
            } else {
                error!("Failed to initialise capture backend: {}", e);
            }
            self.enabled = false;
            self.deinit();
            return Err(e);
        }
        info!("Capture backend version {:.2} initialised", self.backend.version());

        let (method, swap) = ConversionMethod::determine(
            self.config.native_texture_updates,
            self.config.graphics_api,
        );
        self.conversion_method = method;
        self.swap_red_blue = swap;
        debug!(
            "Conversion method: {} ({}), enabling {}",
            method,
            self.config.graphics_api,
            self.shader_keyword()
        );

        self.enumerate_devices();
        self.initialised = true;
        self.enabled = true;
        Ok(())
    }

    /// Close every device and release the backend. Safe to call repeatedly.
    pub fn deinit(&mut self) {
        self.clear_devices();
        self.initialised = false;
        self.last_render_frame = None;

        if self.backend_acquired {
            self.backend.deinit();
            self.backend_acquired = false;
            debug!("Capture backend released");
        }
    }

    fn clear_devices(&mut self) {
        for device in &mut self.devices {
            device.close();
            device.dispose();
        }
        self.devices.clear();
    }

    fn enumerate_devices(&mut self) {
        self.clear_devices();

        let count = self.backend.device_count();
        for i in 0..count {
            let Some(name) = self.backend.device_name(i) else {
                debug!("Skipping unnamed device #{}", i);
                continue;
            };
            let Some(guid) = self.backend.device_guid(i) else {
                debug!("Skipping device #{} '{}' without GUID", i, name);
                continue;
            };
            if self.backend.mode_count(i) == 0 {
                debug!("Skipping device #{} '{}' with no modes", i, name);
                continue;
            }
            self.push_device(i, name, guid);
        }
        info!("Found {} capture devices", self.devices.len());
    }

    fn push_device(&mut self, index: usize, name: String, guid: String) -> usize {
        let device = Device::new(
            Arc::clone(&self.backend),
            index,
            name,
            guid,
            &self.config.device_defaults,
        );
        self.devices.push(device);
        self.devices.len() - 1
    }

    /// Hot-swap discovery. Returns the list positions of devices added.
    pub fn update(&mut self) -> Vec<usize> {
        if !self.initialised || !self.enabled || !self.config.support_hot_swapping {
            return Vec::new();
        }
        if self.backend.poll_device_changes() {
            self.add_new_devices()
        } else {
            Vec::new()
        }
    }

    /// Add devices whose GUID is not known yet. Existing entries are never removed.
    ///
    /// Returns the list positions of devices added and notifies the listener.
    pub fn add_new_devices(&mut self) -> Vec<usize> {
        let mut added = Vec::new();

        let count = self.backend.device_count();
        for i in 0..count {
            let Some(guid) = self.backend.device_guid(i) else {
                continue;
            };
            if self.device_by_guid(&guid).is_some() {
                continue;
            }
            let Some(name) = self.backend.device_name(i) else {
                continue;
            };
            if self.backend.mode_count(i) == 0 {
                continue;
            }
            info!("New capture device #{} '{}'", i, name);
            added.push(self.push_device(i, name, guid));
        }

        if !added.is_empty() {
            if let Some(listener) = self.on_devices_added.as_mut() {
                listener(&added);
            }
        }
        added
    }

    /// Register the callback fired when hot-swap discovery adds devices
    pub fn set_new_device_listener(&mut self, listener: impl FnMut(&[usize]) + Send + 'static) {
        self.on_devices_added = Some(Box::new(listener));
    }

    /// Discovery plus one update of every active device
    pub fn tick(&mut self, force: bool) -> Vec<usize> {
        let added = self.update();
        if self.initialised && self.enabled {
            for device in self.devices.iter_mut().filter(|d| d.is_active()) {
                device.update(force);
            }
        }
        added
    }

    /// Trigger native texture updates once per rendered frame
    pub fn render_frame(&mut self, frame_number: u64) {
        if !self.initialised || self.last_render_frame == Some(frame_number) {
            return;
        }
        self.last_render_frame = Some(frame_number);

        if self.conversion_method == ConversionMethod::NativeTexture {
            self.backend.update_all_textures();
        }
    }

    /// Whether `init()` succeeded and `deinit()` has not run since
    pub fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// False after an initialisation failure
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Shared backend handle
    pub fn backend(&self) -> &Arc<dyn CaptureBackend> {
        &self.backend
    }

    /// Runtime configuration
    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    /// How converted frames reach the host
    pub fn conversion_method(&self) -> ConversionMethod {
        self.conversion_method
    }

    /// Whether conversion shaders must swap red and blue
    pub fn swap_red_blue(&self) -> bool {
        self.swap_red_blue
    }

    /// Shader keyword to enable
    pub fn shader_keyword(&self) -> &'static str {
        if self.swap_red_blue {
            SWAP_RED_BLUE_ON
        } else {
            SWAP_RED_BLUE_OFF
        }
    }

    /// Shader keyword to disable
    pub fn disabled_shader_keyword(&self) -> &'static str {
        if self.swap_red_blue {
            SWAP_RED_BLUE_OFF
        } else {
            SWAP_RED_BLUE_ON
        }
    }

    /// Shader converting the given pixel format
    pub fn pixel_conversion_shader(&self, format: VideoFrameFormat) -> Option<&str> {
        let shader = self.config.shaders.for_format(format);
        if shader.is_none() {
            error!("Unknown video format '{}'", format);
        }
        shader
    }

    /// Shader for the deinterlace pass
    pub fn deinterlace_shader(&self) -> &str {
        &self.config.shaders.deinterlace
    }

    // ---- devices ----

    /// All devices in enumeration order
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Number of devices
    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    /// Device by list position
    pub fn device(&self, index: usize) -> Option<&Device> {
        self.devices.get(index)
    }

    /// Device by list position, mutably
    pub fn device_mut(&mut self, index: usize) -> Option<&mut Device> {
        self.devices.get_mut(index)
    }

    /// First device with the given name
    pub fn device_by_name(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name() == name)
    }

    /// First device with the given name, mutably
    pub fn device_by_name_mut(&mut self, name: &str) -> Option<&mut Device> {
        self.devices.iter_mut().find(|d| d.name() == name)
    }

    /// Device with the given GUID
    pub fn device_by_guid(&self, guid: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.guid() == guid)
    }

    /// Resolve a device by list position or name
    pub fn find_device_mut(&mut self, query: &str) -> Result<&mut Device> {
        if !self.initialised {
            return Err(LiveCamError::NotInitialised);
        }
        let position = match query.parse::<usize>() {
            Ok(index) if index < self.devices.len() => Some(index),
            _ => self.devices.iter().position(|d| d.name() == query),
        };
        match position {
            Some(index) => Ok(&mut self.devices[index]),
            None => {
                warn!("No device matches '{}'", query);
                Err(LiveCamError::DeviceNotFound(query.to_string()))
            }
        }
    }
}

impl Drop for Manager {
    fn drop(&mut self) {
        self.deinit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SimulatedBackend;
    use crate::types::GraphicsApi;

    fn manager(config: ManagerConfig) -> (SimulatedBackend, Manager) {
        let backend = SimulatedBackend::default();
        let manager = Manager::new(Arc::new(backend.clone()), config);
        (backend, manager)
    }

    #[test]
    fn test_init_enumerates_devices() {
        let (_, mut manager) = manager(ManagerConfig::default());
        manager.init().unwrap();
        assert!(manager.is_initialised());
        assert_eq!(manager.num_devices(), 2);
        assert_eq!(manager.device(1).map(|d| d.name()), Some("HDMI Capture"));
    }

    #[test]
    fn test_init_is_idempotent() {
        let (backend, mut manager) = manager(ManagerConfig::default());
        manager.init().unwrap();
        manager.device_mut(0).unwrap().start(None, None).unwrap();
        manager.init().unwrap();
        assert!(manager.device(0).unwrap().is_running());
        assert!(backend.is_capturing(0));
    }

    #[test]
    fn test_shader_keyword_follows_swap() {
        let (_, mut manager) = manager(
            ManagerConfig::default()
                .with_native_texture_updates(true)
                .with_graphics_api(GraphicsApi::Direct3D11),
        );
        manager.init().unwrap();
        assert_eq!(manager.conversion_method(), ConversionMethod::NativeTexture);
        assert_eq!(manager.shader_keyword(), SWAP_RED_BLUE_ON);
        assert_eq!(manager.disabled_shader_keyword(), SWAP_RED_BLUE_OFF);
    }

    #[test]
    fn test_find_device_by_index_or_name() {
        let (_, mut manager) = manager(ManagerConfig::default());
        assert!(matches!(
            manager.find_device_mut("0"),
            Err(LiveCamError::NotInitialised)
        ));
        manager.init().unwrap();
        assert_eq!(manager.find_device_mut("1").unwrap().index(), 1);
        assert_eq!(
            manager.find_device_mut("Integrated Webcam").unwrap().index(),
            0
        );
        assert!(matches!(
            manager.find_device_mut("Nope"),
            Err(LiveCamError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_drop_releases_backend() {
        let (backend, mut manager) = manager(ManagerConfig::default());
        manager.init().unwrap();
        drop(manager);
        assert!(!backend.is_initialised());
        assert_eq!(backend.deinit_calls(), 1);
    }
}
