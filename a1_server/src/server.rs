//! Device table built from configuration.
//!
//! ```text
//! ServerConfig ──► DriverRegistry ──► driver.init(section)
//!                                        │
//!                                        ▼
//!                           SharedController (one per process)
//!                                        │
//!              ┌─────────────────────────┼─────────────────────────┐
//!              ▼                         ▼                         ▼
//!        Controller (connect)        Axis × N                Encoder × M
//! ```
//!
//! Axes and encoders that fail to initialize are logged and left out of the
//! table; a driver or connection failure aborts startup.

use a1_axis::{AbsoluteEncoder, Axis, Controller, SharedController};
use a1_common::config::ServerConfig;
use std::collections::HashMap;
use tracing::{error, info, warn};

use crate::device::{Device, DeviceEntry, DeviceError, DeviceState};
use crate::driver_registry::DriverRegistry;

/// Owns every exposed entity.
pub struct DeviceServer {
    /// Controller first, then axes, then encoders.
    devices: Vec<DeviceEntry>,
    skipped: Vec<(String, DeviceError)>,
}

impl DeviceServer {
    /// Create the driver, connect the controller and build the device table.
    ///
    /// # Errors
    /// - `Config` when the configuration or driver section is invalid
    /// - `DriverNotFound` for an unregistered driver name
    /// - `Axis(ConnectionFailed)` when the controller cannot be reached
    pub fn start(config: &ServerConfig, registry: &DriverRegistry) -> Result<Self, DeviceError> {
        config.validate()?;

        let driver_name = config.controller.driver.as_str();
        let mut driver = registry.create_driver(driver_name)?;
        driver.init(config.driver_section(driver_name))?;
        info!("Driver '{}' initialized", driver.name());

        let handle = SharedController::new(driver);
        let controller = Controller::connect(handle.clone(), &config.controller)?;

        let mut devices = vec![DeviceEntry::Controller(controller)];
        let mut skipped = Vec::new();

        for axis in &config.axes {
            match Axis::new(handle.clone(), axis) {
                Ok(entity) => devices.push(DeviceEntry::Axis(entity)),
                Err(e) => {
                    error!(device = %axis.device, error = %e, "axis initialization failed");
                    skipped.push((axis.device.clone(), e.into()));
                }
            }
        }

        for encoder in &config.encoders {
            match AbsoluteEncoder::new(handle.clone(), encoder) {
                Ok(entity) => devices.push(DeviceEntry::Encoder(entity)),
                Err(e) => {
                    error!(device = %encoder.device, error = %e, "encoder initialization failed");
                    skipped.push((encoder.device.clone(), e.into()));
                }
            }
        }

        info!(
            "Device server started: {} devices, {} skipped",
            devices.len(),
            skipped.len()
        );
        Ok(Self { devices, skipped })
    }

    /// Look up a device by name.
    pub fn device(&self, name: &str) -> Result<&dyn Device, DeviceError> {
        self.devices
            .iter()
            .find(|entry| entry.name() == name)
            .map(DeviceEntry::as_device)
            .ok_or_else(|| DeviceError::UnknownDevice(name.to_string()))
    }

    /// Every device in table order.
    pub fn devices(&self) -> impl Iterator<Item = &dyn Device> {
        self.devices.iter().map(DeviceEntry::as_device)
    }

    /// Devices left out at startup, with the reason.
    pub fn skipped(&self) -> &[(String, DeviceError)] {
        &self.skipped
    }
}

impl Drop for DeviceServer {
    fn drop(&mut self) {
        // Axes release their status queries before the controller disconnects.
        while let Some(entry) = self.devices.pop() {
            drop(entry);
        }
    }
}

// ─── State Monitor ──────────────────────────────────────────────────

/// One observed state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    pub device: String,
    /// `None` on the first poll.
    pub from: Option<DeviceState>,
    pub to: DeviceState,
}

/// Tracks the last seen state of every device.
#[derive(Debug, Default)]
pub struct StateMonitor {
    last: HashMap<String, DeviceState>,
}

impl StateMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every device's state and return those that changed.
    ///
    /// A failed read is logged and leaves the last known state untouched.
    pub fn poll(&mut self, server: &DeviceServer) -> Vec<StateChange> {
        let mut changes = Vec::new();
        for device in server.devices() {
            let state = match device.state() {
                Ok(state) => state,
                Err(e) => {
                    warn!(device = device.name(), error = %e, "state read failed");
                    continue;
                }
            };
            let from = self.last.insert(device.name().to_string(), state);
            if from != Some(state) {
                changes.push(StateChange {
                    device: device.name().to_string(),
                    from,
                    to: state,
                });
            }
        }
        changes
    }
}
