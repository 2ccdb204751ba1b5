//! Controller entity.
//!
//! The only place the driver connection is opened. Axes and encoders are
//! built after it and share its handle; dropping it closes the connection.

use a1_common::config::ControllerConfig;
use a1_common::driver::ApiVersion;
use tracing::{error, info};

use crate::error::{AxisError, checked, last_error};
use crate::handle::ControllerHandle;

#[derive(Debug)]
pub struct Controller {
    device: String,
    host: String,
    controller: ControllerHandle,
}

impl Controller {
    /// Connect the shared handle to the controller at `config.ip_address`.
    ///
    /// # Errors
    /// `ConnectionFailed` with the driver's error text.
    pub fn connect(
        controller: ControllerHandle,
        config: &ControllerConfig,
    ) -> Result<Self, AxisError> {
        {
            let mut link = controller.lock();
            let driver = link.driver();
            if !driver.is_connected() && driver.connect(&config.ip_address).is_err() {
                let message = last_error(driver);
                error!(host = %config.ip_address, %message, "controller connect failed");
                return Err(AxisError::ConnectionFailed {
                    host: config.ip_address.clone(),
                    message,
                });
            }
        }
        info!(
            device = %config.device,
            host = %config.ip_address,
            driver = controller.driver_name(),
            "controller connected"
        );
        Ok(Self {
            device: config.device.clone(),
            host: config.ip_address.clone(),
            controller,
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Handle to pass to axes and encoders.
    pub fn handle(&self) -> ControllerHandle {
        self.controller.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.controller.lock().is_connected()
    }

    /// Driver library version. Needs no connection.
    pub fn api_version(&self) -> ApiVersion {
        self.controller.lock().driver().api_version()
    }

    pub fn available_axis_count(&self) -> Result<u32, AxisError> {
        const OP: &str = "read_available_axis_count";
        let mut link = self.controller.lock();
        let driver = link.connected(OP)?;
        let result = driver.available_axis_count();
        checked(driver, OP, result)
    }

    /// Tasks are not exposed by this server; always 0 once connected.
    pub fn available_task_count(&self) -> Result<u32, AxisError> {
        self.controller
            .lock()
            .connected("read_available_task_count")
            .map(|_| 0)
    }

    pub fn is_running(&self) -> Result<bool, AxisError> {
        const OP: &str = "read_is_running";
        let mut link = self.controller.lock();
        let driver = link.connected(OP)?;
        let result = driver.is_running();
        checked(driver, OP, result)
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        let mut link = self.controller.lock();
        if link.is_connected() {
            link.driver().disconnect();
            info!(device = %self.device, "controller disconnected");
        }
    }
}
