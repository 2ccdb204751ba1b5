//! Absolute encoder entity.
//!
//! A single scaled read of the drive's BiSS absolute position. No state
//! machine and no commands.

use a1_common::config::EncoderDeviceConfig;
use a1_common::protocol::DriveItem;
use tracing::info;

use crate::axis::{AxisHandle, required_axis_name};
use crate::error::{AxisError, checked};
use crate::handle::ControllerHandle;
use crate::state::LifecycleState;
use crate::units::counts_to_user_unit;

#[derive(Debug)]
pub struct AbsoluteEncoder {
    device: String,
    handle: AxisHandle,
    controller: ControllerHandle,
    scale: f64,
    offset: f64,
}

impl AbsoluteEncoder {
    pub fn new(
        controller: ControllerHandle,
        config: &EncoderDeviceConfig,
    ) -> Result<Self, AxisError> {
        let name = required_axis_name(config.axis_name.as_deref())?;
        let handle = AxisHandle::resolve(&mut controller.lock(), name)?;
        info!(
            device = %config.device,
            axis = handle.name(),
            index = handle.index(),
            "encoder initialized"
        );
        Ok(Self {
            device: config.device.clone(),
            handle,
            controller,
            scale: config.scale,
            offset: config.offset,
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn handle(&self) -> &AxisHandle {
        &self.handle
    }

    /// Always STANDBY.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::Standby
    }

    /// `counts / counts_per_unit * scale - offset` [user units].
    pub fn position(&self) -> Result<f64, AxisError> {
        const OP: &str = "read_encoder_position";
        let mut link = self.controller.lock();
        let driver = link.connected(OP)?;
        let axis = self.handle.index();
        let result = driver.drive_item(axis, DriveItem::PrimaryBissAbsolutePosition);
        let counts = checked(driver, OP, result)?;
        let units = counts_to_user_unit(driver, axis, counts)?;
        Ok(units * self.scale - self.offset)
    }
}
