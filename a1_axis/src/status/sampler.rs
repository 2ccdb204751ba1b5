//! Batched status sampling.
//!
//! A [`StatusSampler`] owns one status query configuration on the controller,
//! bound to an axis and to the fixed [`STATUS_ITEMS`] order. Sampling does not
//! take the controller lock itself: the caller passes in the guard it already
//! holds, so a sample can be composed with the decision and the command that
//! follow it inside one critical section.

use a1_common::driver::{AxisIndex, StatusConfigId};
use a1_common::protocol::{STATUS_ITEM_COUNT, STATUS_ITEMS, StatusItem};
use serde::Serialize;
use tracing::{debug, warn};

use super::decode::{
    DecodedDrive, DecodedFaults, DecodedStatus, decode_axis_fault, decode_axis_status,
    decode_drive_status,
};
use crate::error::{AxisError, checked};
use crate::handle::ControllerGuard;
use crate::state::LifecycleState;

/// Raw result of one batched status query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusSample {
    pub axis_status: u32,
    pub drive_status: u32,
    pub axis_fault: u32,
    pub position_command: f64,
    pub position_feedback: f64,
    pub velocity_command: f64,
    pub velocity_feedback: f64,
}

/// Status words are transported as doubles holding an integer.
#[inline]
fn word(raw: f64) -> u32 {
    raw as i64 as u32
}

impl StatusSample {
    /// Build a sample from a result array in [`STATUS_ITEMS`] order.
    pub fn from_results(results: &[f64; STATUS_ITEM_COUNT]) -> Self {
        let at = |item: StatusItem| results[item.slot()];
        Self {
            axis_status: word(at(StatusItem::AxisStatus)),
            drive_status: word(at(StatusItem::DriveStatus)),
            axis_fault: word(at(StatusItem::AxisFault)),
            position_command: at(StatusItem::ProgramPositionCommand),
            position_feedback: at(StatusItem::ProgramPositionFeedback),
            velocity_command: at(StatusItem::ProgramVelocityCommand),
            velocity_feedback: at(StatusItem::ProgramVelocityFeedback),
        }
    }

    /// Decode all three status words.
    pub const fn decode(&self) -> DecodedSample {
        DecodedSample {
            status: decode_axis_status(self.axis_status),
            drive: decode_drive_status(self.drive_status),
            faults: decode_axis_fault(self.axis_fault),
        }
    }
}

/// All decoded conditions of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodedSample {
    pub status: DecodedStatus,
    pub drive: DecodedDrive,
    pub faults: DecodedFaults,
}

impl DecodedSample {
    /// Lifecycle state of this sample.
    pub const fn state(&self) -> LifecycleState {
        LifecycleState::derive(&self.status, &self.drive, &self.faults)
    }
}

/// Status query bound to one axis.
#[derive(Debug)]
pub struct StatusSampler {
    axis: AxisIndex,
    config: StatusConfigId,
}

impl StatusSampler {
    /// Create the status query configuration for `axis`.
    pub fn create(link: &mut ControllerGuard<'_>, axis: AxisIndex) -> Result<Self, AxisError> {
        const OP: &str = "create_status_config";
        let driver = link.connected(OP)?;
        let result = driver.create_status_config(axis, &STATUS_ITEMS);
        let config = checked(driver, OP, result)?;
        debug!(axis, ?config, "status query created");
        Ok(Self { axis, config })
    }

    /// Run one batched query and return the current words.
    ///
    /// # Errors
    /// `NotConnected` naming `operation` when the controller is absent,
    /// `DriverRejected` when the query fails.
    pub fn sample(
        &self,
        link: &mut ControllerGuard<'_>,
        operation: &'static str,
    ) -> Result<StatusSample, AxisError> {
        let driver = link.connected(operation)?;
        let mut results = [0.0; STATUS_ITEM_COUNT];
        let result = driver.status_results(self.config, &mut results);
        checked(driver, operation, result)?;
        Ok(StatusSample::from_results(&results))
    }

    /// Release the query configuration on the controller.
    pub fn release(&self, link: &mut ControllerGuard<'_>) {
        if link.is_connected() {
            link.driver().destroy_status_config(self.config);
        } else {
            warn!(axis = self.axis, "controller gone, status query not released");
        }
    }
}
