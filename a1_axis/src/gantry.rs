//! Gantry fault-acknowledge propagation.
//!
//! Axes that are mechanically coupled share faults: acknowledging one axis of
//! a gantry must also acknowledge its partners. The coupling is read per call
//! from the gantry-axis-mask parameter (bit `i` set = axis `i` is coupled).

use a1_common::consts::MAX_AXES;
use a1_common::driver::{AxisIndex, ControllerDriver};
use a1_common::protocol::AxisParameter;
use tracing::{debug, warn};

use crate::error::{AxisError, checked, last_error};

/// Axis indices coupled to one triggering axis, in ascending order.
pub type AxisSet = heapless::Vec<AxisIndex, MAX_AXES>;

/// Axes coupled to a triggering axis. Never contains the trigger itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GantryGroup {
    axes: AxisSet,
}

impl GantryGroup {
    /// Build the group from a raw mask.
    ///
    /// Bits at or above `axis_count` are ignored, as is the bit of `own`.
    pub fn from_mask(mask: u64, own: AxisIndex, axis_count: u32) -> Self {
        let limit = (axis_count as usize).min(MAX_AXES);
        let mut axes = AxisSet::new();
        for index in 0..limit {
            if mask & (1u64 << index) == 0 || index == own as usize {
                continue;
            }
            // limit <= MAX_AXES, so the push always fits
            let _ = axes.push(index as AxisIndex);
        }
        Self { axes }
    }

    /// Read the coupled axes of `own` from the controller.
    ///
    /// A zero mask ends the lookup without querying the axis count.
    pub fn read(driver: &mut dyn ControllerDriver, own: AxisIndex) -> Result<Self, AxisError> {
        let result = driver.axis_parameter(own, AxisParameter::GantryAxisMask);
        let mask = checked(driver, "read_gantry_axis_mask", result)? as u64;
        if mask == 0 {
            return Ok(Self::default());
        }
        let result = driver.available_axis_count();
        let count = checked(driver, "read_available_axis_count", result)?;
        let group = Self::from_mask(mask, own, count);
        debug!(axis = own, mask, coupled = ?group.axes(), "gantry group resolved");
        Ok(group)
    }

    pub fn axes(&self) -> &[AxisIndex] {
        &self.axes
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    /// Acknowledge faults on every coupled axis, one call per axis.
    ///
    /// A failing axis is logged and skipped. Returns the axes whose
    /// acknowledge was rejected.
    pub fn acknowledge(&self, driver: &mut dyn ControllerDriver) -> AxisSet {
        let mut failed = AxisSet::new();
        for &axis in &self.axes {
            if driver.fault_acknowledge(&[axis]).is_err() {
                let message = last_error(driver);
                warn!(axis, %message, "gantry partner fault acknowledge failed");
                let _ = failed.push(axis);
            }
        }
        failed
    }
}
