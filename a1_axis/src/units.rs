//! Counts to user-unit conversion.
//!
//! The counts-per-unit parameter is fetched on every conversion; it can be
//! changed on the controller at any time.

use a1_common::driver::{AxisIndex, ControllerDriver};
use a1_common::protocol::AxisParameter;

use crate::error::{AxisError, checked};

fn counts_per_unit(driver: &mut dyn ControllerDriver, axis: AxisIndex) -> Result<f64, AxisError> {
    const OP: &str = "read_counts_per_unit";
    let result = driver.axis_parameter(axis, AxisParameter::CountsPerUnit);
    checked(driver, OP, result)
}

/// `counts / counts_per_unit`.
pub fn counts_to_user_unit(
    driver: &mut dyn ControllerDriver,
    axis: AxisIndex,
    counts: f64,
) -> Result<f64, AxisError> {
    Ok(counts / counts_per_unit(driver, axis)?)
}

