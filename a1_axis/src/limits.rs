//! Hard and soft travel limits.
//!
//! Hard limits are the raw clockwise / counter-clockwise end-of-travel inputs
//! of the drive, mapped to "positive" / "negative" through the axis
//! direction-reversal parameter. Soft limits are controller-enforced position
//! thresholds; when they are disabled the resolved value is NaN, never zero.

use a1_common::driver::{AxisIndex, ControllerDriver};
use a1_common::protocol::AxisParameter;
use tracing::debug;

use crate::error::{AxisError, checked};
use crate::status::DecodedDrive;

/// Mapping between raw limit inputs and named limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Positive = CCW input, negative = CW input.
    Normal,
    /// Positive = CW input, negative = CCW input.
    Reversed,
}

impl Polarity {
    /// Polarity selected by the direction-reversal parameter value.
    /// The value is truncated toward zero; only an integer 0 is normal.
    #[inline]
    pub fn from_parameter(value: f64) -> Self {
        if value as i64 == 0 {
            Self::Normal
        } else {
            Self::Reversed
        }
    }

    #[inline]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Normal => Self::Reversed,
            Self::Reversed => Self::Normal,
        }
    }

    /// Read the axis direction parameter.
    pub fn read(driver: &mut dyn ControllerDriver, axis: AxisIndex) -> Result<Self, AxisError> {
        const OP: &str = "read_motor_direction";
        let result = driver.axis_parameter(axis, AxisParameter::ReverseMotionDirection);
        checked(driver, OP, result).map(Self::from_parameter)
    }
}

/// Named travel direction of a limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitSide {
    Positive,
    Negative,
}

impl LimitSide {
    /// State of this side's hard limit input.
    ///
    /// Both sides go through this single mapping so they can never disagree
    /// on polarity.
    pub const fn hard_limit(self, drive: &DecodedDrive, polarity: Polarity) -> bool {
        match (self, polarity) {
            (Self::Positive, Polarity::Normal) | (Self::Negative, Polarity::Reversed) => {
                drive.ccw_limit_input
            }
            (Self::Positive, Polarity::Reversed) | (Self::Negative, Polarity::Normal) => {
                drive.cw_limit_input
            }
        }
    }

    /// Threshold parameter holding this side's soft limit.
    pub const fn soft_limit_parameter(self) -> AxisParameter {
        match self {
            Self::Positive => AxisParameter::SoftwareLimitHigh,
            Self::Negative => AxisParameter::SoftwareLimitLow,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

/// Both hard limits resolved from one sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardLimits {
    pub positive: bool,
    pub negative: bool,
}

impl HardLimits {
    pub const fn resolve(drive: &DecodedDrive, polarity: Polarity) -> Self {
        Self {
            positive: LimitSide::Positive.hard_limit(drive, polarity),
            negative: LimitSide::Negative.hard_limit(drive, polarity),
        }
    }
}

/// Read one soft limit. NaN when software limits are disabled.
pub fn read_soft_limit(
    driver: &mut dyn ControllerDriver,
    axis: AxisIndex,
    side: LimitSide,
) -> Result<f64, AxisError> {
    const OP: &str = "read_softlimit";
    let result = driver.axis_parameter(axis, AxisParameter::SoftwareLimitSetup);
    let setup = checked(driver, OP, result)?;
    if setup as i64 == 0 {
        return Ok(f64::NAN);
    }
    let result = driver.axis_parameter(axis, side.soft_limit_parameter());
    checked(driver, OP, result)
}

/// Forward a soft limit threshold to the controller. The controller alone
/// decides whether the value is acceptable.
pub fn write_soft_limit(
    driver: &mut dyn ControllerDriver,
    axis: AxisIndex,
    side: LimitSide,
    value: f64,
) -> Result<(), AxisError> {
    const OP: &str = "write_softlimit";
    debug!(axis, side = side.as_str(), value, "writing soft limit");
    let result = driver.set_axis_parameter(axis, side.soft_limit_parameter(), value);
    checked(driver, OP, result)
}
