//! [`Device`] adapter for a motion axis.

use a1_axis::limits::LimitSide;
use a1_axis::{AttrRequest, Axis, AxisAttribute, AxisCommand};

use super::{
    AttrInfo, AttrType, AttrValue, CommandInfo, Device, DeviceError, DeviceKind, DeviceState,
    read_only, unknown_attribute, unknown_command,
};

const fn attribute_type(attribute: AxisAttribute) -> AttrType {
    match attribute {
        AxisAttribute::Accelerating
        | AxisAttribute::PositiveHardLimit
        | AxisAttribute::NegativeHardLimit => AttrType::Bool,
        AxisAttribute::Faults => AttrType::Text,
        _ => AttrType::Float,
    }
}

fn lookup_attribute(axis: &Axis, name: &str) -> Result<AxisAttribute, DeviceError> {
    AxisAttribute::from_name(name).ok_or_else(|| unknown_attribute(axis.device(), name))
}

fn lookup_command(axis: &Axis, name: &str) -> Result<AxisCommand, DeviceError> {
    AxisCommand::from_name(name).ok_or_else(|| unknown_command(axis.device(), name))
}

impl Device for Axis {
    fn name(&self) -> &str {
        self.device()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Axis
    }

    fn state(&self) -> Result<DeviceState, DeviceError> {
        Ok(Axis::state(self)?.into())
    }

    fn status(&self) -> Result<String, DeviceError> {
        Ok(self.status_text()?)
    }

    fn attributes(&self) -> Vec<AttrInfo> {
        AxisAttribute::ALL
            .into_iter()
            .map(|a| AttrInfo {
                name: a.name(),
                ty: attribute_type(a),
                writable: a.is_writable(),
            })
            .collect()
    }

    fn commands(&self) -> Vec<CommandInfo> {
        AxisCommand::ALL
            .into_iter()
            .map(|c| CommandInfo {
                name: c.name(),
                takes_argument: c.takes_argument(),
            })
            .collect()
    }

    fn is_attribute_allowed(&self, name: &str, request: AttrRequest) -> Result<bool, DeviceError> {
        let attribute = lookup_attribute(self, name)?;
        if request == AttrRequest::Write && !attribute.is_writable() {
            return Ok(false);
        }
        Ok(Axis::is_attribute_allowed(self, attribute, request)?)
    }

    fn read_attribute(&self, name: &str) -> Result<AttrValue, DeviceError> {
        let value = match lookup_attribute(self, name)? {
            AxisAttribute::Position => AttrValue::Float(self.position()?),
            AxisAttribute::PositionCommand => AttrValue::Float(self.position_command()?),
            AxisAttribute::MotionVelocity => AttrValue::Float(self.motion_velocity()),
            AxisAttribute::Velocity => AttrValue::Float(self.velocity()?),
            AxisAttribute::VelocityCommand => AttrValue::Float(self.velocity_command()?),
            AxisAttribute::Accelerating => AttrValue::Bool(self.accelerating()?),
            AxisAttribute::Faults => AttrValue::Text(self.faults()?),
            AxisAttribute::PositiveHardLimit => {
                AttrValue::Bool(self.hard_limit(LimitSide::Positive)?)
            }
            AxisAttribute::NegativeHardLimit => {
                AttrValue::Bool(self.hard_limit(LimitSide::Negative)?)
            }
            AxisAttribute::PositiveSoftLimit => {
                AttrValue::Float(self.soft_limit(LimitSide::Positive)?)
            }
            AxisAttribute::NegativeSoftLimit => {
                AttrValue::Float(self.soft_limit(LimitSide::Negative)?)
            }
        };
        Ok(value)
    }

    fn write_attribute(&self, name: &str, value: AttrValue) -> Result<(), DeviceError> {
        let attribute = lookup_attribute(self, name)?;
        if !attribute.is_writable() {
            return Err(read_only(self.device(), name));
        }
        let value = value.as_float(name)?;
        match attribute {
            AxisAttribute::Position => self.move_absolute(value)?,
            AxisAttribute::MotionVelocity => self.set_motion_velocity(value),
            AxisAttribute::PositiveSoftLimit => self.set_soft_limit(LimitSide::Positive, value)?,
            AxisAttribute::NegativeSoftLimit => self.set_soft_limit(LimitSide::Negative, value)?,
            _ => return Err(read_only(self.device(), name)),
        }
        Ok(())
    }

    fn is_command_allowed(&self, name: &str) -> Result<bool, DeviceError> {
        let command = lookup_command(self, name)?;
        Ok(Axis::is_command_allowed(self, command)?)
    }

    fn execute(&self, name: &str, argument: Option<f64>) -> Result<(), DeviceError> {
        let command = lookup_command(self, name)?;
        match (command.takes_argument(), argument) {
            (true, None) => {
                return Err(DeviceError::TypeMismatch {
                    name: name.to_string(),
                    expected: AttrType::Float.as_str(),
                    got: "no argument".to_string(),
                });
            }
            (false, Some(extra)) => {
                return Err(DeviceError::TypeMismatch {
                    name: name.to_string(),
                    expected: "no argument",
                    got: extra.to_string(),
                });
            }
            _ => {}
        }
        match command {
            AxisCommand::Enable => self.enable()?,
            AxisCommand::Disable => self.disable()?,
            AxisCommand::Home => self.home()?,
            AxisCommand::Stop => self.stop()?,
            AxisCommand::FreeRun => self.freerun(argument.unwrap_or_default())?,
            AxisCommand::FaultAck => self.fault_ack()?,
            AxisCommand::FaultAckAll => self.fault_ack_all()?,
        }
        Ok(())
    }
}
