//! [`Device`] adapter for an absolute encoder. One read-only attribute, no
//! commands, always STANDBY.

use a1_axis::{AbsoluteEncoder, AttrRequest};

use super::{
    AttrInfo, AttrType, AttrValue, CommandInfo, Device, DeviceError, DeviceKind, DeviceState,
    read_only, unknown_attribute, unknown_command,
};

const POSITION: &str = "position";

impl Device for AbsoluteEncoder {
    fn name(&self) -> &str {
        self.device()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Encoder
    }

    fn state(&self) -> Result<DeviceState, DeviceError> {
        Ok(AbsoluteEncoder::state(self).into())
    }

    fn status(&self) -> Result<String, DeviceError> {
        Ok(format!(
            "absolute encoder on axis {} (index {})",
            self.handle().name(),
            self.handle().index()
        ))
    }

    fn attributes(&self) -> Vec<AttrInfo> {
        vec![AttrInfo {
            name: POSITION,
            ty: AttrType::Float,
            writable: false,
        }]
    }

    fn commands(&self) -> Vec<CommandInfo> {
        Vec::new()
    }

    fn is_attribute_allowed(&self, name: &str, request: AttrRequest) -> Result<bool, DeviceError> {
        if name != POSITION {
            return Err(unknown_attribute(self.device(), name));
        }
        Ok(request == AttrRequest::Read)
    }

    fn read_attribute(&self, name: &str) -> Result<AttrValue, DeviceError> {
        if name != POSITION {
            return Err(unknown_attribute(self.device(), name));
        }
        Ok(AttrValue::Float(self.position()?))
    }

    fn write_attribute(&self, name: &str, _value: AttrValue) -> Result<(), DeviceError> {
        if name != POSITION {
            return Err(unknown_attribute(self.device(), name));
        }
        Err(read_only(self.device(), name))
    }

    fn is_command_allowed(&self, name: &str) -> Result<bool, DeviceError> {
        Err(unknown_command(self.device(), name))
    }

    fn execute(&self, name: &str, _argument: Option<f64>) -> Result<(), DeviceError> {
        Err(unknown_command(self.device(), name))
    }
}
