//! [`Device`] adapter for the controller entity.

use a1_axis::{AttrRequest, Controller};
use a1_common::protocol::PROTOCOL_REVISION;

use super::{
    AttrInfo, AttrType, AttrValue, CommandInfo, Device, DeviceError, DeviceKind, DeviceState,
    read_only, unknown_attribute, unknown_command,
};

const ATTRIBUTES: [AttrInfo; 5] = [
    AttrInfo {
        name: "api_version",
        ty: AttrType::Text,
        writable: false,
    },
    AttrInfo {
        name: "available_axis_count",
        ty: AttrType::Int,
        writable: false,
    },
    AttrInfo {
        name: "available_task_count",
        ty: AttrType::Int,
        writable: false,
    },
    AttrInfo {
        name: "is_running",
        ty: AttrType::Bool,
        writable: false,
    },
    AttrInfo {
        name: "protocol_revision",
        ty: AttrType::Int,
        writable: false,
    },
];

fn known(controller: &Controller, name: &str) -> Result<(), DeviceError> {
    if ATTRIBUTES.iter().any(|a| a.name == name) {
        Ok(())
    } else {
        Err(unknown_attribute(controller.device(), name))
    }
}

impl Device for Controller {
    fn name(&self) -> &str {
        self.device()
    }

    fn kind(&self) -> DeviceKind {
        DeviceKind::Controller
    }

    fn state(&self) -> Result<DeviceState, DeviceError> {
        Ok(if self.is_connected() {
            DeviceState::Standby
        } else {
            DeviceState::Init
        })
    }

    fn status(&self) -> Result<String, DeviceError> {
        let link = if self.is_connected() {
            "connected"
        } else {
            "not connected"
        };
        Ok(format!(
            "{link} to {} ({} driver, api {}, protocol rev {PROTOCOL_REVISION})",
            self.host(),
            self.handle().driver_name(),
            self.api_version()
        ))
    }

    fn attributes(&self) -> Vec<AttrInfo> {
        ATTRIBUTES.to_vec()
    }

    fn commands(&self) -> Vec<CommandInfo> {
        Vec::new()
    }

    fn is_attribute_allowed(&self, name: &str, request: AttrRequest) -> Result<bool, DeviceError> {
        known(self, name)?;
        Ok(request == AttrRequest::Read)
    }

    fn read_attribute(&self, name: &str) -> Result<AttrValue, DeviceError> {
        let value = match name {
            "api_version" => AttrValue::Text(self.api_version().to_string()),
            "available_axis_count" => AttrValue::Int(self.available_axis_count()?),
            "available_task_count" => AttrValue::Int(self.available_task_count()?),
            "is_running" => AttrValue::Bool(self.is_running()?),
            "protocol_revision" => AttrValue::Int(PROTOCOL_REVISION),
            _ => return Err(unknown_attribute(self.device(), name)),
        };
        Ok(value)
    }

    fn write_attribute(&self, name: &str, _value: AttrValue) -> Result<(), DeviceError> {
        known(self, name)?;
        Err(read_only(self.device(), name))
    }

    fn is_command_allowed(&self, name: &str) -> Result<bool, DeviceError> {
        Err(unknown_command(self.device(), name))
    }

    fn execute(&self, name: &str, _argument: Option<f64>) -> Result<(), DeviceError> {
        Err(unknown_command(self.device(), name))
    }
}
