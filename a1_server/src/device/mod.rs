//! Per-entity capability interface.
//!
//! Every entity the server exposes (controller, axes, absolute encoders)
//! implements [`Device`]: a name, a kind, a derived state, a status text and
//! a table of named attributes and commands. The CLI only talks to this
//! trait.
//!
//! ```text
//! DeviceServer ──► DeviceEntry ──► &dyn Device ──► Axis / AbsoluteEncoder / Controller
//! ```

mod axis;
mod controller;
mod encoder;

use a1_axis::{
    AbsoluteEncoder, AttrRequest, Axis, AxisError, Controller, LifecycleState,
};
use a1_common::config::ConfigError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ─── Errors ─────────────────────────────────────────────────────────

/// Errors surfaced by the device layer.
#[derive(Debug, Clone, Error)]
pub enum DeviceError {
    /// Entity-level failure (connection, rejection, gate).
    #[error(transparent)]
    Axis(#[from] AxisError),

    #[error("{device}: no attribute '{attribute}'")]
    UnknownAttribute { device: String, attribute: String },

    #[error("{device}: no command '{command}'")]
    UnknownCommand { device: String, command: String },

    #[error("{device}: attribute '{attribute}' is read-only")]
    ReadOnly { device: String, attribute: String },

    /// A value or argument could not be used as the expected type.
    #[error("{name}: expected {expected}, got '{got}'")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        got: String,
    },

    #[error("no device named '{0}'")]
    UnknownDevice(String),

    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

// ─── Descriptors ────────────────────────────────────────────────────

/// Kind of entity behind a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Controller,
    Axis,
    Encoder,
}

impl DeviceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Controller => "controller",
            Self::Axis => "axis",
            Self::Encoder => "encoder",
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Externally reported device state.
///
/// Axes map their [`LifecycleState`] one to one; `Init` is only reported by
/// a controller without a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceState {
    Init,
    Standby,
    #[serde(rename = "DISABLE")]
    Disabled,
    Moving,
    Fault,
}

impl DeviceState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::Standby => "STANDBY",
            Self::Disabled => "DISABLE",
            Self::Moving => "MOVING",
            Self::Fault => "FAULT",
        }
    }
}

impl From<LifecycleState> for DeviceState {
    fn from(state: LifecycleState) -> Self {
        match state {
            LifecycleState::Fault => Self::Fault,
            LifecycleState::Disabled => Self::Disabled,
            LifecycleState::Moving => Self::Moving,
            LifecycleState::Standby => Self::Standby,
        }
    }
}

impl fmt::Display for DeviceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttrType {
    Float,
    Int,
    Bool,
    Text,
}

impl AttrType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Text => "text",
        }
    }
}

/// Static description of one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttrInfo {
    pub name: &'static str,
    pub ty: AttrType,
    pub writable: bool,
}

/// Static description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommandInfo {
    pub name: &'static str,
    pub takes_argument: bool,
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Float(f64),
    Int(u32),
    Bool(bool),
    Text(String),
}

impl AttrValue {
    /// Parse operator text as a value of type `ty`.
    ///
    /// # Errors
    /// `TypeMismatch` naming `name` when `text` does not parse.
    pub fn parse(name: &str, ty: AttrType, text: &str) -> Result<Self, DeviceError> {
        let mismatch = || DeviceError::TypeMismatch {
            name: name.to_string(),
            expected: ty.as_str(),
            got: text.to_string(),
        };
        let text = text.trim();
        match ty {
            AttrType::Float => text.parse().map(Self::Float).map_err(|_| mismatch()),
            AttrType::Int => text.parse().map(Self::Int).map_err(|_| mismatch()),
            AttrType::Bool => text.parse().map(Self::Bool).map_err(|_| mismatch()),
            AttrType::Text => Ok(Self::Text(text.to_string())),
        }
    }

    pub const fn ty(&self) -> AttrType {
        match self {
            Self::Float(_) => AttrType::Float,
            Self::Int(_) => AttrType::Int,
            Self::Bool(_) => AttrType::Bool,
            Self::Text(_) => AttrType::Text,
        }
    }

    /// The value as a float, for writes to float attributes.
    pub fn as_float(&self, name: &str) -> Result<f64, DeviceError> {
        match self {
            Self::Float(v) => Ok(*v),
            Self::Int(v) => Ok(f64::from(*v)),
            other => Err(DeviceError::TypeMismatch {
                name: name.to_string(),
                expected: AttrType::Float.as_str(),
                got: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

// ─── Device Trait ───────────────────────────────────────────────────

/// Capability interface of one exposed entity.
///
/// Writes and command executions are gated by the entity itself: the
/// allowed-check and the action run under one controller lock, so a caller
/// does not need to call the `is_*_allowed` methods first.
pub trait Device: Send + Sync {
    /// Device name from the configuration.
    fn name(&self) -> &str;

    fn kind(&self) -> DeviceKind;

    fn state(&self) -> Result<DeviceState, DeviceError>;

    /// Multi-line human-readable status.
    fn status(&self) -> Result<String, DeviceError>;

    fn attributes(&self) -> Vec<AttrInfo>;

    fn commands(&self) -> Vec<CommandInfo>;

    fn is_attribute_allowed(&self, name: &str, request: AttrRequest) -> Result<bool, DeviceError>;

    fn read_attribute(&self, name: &str) -> Result<AttrValue, DeviceError>;

    fn write_attribute(&self, name: &str, value: AttrValue) -> Result<(), DeviceError>;

    fn is_command_allowed(&self, name: &str) -> Result<bool, DeviceError>;

    /// Run `name`, with `argument` for commands that take one.
    fn execute(&self, name: &str, argument: Option<f64>) -> Result<(), DeviceError>;

    /// Type of attribute `name`.
    fn attribute_type(&self, name: &str) -> Result<AttrType, DeviceError> {
        self.attributes()
            .into_iter()
            .find(|a| a.name == name)
            .map(|a| a.ty)
            .ok_or_else(|| unknown_attribute(self.name(), name))
    }
}

pub(crate) fn unknown_attribute(device: &str, attribute: &str) -> DeviceError {
    DeviceError::UnknownAttribute {
        device: device.to_string(),
        attribute: attribute.to_string(),
    }
}

pub(crate) fn unknown_command(device: &str, command: &str) -> DeviceError {
    DeviceError::UnknownCommand {
        device: device.to_string(),
        command: command.to_string(),
    }
}

pub(crate) fn read_only(device: &str, attribute: &str) -> DeviceError {
    DeviceError::ReadOnly {
        device: device.to_string(),
        attribute: attribute.to_string(),
    }
}

/// Serializable overview of one device, as printed by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceSummary {
    pub name: String,
    pub kind: DeviceKind,
    pub attributes: Vec<AttrInfo>,
    pub commands: Vec<CommandInfo>,
}

impl DeviceSummary {
    pub fn of(device: &dyn Device) -> Self {
        Self {
            name: device.name().to_string(),
            kind: device.kind(),
            attributes: device.attributes(),
            commands: device.commands(),
        }
    }
}

// ─── Device Table Entry ─────────────────────────────────────────────

/// One entity owned by the server.
#[derive(Debug)]
pub enum DeviceEntry {
    Controller(Controller),
    Axis(Axis),
    Encoder(AbsoluteEncoder),
}

impl DeviceEntry {
    pub fn as_device(&self) -> &dyn Device {
        match self {
            Self::Controller(controller) => controller,
            Self::Axis(axis) => axis,
            Self::Encoder(encoder) => encoder,
        }
    }

    pub fn name(&self) -> &str {
        self.as_device().name()
    }
}
