//! Configuration loading traits and types.
//!
//! This module provides a standardized way to load the TOML device
//! configuration of the axis server.
//!
//! # Usage
//!
//! ```rust,no_run
//! use a1_common::config::{ConfigError, ConfigLoader, ServerConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = ServerConfig::load(Path::new("server.toml"))?;
//!     config.validate()?;
//!     println!("Service: {}", config.shared.service_name);
//!     Ok(())
//! }
//! ```

use crate::consts::{DEFAULT_DRIVER, DEFAULT_IP_ADDRESS, DEFAULT_MOTION_VELOCITY, MAX_AXES};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "a1-axis-server"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if `service_name` is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_ip_address() -> String {
    DEFAULT_IP_ADDRESS.to_string()
}

fn default_driver() -> String {
    DEFAULT_DRIVER.to_string()
}

fn default_controller_device() -> String {
    "a1/controller/1".to_string()
}

fn default_motion_velocity() -> f64 {
    DEFAULT_MOTION_VELOCITY
}

fn default_scale() -> f64 {
    1.0
}

/// Controller connection properties.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Device name of the controller entity.
    #[serde(default = "default_controller_device")]
    pub device: String,

    /// Controller host address.
    #[serde(default = "default_ip_address")]
    pub ip_address: String,

    /// Registered driver to use.
    #[serde(default = "default_driver")]
    pub driver: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            device: default_controller_device(),
            ip_address: default_ip_address(),
            driver: default_driver(),
        }
    }
}

/// Properties of one axis device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AxisDeviceConfig {
    /// Device name.
    pub device: String,

    /// Controller axis name. Required; absence is reported when the axis
    /// is initialized.
    #[serde(default)]
    pub axis_name: Option<String>,

    /// Initial target velocity for absolute moves [user units/s].
    #[serde(default = "default_motion_velocity")]
    pub motion_velocity: f64,
}

/// Properties of one absolute encoder device.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderDeviceConfig {
    /// Device name.
    pub device: String,

    /// Controller axis the encoder is wired to.
    #[serde(default)]
    pub axis_name: Option<String>,

    /// Multiplier applied after unit conversion.
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Subtracted after scaling [user units].
    #[serde(default)]
    pub offset: f64,
}

/// Full server configuration loaded from `server.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub shared: SharedConfig,

    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub axes: Vec<AxisDeviceConfig>,

    #[serde(default)]
    pub encoders: Vec<EncoderDeviceConfig>,

    /// Per-driver configuration sections.
    /// Key = driver name, Value = driver-specific TOML table.
    #[serde(default)]
    pub driver_config: HashMap<String, toml::Value>,
}

impl ServerConfig {
    /// Validate the server configuration.
    ///
    /// # Validation Rules
    /// 1. Shared section valid
    /// 2. `axes.len()` <= MAX_AXES
    /// 3. Device names unique and non-empty
    /// 4. Axis motion velocities finite
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        if self.axes.len() > MAX_AXES {
            return Err(ConfigError::ValidationError(format!(
                "Too many axes: {} (max {})",
                self.axes.len(),
                MAX_AXES
            )));
        }

        let mut names = HashSet::new();
        let devices = std::iter::once(self.controller.device.as_str())
            .chain(self.axes.iter().map(|a| a.device.as_str()))
            .chain(self.encoders.iter().map(|e| e.device.as_str()));
        for name in devices {
            if name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "device name cannot be empty".to_string(),
                ));
            }
            if !names.insert(name) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate device name '{name}'"
                )));
            }
        }

        if let Some(axis) = self.axes.iter().find(|a| !a.motion_velocity.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "{}: motion_velocity must be finite",
                axis.device
            )));
        }

        debug!(
            "Validated config: {} axes, {} encoders",
            self.axes.len(),
            self.encoders.len()
        );
        Ok(())
    }

    /// Driver-specific section for `driver`, if present.
    pub fn driver_section(&self, driver: &str) -> Option<&toml::Value> {
        self.driver_config.get(driver)
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}
