//! Simulation driver configuration.
//!
//! Read from the `[driver_config.simulation]` section of the server config.
//!
//! ```toml
//! [driver_config.simulation]
//! api_version = "2.11.0"
//!
//! [[driver_config.simulation.axes]]
//! name = "X"
//! counts_per_unit = 1000.0
//! positive_travel = 100.0
//! negative_travel = -100.0
//! ```

use a1_common::config::ConfigError;
use a1_common::consts::MAX_AXES;
use a1_common::driver::ApiVersion;
use serde::{Deserialize, Serialize};

fn default_api_version() -> String {
    "2.11.0".to_string()
}

fn default_counts_per_unit() -> f64 {
    1000.0
}

fn default_acceleration() -> f64 {
    100.0
}

/// Driver-wide simulation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Reported driver library version, `major.minor.patch`.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Simulated axes, assigned indices in declaration order.
    #[serde(default)]
    pub axes: Vec<SimAxisConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            axes: Vec::new(),
        }
    }
}

/// One simulated axis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimAxisConfig {
    pub name: String,

    #[serde(default = "default_counts_per_unit")]
    pub counts_per_unit: f64,

    #[serde(default)]
    pub reverse_motion_direction: f64,

    #[serde(default)]
    pub gantry_axis_mask: u64,

    #[serde(default)]
    pub software_limit_setup: f64,

    #[serde(default)]
    pub software_limit_high: f64,

    #[serde(default)]
    pub software_limit_low: f64,

    /// Ramp rate [user units/s²].
    #[serde(default = "default_acceleration")]
    pub acceleration: f64,

    /// Position of the positive end-of-travel switch, if any.
    #[serde(default)]
    pub positive_travel: Option<f64>,

    /// Position of the negative end-of-travel switch, if any.
    #[serde(default)]
    pub negative_travel: Option<f64>,

    /// Position reported by the absolute encoder at program position 0.
    #[serde(default)]
    pub encoder_offset: f64,

    /// Fault word present at start-up.
    #[serde(default)]
    pub initial_fault: u32,

    /// Start with the drive enabled.
    #[serde(default)]
    pub enabled: bool,
}

impl SimAxisConfig {
    /// A default axis named `name`.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            counts_per_unit: default_counts_per_unit(),
            reverse_motion_direction: 0.0,
            gantry_axis_mask: 0,
            software_limit_setup: 0.0,
            software_limit_high: 0.0,
            software_limit_low: 0.0,
            acceleration: default_acceleration(),
            positive_travel: None,
            negative_travel: None,
            encoder_offset: 0.0,
            initial_fault: 0,
            enabled: false,
        }
    }
}

impl SimulationConfig {
    /// Parse the driver section, or defaults when absent.
    pub fn from_section(section: Option<&toml::Value>) -> Result<Self, ConfigError> {
        let config: Self = match section {
            Some(value) => value
                .clone()
                .try_into()
                .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.parse_api_version()?;
        if self.axes.len() > MAX_AXES {
            return Err(ConfigError::ValidationError(format!(
                "simulation: too many axes: {} (max {MAX_AXES})",
                self.axes.len()
            )));
        }
        for axis in &self.axes {
            if axis.name.is_empty() {
                return Err(ConfigError::ValidationError(
                    "simulation: axis name cannot be empty".to_string(),
                ));
            }
            if axis.counts_per_unit == 0.0 || !axis.counts_per_unit.is_finite() {
                return Err(ConfigError::ValidationError(format!(
                    "simulation: axis {}: counts_per_unit must be finite and non-zero",
                    axis.name
                )));
            }
            if axis.acceleration <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "simulation: axis {}: acceleration must be positive",
                    axis.name
                )));
            }
        }
        Ok(())
    }

    /// `api_version` as a version triple.
    pub fn parse_api_version(&self) -> Result<ApiVersion, ConfigError> {
        let invalid = || {
            ConfigError::ValidationError(format!(
                "simulation: invalid api_version '{}'",
                self.api_version
            ))
        };
        let mut parts = self.api_version.split('.').map(str::parse::<u32>);
        let mut next = || -> Result<u32, ConfigError> {
            parts.next().ok_or_else(invalid)?.map_err(|_| invalid())
        };
        let version = ApiVersion {
            major: next()?,
            minor: next()?,
            patch: next()?,
        };
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(version)
    }
}
