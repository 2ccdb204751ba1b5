//! Simulation driver implementation.
//!
//! The `SimulationDriver` implements the `ControllerDriver` trait with a set
//! of [`SimAxis`] models, for development and testing without a controller.
//! Simulated time advances with the wall clock on every status query.

use a1_common::config::ConfigError;
use a1_common::driver::{
    ApiVersion, AxisIndex, ControllerDriver, DriverResult, Rejected, StatusConfigId,
};
use a1_common::protocol::{AxisFaultBits, AxisParameter, DriveItem, StatusItem};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::axis::SimAxis;
use super::config::SimulationConfig;

/// Simulation driver implementing the ControllerDriver trait.
pub struct SimulationDriver {
    api_version: ApiVersion,
    axes: Vec<SimAxis>,
    connected: Option<String>,
    /// Status query configurations: id → (axis, item order).
    configs: HashMap<u32, (AxisIndex, Vec<StatusItem>)>,
    next_config: u32,
    last_error: String,
    last_tick: Option<Instant>,
}

impl SimulationDriver {
    /// Create a driver with no axes. Axes come from [`ControllerDriver::init`].
    pub fn new() -> Self {
        Self {
            api_version: ApiVersion {
                major: 0,
                minor: 0,
                patch: 0,
            },
            axes: Vec::new(),
            connected: None,
            configs: HashMap::new(),
            next_config: 1,
            last_error: String::new(),
            last_tick: None,
        }
    }

    /// Create a driver directly from a parsed configuration.
    pub fn from_config(config: SimulationConfig) -> Result<Self, ConfigError> {
        let mut driver = Self::new();
        driver.apply(config)?;
        Ok(driver)
    }

    fn apply(&mut self, config: SimulationConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.api_version = config.parse_api_version()?;
        self.axes = config.axes.into_iter().map(SimAxis::new).collect();
        info!(
            "Simulation driver initialized with {} axes, api {}",
            self.axes.len(),
            self.api_version
        );
        Ok(())
    }

    /// Simulated axis at `index`.
    pub fn axis(&self, index: AxisIndex) -> Option<&SimAxis> {
        self.axes.get(index as usize)
    }

    /// Raise a fault on one axis, as a drive would.
    pub fn inject_fault(&mut self, index: AxisIndex, fault: AxisFaultBits) {
        if let Some(axis) = self.axes.get_mut(index as usize) {
            axis.raise(fault);
        }
    }

    /// Advance every axis by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        let dt = dt.as_secs_f64();
        for axis in &mut self.axes {
            axis.step(dt);
        }
    }

    /// Advance by the wall-clock time since the previous tick.
    fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_tick.replace(now) {
            self.advance(now.duration_since(last));
        }
    }

    fn fail<T>(&mut self, message: String) -> DriverResult<T> {
        debug!("simulation: {message}");
        self.last_error = message;
        Err(Rejected)
    }

    fn ensure_connected(&mut self) -> DriverResult<()> {
        if self.connected.is_none() {
            return self.fail("Not connected to a controller".to_string());
        }
        Ok(())
    }

    /// Connected, and every index names an existing axis.
    fn ensure_axes(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.ensure_connected()?;
        if let Some(&bad) = axes.iter().find(|&&i| i as usize >= self.axes.len()) {
            return self.fail(format!("Axis index {bad} out of range"));
        }
        Ok(())
    }

    fn ensure_arguments(&mut self, axes: &[AxisIndex], values: &[f64]) -> DriverResult<()> {
        self.ensure_axes(axes)?;
        if axes.len() != values.len() {
            return self.fail(format!(
                "Argument count mismatch: {} axes, {} values",
                axes.len(),
                values.len()
            ));
        }
        Ok(())
    }

    /// Motion needs an enabled, fault-free drive on every axis.
    fn ensure_ready(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        for &index in axes {
            let axis = &self.axes[index as usize];
            if axis.has_fault() {
                let message = format!("Axis {} has an active fault", axis.name());
                return self.fail(message);
            }
            if !axis.is_enabled() {
                let message = format!("Axis {} is disabled", axis.name());
                return self.fail(message);
            }
        }
        Ok(())
    }

    fn each(&mut self, axes: &[AxisIndex], mut f: impl FnMut(&mut SimAxis)) {
        for &index in axes {
            f(&mut self.axes[index as usize]);
        }
    }
}

impl Default for SimulationDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerDriver for SimulationDriver {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn init(&mut self, section: Option<&toml::Value>) -> Result<(), ConfigError> {
        self.apply(SimulationConfig::from_section(section)?)
    }

    // ─── Connection ─────────────────────────────────────────────────

    fn connect(&mut self, host: &str) -> DriverResult<()> {
        if host.trim().is_empty() {
            return self.fail(format!("Invalid controller address '{host}'"));
        }
        info!("Simulation controller connected at {host}");
        self.connected = Some(host.to_string());
        self.last_tick = Some(Instant::now());
        Ok(())
    }

    fn disconnect(&mut self) {
        if let Some(host) = self.connected.take() {
            info!("Simulation controller at {host} disconnected");
        }
        self.configs.clear();
    }

    fn is_connected(&self) -> bool {
        self.connected.is_some()
    }

    fn api_version(&self) -> ApiVersion {
        self.api_version
    }

    fn is_running(&mut self) -> DriverResult<bool> {
        self.ensure_connected()?;
        Ok(true)
    }

    fn available_axis_count(&mut self) -> DriverResult<u32> {
        self.ensure_connected()?;
        Ok(self.axes.len() as u32)
    }

    fn axis_index(&mut self, name: &str) -> DriverResult<AxisIndex> {
        self.ensure_connected()?;
        match self.axes.iter().position(|axis| axis.name() == name) {
            Some(index) => Ok(index as AxisIndex),
            None => self.fail(format!("Axis name '{name}' not found")),
        }
    }

    // ─── Status ─────────────────────────────────────────────────────

    fn create_status_config(
        &mut self,
        axis: AxisIndex,
        items: &[StatusItem],
    ) -> DriverResult<StatusConfigId> {
        self.ensure_axes(&[axis])?;
        let id = self.next_config;
        self.next_config += 1;
        self.configs.insert(id, (axis, items.to_vec()));
        Ok(StatusConfigId(id))
    }

    fn destroy_status_config(&mut self, config: StatusConfigId) {
        self.configs.remove(&config.0);
    }

    fn status_results(&mut self, config: StatusConfigId, out: &mut [f64]) -> DriverResult<()> {
        self.ensure_connected()?;
        let Some((axis, items)) = self.configs.get(&config.0).cloned() else {
            return self.fail(format!("Unknown status configuration {}", config.0));
        };
        if out.len() != items.len() {
            return self.fail(format!(
                "Result buffer holds {} values, query has {}",
                out.len(),
                items.len()
            ));
        }
        self.tick();
        self.axes[axis as usize].sample(&items, out);
        Ok(())
    }

    // ─── Parameters ─────────────────────────────────────────────────

    fn axis_parameter(&mut self, axis: AxisIndex, parameter: AxisParameter) -> DriverResult<f64> {
        self.ensure_axes(&[axis])?;
        Ok(self.axes[axis as usize].parameter(parameter))
    }

    fn set_axis_parameter(
        &mut self,
        axis: AxisIndex,
        parameter: AxisParameter,
        value: f64,
    ) -> DriverResult<()> {
        self.ensure_axes(&[axis])?;
        if parameter == AxisParameter::CountsPerUnit && (value == 0.0 || !value.is_finite()) {
            return self.fail(format!("Invalid {} value {value}", parameter.name()));
        }
        debug!("simulation: axis {axis} {} = {value}", parameter.name());
        self.axes[axis as usize].set_parameter(parameter, value);
        Ok(())
    }

    fn drive_item(&mut self, axis: AxisIndex, item: DriveItem) -> DriverResult<f64> {
        self.ensure_axes(&[axis])?;
        match item {
            DriveItem::PrimaryBissAbsolutePosition => Ok(self.axes[axis as usize].absolute_counts()),
        }
    }

    // ─── Motion Commands ────────────────────────────────────────────

    fn enable(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.ensure_axes(axes)?;
        let faulted = axes
            .iter()
            .map(|&i| &self.axes[i as usize])
            .find(|axis| axis.has_fault())
            .map(|axis| axis.name().to_string());
        if let Some(name) = faulted {
            return self.fail(format!(
                "Axis {name} cannot be enabled while a fault is active"
            ));
        }
        self.each(axes, SimAxis::enable);
        Ok(())
    }

    fn disable(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.ensure_axes(axes)?;
        self.each(axes, SimAxis::disable);
        Ok(())
    }

    fn home_async(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.ensure_axes(axes)?;
        self.ensure_ready(axes)?;
        self.each(axes, SimAxis::home);
        Ok(())
    }

    fn freerun_stop(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.ensure_axes(axes)?;
        self.each(axes, SimAxis::stop);
        Ok(())
    }

    fn freerun(&mut self, axes: &[AxisIndex], velocities: &[f64]) -> DriverResult<()> {
        self.ensure_arguments(axes, velocities)?;
        self.ensure_ready(axes)?;
        for (&index, &velocity) in axes.iter().zip(velocities) {
            self.axes[index as usize].freerun(velocity);
        }
        Ok(())
    }

    fn move_absolute(
        &mut self,
        axes: &[AxisIndex],
        positions: &[f64],
        velocities: &[f64],
    ) -> DriverResult<()> {
        self.ensure_arguments(axes, positions)?;
        self.ensure_arguments(axes, velocities)?;
        self.ensure_ready(axes)?;
        for ((&index, &target), &speed) in axes.iter().zip(positions).zip(velocities) {
            self.axes[index as usize].move_absolute(target, speed);
        }
        Ok(())
    }

    fn fault_acknowledge(&mut self, axes: &[AxisIndex]) -> DriverResult<()> {
        self.ensure_axes(axes)?;
        self.each(axes, SimAxis::acknowledge);
        Ok(())
    }

    fn acknowledge_all(&mut self) -> DriverResult<()> {
        self.ensure_connected()?;
        for axis in &mut self.axes {
            axis.acknowledge();
        }
        Ok(())
    }

    // ─── Diagnostics ────────────────────────────────────────────────

    fn last_error_message(&self) -> String {
        self.last_error.clone()
    }
}
