//! Axis entity: the precondition-gated command interface of one axis.
//!
//! Every operation follows the same pattern inside a single critical section:
//!
//! ```text
//! lock ──► sample ──► decode ──► derive state ──► check gate ──► act ──► unlock
//! ```
//!
//! Commands whose precondition is `Always` skip the sample. No state is
//! cached between calls; the controller is the only authority.

use a1_common::config::AxisDeviceConfig;
use a1_common::driver::{AxisIndex, ControllerDriver};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::command::{AttrRequest, AxisAttribute, AxisCommand, Precondition};
use crate::error::{AxisError, checked};
use crate::gantry::GantryGroup;
use crate::handle::{ControllerGuard, ControllerHandle};
use crate::limits::{self, HardLimits, LimitSide, Polarity};
use crate::state::LifecycleState;
use crate::status::{StatusSample, StatusSampler, render_status};

/// Resolved controller axis: index plus the configured name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisHandle {
    index: AxisIndex,
    name: String,
}

impl AxisHandle {
    /// Resolve `name` to its controller index.
    pub fn resolve(link: &mut ControllerGuard<'_>, name: &str) -> Result<Self, AxisError> {
        const OP: &str = "resolve_axis";
        let driver = link.connected(OP)?;
        let result = driver.axis_index(name);
        let index = checked(driver, OP, result)?;
        Ok(Self {
            index,
            name: name.to_string(),
        })
    }

    pub fn index(&self) -> AxisIndex {
        self.index
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Configured axis name, or `ConfigurationMissing` when absent or blank.
pub(crate) fn required_axis_name(name: Option<&str>) -> Result<&str, AxisError> {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(AxisError::ConfigurationMissing("axis_name")),
    }
}

/// One motion axis.
#[derive(Debug)]
pub struct Axis {
    device: String,
    handle: AxisHandle,
    controller: ControllerHandle,
    sampler: StatusSampler,
    motion_velocity: Mutex<f64>,
}

impl Axis {
    /// Resolve the axis and create its status query.
    ///
    /// # Errors
    /// - `ConfigurationMissing("axis_name")` when the property is absent
    /// - `NotConnected` / `DriverRejected` from the resolution calls
    pub fn new(controller: ControllerHandle, config: &AxisDeviceConfig) -> Result<Self, AxisError> {
        let name = required_axis_name(config.axis_name.as_deref())?;
        let (handle, sampler) = {
            let mut link = controller.lock();
            let handle = AxisHandle::resolve(&mut link, name)?;
            let sampler = StatusSampler::create(&mut link, handle.index())?;
            (handle, sampler)
        };
        info!(
            device = %config.device,
            axis = handle.name(),
            index = handle.index(),
            "axis initialized"
        );
        Ok(Self {
            device: config.device.clone(),
            handle,
            controller,
            sampler,
            motion_velocity: Mutex::new(config.motion_velocity),
        })
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn handle(&self) -> &AxisHandle {
        &self.handle
    }

    // ─── Critical Sections ──────────────────────────────────────────

    /// Take one status sample under the lock.
    fn sample(&self, operation: &'static str) -> Result<StatusSample, AxisError> {
        let mut link = self.controller.lock();
        self.sampler.sample(&mut link, operation)
    }

    /// Evaluate `gate`, then run `act`, all under one lock acquisition.
    fn gated<T>(
        &self,
        action: &'static str,
        gate: Precondition,
        act: impl FnOnce(&mut dyn ControllerDriver, AxisIndex) -> Result<T, AxisError>,
    ) -> Result<T, AxisError> {
        let mut link = self.controller.lock();
        if gate.needs_state() {
            let state = self.sampler.sample(&mut link, action)?.decode().state();
            gate.check(action, state)?;
        }
        let driver = link.connected(action)?;
        act(driver, self.handle.index)
    }

    fn command(
        &self,
        command: AxisCommand,
        act: impl FnOnce(&mut dyn ControllerDriver, AxisIndex) -> Result<(), AxisError>,
    ) -> Result<(), AxisError> {
        debug!(
            device = %self.device,
            axis = self.handle.name(),
            command = command.name(),
            "command"
        );
        self.gated(command.name(), command.precondition(), act)
    }

    // ─── State ──────────────────────────────────────────────────────

    /// Current lifecycle state, derived from a fresh sample.
    pub fn state(&self) -> Result<LifecycleState, AxisError> {
        Ok(self.sample("read_state")?.decode().state())
    }

    /// `name: value` dump of every drive and axis status flag.
    pub fn status_text(&self) -> Result<String, AxisError> {
        let decoded = self.sample("read_status")?.decode();
        Ok(render_status(&decoded.drive, &decoded.status))
    }

    /// Allowed-check for a command, against the current state.
    pub fn is_command_allowed(&self, command: AxisCommand) -> Result<bool, AxisError> {
        self.is_allowed(command.name(), command.precondition())
    }

    /// Allowed-check for an attribute access, against the current state.
    pub fn is_attribute_allowed(
        &self,
        attribute: AxisAttribute,
        request: AttrRequest,
    ) -> Result<bool, AxisError> {
        self.is_allowed(attribute.name(), attribute.precondition(request))
    }

    fn is_allowed(&self, action: &'static str, gate: Precondition) -> Result<bool, AxisError> {
        if !gate.needs_state() {
            return Ok(true);
        }
        Ok(gate.permits(self.sample(action)?.decode().state()))
    }

    // ─── Commands ───────────────────────────────────────────────────

    pub fn enable(&self) -> Result<(), AxisError> {
        self.command(AxisCommand::Enable, |driver, axis| {
            let result = driver.enable(&[axis]);
            checked(driver, "enable", result)
        })
    }

    pub fn disable(&self) -> Result<(), AxisError> {
        self.command(AxisCommand::Disable, |driver, axis| {
            let result = driver.disable(&[axis]);
            checked(driver, "disable", result)
        })
    }

    /// Start homing. Returns once the controller accepted the request.
    pub fn home(&self) -> Result<(), AxisError> {
        self.command(AxisCommand::Home, |driver, axis| {
            let result = driver.home_async(&[axis]);
            checked(driver, "home", result)
        })
    }

    pub fn stop(&self) -> Result<(), AxisError> {
        self.command(AxisCommand::Stop, |driver, axis| {
            let result = driver.freerun_stop(&[axis]);
            checked(driver, "stop", result)
        })
    }

    /// Constant-velocity motion at `velocity` [user units/s].
    pub fn freerun(&self, velocity: f64) -> Result<(), AxisError> {
        self.command(AxisCommand::FreeRun, |driver, axis| {
            let result = driver.freerun(&[axis], &[velocity]);
            checked(driver, "freeRun", result)
        })
    }

    /// Acknowledge the fault of this axis and of its gantry partners.
    ///
    /// The partners are attempted even when the primary acknowledge is
    /// rejected. The result is that of the primary acknowledge; a failed
    /// gantry lookup is logged and skips the cascade.
    pub fn fault_ack(&self) -> Result<(), AxisError> {
        self.command(AxisCommand::FaultAck, |driver, axis| {
            let result = driver.fault_acknowledge(&[axis]);
            let primary = checked(driver, "faultAck", result);
            let group = GantryGroup::read(driver, axis).unwrap_or_else(|e| {
                warn!(axis, error = %e, "gantry lookup failed, partners not acknowledged");
                GantryGroup::default()
            });
            let failed = group.acknowledge(driver);
            if !failed.is_empty() {
                warn!(axis, failed = ?failed.as_slice(), "gantry cascade incomplete");
            }
            primary
        })
    }

    /// Acknowledge faults on every axis of the controller.
    pub fn fault_ack_all(&self) -> Result<(), AxisError> {
        self.command(AxisCommand::FaultAckAll, |driver, _| {
            let result = driver.acknowledge_all();
            checked(driver, "faultAckAll", result)
        })
    }

    // ─── Position & Velocity ────────────────────────────────────────

    /// Program position feedback [user units].
    pub fn position(&self) -> Result<f64, AxisError> {
        Ok(self.sample("read_position")?.position_feedback)
    }

    /// Absolute move to `target` at the configured motion velocity.
    pub fn move_absolute(&self, target: f64) -> Result<(), AxisError> {
        const OP: &str = "write_position";
        let velocity = self.motion_velocity();
        debug!(
            device = %self.device,
            axis = self.handle.name(),
            target,
            velocity,
            "absolute move"
        );
        let gate = AxisAttribute::Position.precondition(AttrRequest::Write);
        self.gated(OP, gate, |driver, axis| {
            let result = driver.move_absolute(&[axis], &[target], &[velocity]);
            checked(driver, OP, result)
        })
    }

    /// Program position command (current move target) [user units].
    pub fn position_command(&self) -> Result<f64, AxisError> {
        Ok(self.sample("read_position_command")?.position_command)
    }

    /// Program velocity feedback [user units/s].
    pub fn velocity(&self) -> Result<f64, AxisError> {
        Ok(self.sample("read_velocity")?.velocity_feedback)
    }

    /// Program velocity command [user units/s].
    pub fn velocity_command(&self) -> Result<f64, AxisError> {
        Ok(self.sample("read_velocity_command")?.velocity_command)
    }

    /// Target velocity of subsequent absolute moves. Local only.
    pub fn motion_velocity(&self) -> f64 {
        *self.motion_velocity.lock()
    }

    pub fn set_motion_velocity(&self, velocity: f64) {
        debug!(device = %self.device, velocity, "motion velocity set");
        *self.motion_velocity.lock() = velocity;
    }

    pub fn accelerating(&self) -> Result<bool, AxisError> {
        Ok(self.sample("read_accelerating")?.decode().drive.accelerating)
    }

    /// One line per active fault, empty when none.
    pub fn faults(&self) -> Result<String, AxisError> {
        Ok(self.sample("read_faults")?.decode().faults.render())
    }

    // ─── Limits ─────────────────────────────────────────────────────

    /// Both hard limits, polarity-resolved, from one sample.
    pub fn hard_limits(&self) -> Result<HardLimits, AxisError> {
        const OP: &str = "read_hardlimit";
        let mut link = self.controller.lock();
        let drive = self.sampler.sample(&mut link, OP)?.decode().drive;
        let polarity = Polarity::read(link.connected(OP)?, self.handle.index)?;
        Ok(HardLimits::resolve(&drive, polarity))
    }

    pub fn hard_limit(&self, side: LimitSide) -> Result<bool, AxisError> {
        let limits = self.hard_limits()?;
        Ok(match side {
            LimitSide::Positive => limits.positive,
            LimitSide::Negative => limits.negative,
        })
    }

    /// Soft limit threshold, NaN when software limits are disabled.
    pub fn soft_limit(&self, side: LimitSide) -> Result<f64, AxisError> {
        self.gated("read_softlimit", Precondition::Always, |driver, axis| {
            limits::read_soft_limit(driver, axis, side)
        })
    }

    pub fn set_soft_limit(&self, side: LimitSide, value: f64) -> Result<(), AxisError> {
        self.gated("write_softlimit", Precondition::Always, |driver, axis| {
            limits::write_soft_limit(driver, axis, side, value)
        })
    }
}

impl Drop for Axis {
    fn drop(&mut self) {
        let mut link = self.controller.lock();
        self.sampler.release(&mut link);
    }
}
