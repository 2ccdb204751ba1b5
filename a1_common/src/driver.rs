//! Controller driver trait and result types.
//!
//! This module defines:
//! - `ControllerDriver` trait - Interface to one motion controller connection
//! - `Rejected` - The failure returned by any driver call
//! - `DriverFactory` type alias - Factory function type
//! - `ApiVersion` - Driver library version triple

use crate::config::ConfigError;
use crate::protocol::{AxisParameter, DriveItem, StatusItem};
use std::fmt;
use thiserror::Error;

/// Controller-assigned axis index.
pub type AxisIndex = u8;

/// A driver call returned failure.
///
/// Carries no text: the reason is fetched afterwards through
/// [`ControllerDriver::last_error_message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("controller rejected the call")]
pub struct Rejected;

/// Result of a single driver call.
pub type DriverResult<T> = Result<T, Rejected>;

/// Factory function type for creating driver instances.
pub type DriverFactory = fn() -> Box<dyn ControllerDriver>;

/// Opaque handle of a status query configuration created on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusConfigId(pub u32);

/// Version of the driver library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Trait defining the interface to a motion controller.
///
/// One driver instance is owned by the shared controller handle and is only
/// ever called while its mutex is held, so implementations need no internal
/// locking. All calls are synchronous; lock hold time equals the driver
/// round trip.
///
/// # Failure contract
///
/// Every fallible call returns [`Rejected`]. The caller then fetches the
/// diagnostic text with [`last_error_message`](Self::last_error_message).
/// No call is retried by the axis core.
pub trait ControllerDriver: Send {
    /// Returns the driver's unique identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// Apply the driver-specific configuration section, if any.
    ///
    /// Called once by the registry owner before `connect()`.
    fn init(&mut self, _section: Option<&toml::Value>) -> Result<(), ConfigError> {
        Ok(())
    }

    // ─── Connection ─────────────────────────────────────────────────

    /// Open the connection to the controller at `host`.
    fn connect(&mut self, host: &str) -> DriverResult<()>;

    /// Close the connection. No-op when not connected.
    fn disconnect(&mut self);

    /// True while a live connection exists.
    fn is_connected(&self) -> bool;

    /// Version of the driver library (no connection required).
    fn api_version(&self) -> ApiVersion;

    /// True when the controller is running its task engine.
    fn is_running(&mut self) -> DriverResult<bool>;

    /// Number of axes available on the controller.
    fn available_axis_count(&mut self) -> DriverResult<u32>;

    /// Resolve an axis index from its configured name.
    fn axis_index(&mut self, name: &str) -> DriverResult<AxisIndex>;

    // ─── Status ─────────────────────────────────────────────────────

    /// Create a status query bound to `axis` and the given item order.
    fn create_status_config(
        &mut self,
        axis: AxisIndex,
        items: &[StatusItem],
    ) -> DriverResult<StatusConfigId>;

    /// Release a status query configuration.
    fn destroy_status_config(&mut self, config: StatusConfigId);

    /// Run one batched query. `out[i]` receives the value of item `i`.
    fn status_results(&mut self, config: StatusConfigId, out: &mut [f64]) -> DriverResult<()>;

    // ─── Parameters ─────────────────────────────────────────────────

    /// Read a per-axis parameter.
    fn axis_parameter(&mut self, axis: AxisIndex, parameter: AxisParameter) -> DriverResult<f64>;

    /// Write a per-axis parameter.
    fn set_axis_parameter(
        &mut self,
        axis: AxisIndex,
        parameter: AxisParameter,
        value: f64,
    ) -> DriverResult<()>;

    /// Read a raw drive item.
    fn drive_item(&mut self, axis: AxisIndex, item: DriveItem) -> DriverResult<f64>;

    // ─── Motion Commands ────────────────────────────────────────────

    fn enable(&mut self, axes: &[AxisIndex]) -> DriverResult<()>;

    fn disable(&mut self, axes: &[AxisIndex]) -> DriverResult<()>;

    /// Start homing and return without waiting for completion.
    fn home_async(&mut self, axes: &[AxisIndex]) -> DriverResult<()>;

    fn freerun_stop(&mut self, axes: &[AxisIndex]) -> DriverResult<()>;

    /// Constant-velocity motion, one velocity per axis.
    fn freerun(&mut self, axes: &[AxisIndex], velocities: &[f64]) -> DriverResult<()>;

    /// Absolute move, one target and one velocity per axis.
    fn move_absolute(
        &mut self,
        axes: &[AxisIndex],
        positions: &[f64],
        velocities: &[f64],
    ) -> DriverResult<()>;

    fn fault_acknowledge(&mut self, axes: &[AxisIndex]) -> DriverResult<()>;

    /// Acknowledge faults on every axis of the controller.
    fn acknowledge_all(&mut self) -> DriverResult<()>;

    // ─── Diagnostics ────────────────────────────────────────────────

    /// Text of the most recent failure.
    ///
    /// The controller fills a buffer of `ERROR_MESSAGE_CAPACITY` bytes, so
    /// longer messages are cut by the caller.
    fn last_error_message(&self) -> String;
}
