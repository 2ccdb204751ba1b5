//! Prelude module for common re-exports.
//!
//! # Usage
//!
//! ```rust
//! use a1_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    AxisDeviceConfig, ConfigError, ConfigLoader, ControllerConfig, EncoderDeviceConfig, LogLevel,
    ServerConfig, SharedConfig,
};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DEFAULT_MOTION_VELOCITY, ERROR_MESSAGE_CAPACITY, MAX_AXES};

// ─── Driver Contract ────────────────────────────────────────────────
pub use crate::driver::{
    ApiVersion, AxisIndex, ControllerDriver, DriverFactory, DriverResult, Rejected,
    StatusConfigId,
};

// ─── Protocol Tables ────────────────────────────────────────────────
pub use crate::protocol::{
    AxisFaultBits, AxisParameter, AxisStatusBits, DriveItem, DriveStatusBits, STATUS_ITEMS,
    STATUS_ITEM_COUNT, StatusItem,
};
