//! System-wide constants for the A1 workspace.
//!
//! Single source of truth for numeric limits and default values.

/// Maximum number of axes a controller can report (one bit per axis in a gantry mask).
pub const MAX_AXES: usize = 64;

/// Capacity of the driver's last-error text buffer, terminator included.
pub const ERROR_MESSAGE_CAPACITY: usize = 100;

/// Default target velocity for absolute moves [user units/s].
pub const DEFAULT_MOTION_VELOCITY: f64 = 5.0;

/// Default controller address.
pub const DEFAULT_IP_ADDRESS: &str = "127.0.0.1";

/// Default driver name.
pub const DEFAULT_DRIVER: &str = "simulation";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/a1/server.toml";
