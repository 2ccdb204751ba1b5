//! Axis lifecycle state.
//!
//! The state is observed, never stored: every caller derives it from a fresh
//! sample because the controller changes state on its own (operator, limit
//! switch, fault) between any two checks.
//!
//! ## Derivation (first match wins)
//!
//! ```text
//! any fault            → Fault
//! drive not enabled    → Disabled
//! homing               → Moving
//! motion done          → Standby
//! otherwise            → Moving
//! ```
//!
//! Fault dominates everything, and a disabled axis is never reported as
//! standby even when motion-done happens to be set. Do not reorder.

use serde::Serialize;
use std::fmt;

use crate::status::{DecodedDrive, DecodedFaults, DecodedStatus};

/// Coarse operational mode of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LifecycleState {
    /// At least one axis fault is active.
    Fault,
    /// Drive is not enabled.
    Disabled,
    /// Homing, jogging, free-running or executing a move.
    Moving,
    /// Enabled, idle and ready for a command.
    Standby,
}

impl LifecycleState {
    /// Derive the state from one decoded sample.
    pub const fn derive(
        status: &DecodedStatus,
        drive: &DecodedDrive,
        faults: &DecodedFaults,
    ) -> Self {
        if faults.any_fault {
            Self::Fault
        } else if !drive.enabled {
            Self::Disabled
        } else if status.homing {
            Self::Moving
        } else if status.motion_done {
            Self::Standby
        } else {
            Self::Moving
        }
    }

    /// Upper-case name as reported to operators.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fault => "FAULT",
            Self::Disabled => "DISABLE",
            Self::Moving => "MOVING",
            Self::Standby => "STANDBY",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
