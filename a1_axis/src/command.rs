//! Axis command and attribute tables.
//!
//! Every command and attribute access carries a [`Precondition`] evaluated
//! against a freshly derived [`LifecycleState`]. The tables below are the
//! single source for both the allowed-check exposed to callers and the gate
//! applied inside each operation.
//!
//! | Command       | Allowed when |
//! |---------------|--------------|
//! | enable        | always       |
//! | disable       | STANDBY      |
//! | home          | STANDBY      |
//! | stop          | always       |
//! | freeRun       | STANDBY      |
//! | faultAck      | FAULT        |
//! | faultAckAll   | always       |

use crate::error::AxisError;
use crate::state::LifecycleState;

/// State requirement of a command or attribute access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Always,
    Requires(LifecycleState),
}

impl Precondition {
    #[inline]
    pub const fn permits(self, state: LifecycleState) -> bool {
        match self {
            Self::Always => true,
            Self::Requires(required) => required as u8 == state as u8,
        }
    }

    /// Whether evaluating this precondition needs a status sample at all.
    #[inline]
    pub const fn needs_state(self) -> bool {
        matches!(self, Self::Requires(_))
    }

    /// # Errors
    /// `AxisError::NotAllowed` naming `action` when `state` is not permitted.
    pub fn check(self, action: &'static str, state: LifecycleState) -> Result<(), AxisError> {
        if self.permits(state) {
            Ok(())
        } else {
            Err(AxisError::NotAllowed { action, state })
        }
    }
}

/// Motion commands of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisCommand {
    Enable,
    Disable,
    Home,
    Stop,
    FreeRun,
    FaultAck,
    FaultAckAll,
}

impl AxisCommand {
    pub const ALL: [Self; 7] = [
        Self::Enable,
        Self::Disable,
        Self::Home,
        Self::Stop,
        Self::FreeRun,
        Self::FaultAck,
        Self::FaultAckAll,
    ];

    /// Exposed command name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Home => "home",
            Self::Stop => "stop",
            Self::FreeRun => "freeRun",
            Self::FaultAck => "faultAck",
            Self::FaultAckAll => "faultAckAll",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    pub const fn precondition(self) -> Precondition {
        match self {
            Self::Enable | Self::Stop | Self::FaultAckAll => Precondition::Always,
            Self::Disable | Self::Home | Self::FreeRun => {
                Precondition::Requires(LifecycleState::Standby)
            }
            Self::FaultAck => Precondition::Requires(LifecycleState::Fault),
        }
    }

    /// True for commands taking a numeric argument.
    pub const fn takes_argument(self) -> bool {
        matches!(self, Self::FreeRun)
    }
}

/// Kind of attribute access being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrRequest {
    Read,
    Write,
}

/// Attributes exposed by an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisAttribute {
    Position,
    PositionCommand,
    MotionVelocity,
    Velocity,
    VelocityCommand,
    Accelerating,
    Faults,
    PositiveHardLimit,
    NegativeHardLimit,
    PositiveSoftLimit,
    NegativeSoftLimit,
}

impl AxisAttribute {
    pub const ALL: [Self; 11] = [
        Self::Position,
        Self::PositionCommand,
        Self::MotionVelocity,
        Self::Velocity,
        Self::VelocityCommand,
        Self::Accelerating,
        Self::Faults,
        Self::PositiveHardLimit,
        Self::NegativeHardLimit,
        Self::PositiveSoftLimit,
        Self::NegativeSoftLimit,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::PositionCommand => "position_command",
            Self::MotionVelocity => "motion_velocity",
            Self::Velocity => "velocity",
            Self::VelocityCommand => "velocity_command",
            Self::Accelerating => "accelerating",
            Self::Faults => "faults",
            Self::PositiveHardLimit => "positive_hardlimit",
            Self::NegativeHardLimit => "negative_hardlimit",
            Self::PositiveSoftLimit => "positive_softlimit",
            Self::NegativeSoftLimit => "negative_softlimit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }

    pub const fn is_writable(self) -> bool {
        matches!(
            self,
            Self::Position
                | Self::MotionVelocity
                | Self::PositiveSoftLimit
                | Self::NegativeSoftLimit
        )
    }

    /// Reads are always allowed; a position write is an absolute move and
    /// needs STANDBY.
    pub const fn precondition(self, request: AttrRequest) -> Precondition {
        match (self, request) {
            (Self::Position, AttrRequest::Write) => {
                Precondition::Requires(LifecycleState::Standby)
            }
            _ => Precondition::Always,
        }
    }
}
