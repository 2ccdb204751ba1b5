//! Controller protocol tables.
//!
//! These are wire contracts of the motion controller, not internal choices:
//! the batched status query returns its values in [`STATUS_ITEMS`] order, and
//! each packed status word is decoded with the masks below. Do not reorder or
//! renumber any entry independently of the controller's documented bit layout.
//!
//! Table revision: [`PROTOCOL_REVISION`].

use bitflags::bitflags;
use static_assertions::const_assert_eq;

/// Revision of the bit layout tables in this module.
pub const PROTOCOL_REVISION: u32 = 1;

// ─── Status Query Items ─────────────────────────────────────────────

/// Axis status item identifiers understood by the batched status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StatusItem {
    AxisStatus = 0,
    DriveStatus = 1,
    ProgramPositionCommand = 2,
    ProgramPositionFeedback = 3,
    ProgramVelocityCommand = 4,
    ProgramVelocityFeedback = 5,
    AxisFault = 6,
}

/// Number of items in one status query.
pub const STATUS_ITEM_COUNT: usize = 7;

/// Fixed query order. Result slot `i` holds the value of `STATUS_ITEMS[i]`.
pub const STATUS_ITEMS: [StatusItem; STATUS_ITEM_COUNT] = [
    StatusItem::AxisStatus,
    StatusItem::DriveStatus,
    StatusItem::ProgramPositionCommand,
    StatusItem::ProgramPositionFeedback,
    StatusItem::ProgramVelocityCommand,
    StatusItem::ProgramVelocityFeedback,
    StatusItem::AxisFault,
];

const_assert_eq!(STATUS_ITEMS.len(), STATUS_ITEM_COUNT);

impl StatusItem {
    /// Slot of this item in a status result array.
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }
}

// ─── Axis Parameters ────────────────────────────────────────────────

/// Per-axis parameters read or written through the parameter interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisParameter {
    /// Non-zero when motor direction is reversed.
    ReverseMotionDirection,
    /// Encoder counts per user unit.
    CountsPerUnit,
    /// Non-zero when software limits are enforced.
    SoftwareLimitSetup,
    /// Upper software limit [user units].
    SoftwareLimitHigh,
    /// Lower software limit [user units].
    SoftwareLimitLow,
    /// Bit `i` set when axis `i` is mechanically coupled to this one.
    GantryAxisMask,
}

impl AxisParameter {
    /// Controller-side parameter name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReverseMotionDirection => "ReverseMotionDirection",
            Self::CountsPerUnit => "CountsPerUnit",
            Self::SoftwareLimitSetup => "SoftwareLimitSetup",
            Self::SoftwareLimitHigh => "SoftwareLimitHigh",
            Self::SoftwareLimitLow => "SoftwareLimitLow",
            Self::GantryAxisMask => "GantryAxisMask",
        }
    }
}

/// Drive items read directly from the drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriveItem {
    /// Raw position of the primary BiSS absolute encoder [counts].
    PrimaryBissAbsolutePosition,
}

// ─── Status Word Layouts ────────────────────────────────────────────

bitflags! {
    /// Axis status word layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisStatusBits: u32 {
        const HOMED                  = 1 << 0;
        const PROFILING              = 1 << 1;
        const HOMING                 = 1 << 4;
        const JOGGING                = 1 << 8;
        const NOT_VIRTUAL            = 1 << 13;
        const CALIBRATION_ENABLED_1D = 1 << 14;
        const CALIBRATION_ENABLED_2D = 1 << 15;
        const MOTION_DONE            = 1 << 22;
        const MOTION_CLAMPED         = 1 << 23;
        const GANTRY_ALIGNED         = 1 << 24;
    }
}

bitflags! {
    /// Drive status word layout.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DriveStatusBits: u32 {
        const ENABLED                       = 1 << 0;
        const CW_END_OF_TRAVEL_LIMIT_INPUT  = 1 << 1;
        const CCW_END_OF_TRAVEL_LIMIT_INPUT = 1 << 2;
        const EMERGENCY_STOP_INPUT          = 1 << 10;
        const MOVE_ACTIVE                   = 1 << 26;
        const ACCELERATION_PHASE            = 1 << 27;
        const DECELERATION_PHASE            = 1 << 28;
    }
}

bitflags! {
    /// Axis fault word layout.
    ///
    /// Bits 18–21, 29 and 31 are reserved by the controller.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AxisFaultBits: u32 {
        const POSITION_ERROR         = 1 << 0;
        const OVER_CURRENT           = 1 << 1;
        const CW_END_OF_TRAVEL_LIMIT = 1 << 2;
        const CCW_END_OF_TRAVEL_LIMIT = 1 << 3;
        const CW_SOFTWARE_LIMIT      = 1 << 4;
        const CCW_SOFTWARE_LIMIT     = 1 << 5;
        const AMPLIFIER              = 1 << 6;
        const FEEDBACK_INPUT_0       = 1 << 7;
        const FEEDBACK_INPUT_1       = 1 << 8;
        const HALL_SENSOR            = 1 << 9;
        const MAX_VELOCITY_COMMAND   = 1 << 10;
        const EMERGENCY_STOP         = 1 << 11;
        const VELOCITY_ERROR         = 1 << 12;
        const COMMUTATION            = 1 << 13;
        const EXTERNAL               = 1 << 14;
        const MOTOR_TEMPERATURE      = 1 << 15;
        const AMPLIFIER_TEMPERATURE  = 1 << 16;
        const ENCODER                = 1 << 17;
        const GANTRY_MISALIGNMENT    = 1 << 22;
        const FEEDBACK_SCALING       = 1 << 23;
        const MARKER_SEARCH          = 1 << 24;
        const SAFE_ZONE              = 1 << 25;
        const IN_POSITION_TIMEOUT    = 1 << 26;
        const VOLTAGE_CLAMP          = 1 << 27;
        const MOTOR_SUPPLY           = 1 << 28;
        const INTERNAL               = 1 << 30;
    }
}

const_assert_eq!(AxisStatusBits::all().bits().count_ones(), 10);
const_assert_eq!(DriveStatusBits::all().bits().count_ones(), 7);
const_assert_eq!(AxisFaultBits::all().bits().count_ones(), 26);
