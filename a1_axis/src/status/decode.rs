//! Status word decoding.
//!
//! Each decoded field is `(word & MASK) != 0` for the fixed mask of the
//! protocol tables in `a1_common::protocol`. Decoding is total: every `u32`
//! is a valid input, and a decoded record is only ever replaced by decoding
//! a fresh sample.

use a1_common::protocol::{AxisFaultBits, AxisStatusBits, DriveStatusBits};
use serde::Serialize;

/// Declares a flat boolean record decoded from one status word.
///
/// The bracketed identifier, when present, becomes an aggregate field that is
/// true when any named bit is set.
macro_rules! decoded_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $bits:ty [$($aggregate:ident)?] {
            $( $(#[$fmeta:meta])* $field:ident = $flag:ident, $label:literal; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
        pub struct $name {
            $( pub $aggregate: bool, )?
            $( $(#[$fmeta])* pub $field: bool, )+
        }

        impl $name {
            /// Number of named fields.
            pub const COUNT: usize = [$($label),+].len();

            /// `(label, mask)` per named field, in declaration order.
            pub const TABLE: [(&'static str, $bits); Self::COUNT] = [$(($label, <$bits>::$flag)),+];

            /// Decode a raw status word.
            pub const fn decode(word: u32) -> Self {
                let bits = <$bits>::from_bits_retain(word);
                Self {
                    $( $aggregate: bits.intersects(<$bits>::all()), )?
                    $( $field: bits.contains(<$bits>::$flag), )+
                }
            }

            /// Named field values, in [`TABLE`](Self::TABLE) order.
            pub const fn values(&self) -> [bool; Self::COUNT] {
                [$(self.$field),+]
            }
        }
    };
}

decoded_record! {
    /// Conditions decoded from the axis status word.
    pub struct DecodedStatus: AxisStatusBits [] {
        homed = HOMED, "homed";
        profiling = PROFILING, "profiling";
        homing = HOMING, "homing";
        jogging = JOGGING, "jogging";
        /// Clear for virtual axes.
        not_virtual = NOT_VIRTUAL, "not_virtual";
        motion_done = MOTION_DONE, "motion_done";
        motion_clamped = MOTION_CLAMPED, "motion_clamped";
        gantry_aligned = GANTRY_ALIGNED, "gantry_aligned";
        calibration_enabled_1d = CALIBRATION_ENABLED_1D, "calibration_enabled_1d";
        calibration_enabled_2d = CALIBRATION_ENABLED_2D, "calibration_enabled_2d";
    }
}

decoded_record! {
    /// Conditions decoded from the drive status word.
    pub struct DecodedDrive: DriveStatusBits [] {
        enabled = ENABLED, "enable";
        /// Raw clockwise end-of-travel input; see `limits` for polarity.
        cw_limit_input = CW_END_OF_TRAVEL_LIMIT_INPUT, "cw_end_of_travel_limit_input";
        ccw_limit_input = CCW_END_OF_TRAVEL_LIMIT_INPUT, "ccw_end_of_travel_limit_input";
        emergency_stop_input = EMERGENCY_STOP_INPUT, "emergency_stop_input";
        accelerating = ACCELERATION_PHASE, "accelerating";
        decelerating = DECELERATION_PHASE, "decelerating";
        move_active = MOVE_ACTIVE, "move_active";
    }
}

decoded_record! {
    /// Faults decoded from the axis fault word.
    ///
    /// `any_fault` is set iff at least one named fault bit is set; reserved
    /// bits do not count.
    pub struct DecodedFaults: AxisFaultBits [any_fault] {
        position_error = POSITION_ERROR, "Position Error Fault";
        over_current = OVER_CURRENT, "Over Current Fault";
        cw_end_of_travel_limit = CW_END_OF_TRAVEL_LIMIT, "CW End Of Travel Limit Fault";
        ccw_end_of_travel_limit = CCW_END_OF_TRAVEL_LIMIT, "CCW End Of Travel Limit Fault";
        cw_software_limit = CW_SOFTWARE_LIMIT, "CW Software Limit Fault";
        ccw_software_limit = CCW_SOFTWARE_LIMIT, "CCW Software Limit Fault";
        amplifier = AMPLIFIER, "Amplifier Fault";
        feedback_input_0 = FEEDBACK_INPUT_0, "Feedback Input 0 Fault";
        feedback_input_1 = FEEDBACK_INPUT_1, "Feedback Input 1 Fault";
        hall_sensor = HALL_SENSOR, "Hall Sensor Fault";
        max_velocity_command = MAX_VELOCITY_COMMAND, "Max Velocity Command Fault";
        emergency_stop = EMERGENCY_STOP, "Emergency Stop Fault";
        velocity_error = VELOCITY_ERROR, "Velocity Error Fault";
        commutation = COMMUTATION, "Commutation Fault";
        external = EXTERNAL, "External Fault";
        motor_temperature = MOTOR_TEMPERATURE, "Motor Temperature Fault";
        amplifier_temperature = AMPLIFIER_TEMPERATURE, "Amplifier Temperature Fault";
        encoder = ENCODER, "Encoder Fault";
        gantry_misalignment = GANTRY_MISALIGNMENT, "Gantry Misalignment Fault";
        feedback_scaling = FEEDBACK_SCALING, "Feedback Scaling Fault";
        marker_search = MARKER_SEARCH, "Marker Search Fault";
        safe_zone = SAFE_ZONE, "Safe Zone Fault";
        in_position_timeout = IN_POSITION_TIMEOUT, "In Position Timeout Fault";
        voltage_clamp = VOLTAGE_CLAMP, "Voltage Clamp Fault";
        motor_supply = MOTOR_SUPPLY, "Motor Supply Fault";
        internal = INTERNAL, "Internal Fault";
    }
}

impl DecodedFaults {
    /// Labels of all active faults.
    pub fn active(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::TABLE
            .into_iter()
            .zip(self.values())
            .filter_map(|((label, _), set)| set.then_some(label))
    }

    /// One line per active fault, empty when none.
    pub fn render(&self) -> String {
        self.active().fold(String::new(), |mut text, label| {
            text.push_str(label);
            text.push('\n');
            text
        })
    }
}

#[inline]
pub const fn decode_axis_status(word: u32) -> DecodedStatus {
    DecodedStatus::decode(word)
}

#[inline]
pub const fn decode_drive_status(word: u32) -> DecodedDrive {
    DecodedDrive::decode(word)
}

#[inline]
pub const fn decode_axis_fault(word: u32) -> DecodedFaults {
    DecodedFaults::decode(word)
}

/// Multi-line `name: value` dump of drive and axis status.
///
/// Drive fields come first, then axis status fields; `move_active` closes
/// the dump.
pub fn render_status(drive: &DecodedDrive, status: &DecodedStatus) -> String {
    const MOVE_ACTIVE: &str = "move_active";
    let drive_lines = DecodedDrive::TABLE
        .into_iter()
        .map(|(label, _)| label)
        .zip(drive.values());
    let status_lines = DecodedStatus::TABLE
        .into_iter()
        .map(|(label, _)| label)
        .zip(status.values());
    drive_lines
        .clone()
        .filter(|(label, _)| *label != MOVE_ACTIVE)
        .chain(status_lines)
        .chain(drive_lines.filter(|(label, _)| *label == MOVE_ACTIVE))
        .map(|(label, value)| format!("{label}: {value}\n"))
        .collect()
}

// ─── Tests ──────────────────────────────────────────────────────────
