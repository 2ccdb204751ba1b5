//! Simulated axis.
//!
//! Models what the status protocol can observe of one axis:
//! - Drive enable and fault words
//! - Asynchronous homing (reported as homing by one sample, then done)
//! - Free-run at constant velocity and absolute moves, both ramped
//! - End-of-travel switches and software limits, which stop the axis and
//!   raise the matching fault
//!
//! Faults disable the drive. Acknowledging clears the fault word only.

use a1_common::protocol::{
    AxisFaultBits, AxisParameter, AxisStatusBits, DriveStatusBits, STATUS_ITEM_COUNT, StatusItem,
};
use tracing::{debug, trace};

use super::config::SimAxisConfig;

/// Position tolerance for arrival [user units].
const ARRIVAL_WINDOW: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Motion {
    Idle,
    /// `reported` is set once a sample has shown the homing flag.
    Homing { reported: bool },
    Freerun { velocity: f64 },
    Move { target: f64, speed: f64 },
    Stopping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ramp {
    Steady,
    Accelerating,
    Decelerating,
}

/// Physical direction of a travel limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Travel {
    Positive,
    Negative,
}

/// One simulated axis.
#[derive(Debug)]
pub struct SimAxis {
    config: SimAxisConfig,
    enabled: bool,
    homed: bool,
    position: f64,
    velocity: f64,
    velocity_command: f64,
    motion: Motion,
    ramp: Ramp,
    fault: AxisFaultBits,
}

impl SimAxis {
    pub fn new(config: SimAxisConfig) -> Self {
        Self {
            enabled: config.enabled,
            fault: AxisFaultBits::from_bits_retain(config.initial_fault),
            config,
            homed: false,
            position: 0.0,
            velocity: 0.0,
            velocity_command: 0.0,
            motion: Motion::Idle,
            ramp: Ramp::Steady,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn has_fault(&self) -> bool {
        !self.fault.is_empty()
    }

    pub fn is_idle(&self) -> bool {
        self.motion == Motion::Idle
    }

    // ─── Commands ───────────────────────────────────────────────────

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.halt();
    }

    pub fn home(&mut self) {
        self.motion = Motion::Homing { reported: false };
    }

    pub fn freerun(&mut self, velocity: f64) {
        self.motion = Motion::Freerun { velocity };
    }

    pub fn move_absolute(&mut self, target: f64, speed: f64) {
        self.motion = Motion::Move {
            target,
            speed: speed.abs(),
        };
    }

    pub fn stop(&mut self) {
        if self.motion != Motion::Idle {
            self.motion = Motion::Stopping;
        }
    }

    pub fn acknowledge(&mut self) {
        if self.has_fault() {
            debug!(axis = %self.config.name, fault = self.fault.bits(), "fault cleared");
        }
        self.fault = AxisFaultBits::empty();
    }

    /// Raise `fault`: the drive is disabled and motion ends.
    pub fn raise(&mut self, fault: AxisFaultBits) {
        debug!(axis = %self.config.name, fault = fault.bits(), "fault raised");
        self.fault |= fault;
        self.disable();
    }

    fn halt(&mut self) {
        self.motion = Motion::Idle;
        self.velocity = 0.0;
        self.velocity_command = 0.0;
        self.ramp = Ramp::Steady;
    }

    // ─── Parameters ─────────────────────────────────────────────────

    pub fn parameter(&self, parameter: AxisParameter) -> f64 {
        let c = &self.config;
        match parameter {
            AxisParameter::ReverseMotionDirection => c.reverse_motion_direction,
            AxisParameter::CountsPerUnit => c.counts_per_unit,
            AxisParameter::SoftwareLimitSetup => c.software_limit_setup,
            AxisParameter::SoftwareLimitHigh => c.software_limit_high,
            AxisParameter::SoftwareLimitLow => c.software_limit_low,
            AxisParameter::GantryAxisMask => c.gantry_axis_mask as f64,
        }
    }

    pub fn set_parameter(&mut self, parameter: AxisParameter, value: f64) {
        let c = &mut self.config;
        match parameter {
            AxisParameter::ReverseMotionDirection => c.reverse_motion_direction = value,
            AxisParameter::CountsPerUnit => c.counts_per_unit = value,
            AxisParameter::SoftwareLimitSetup => c.software_limit_setup = value,
            AxisParameter::SoftwareLimitHigh => c.software_limit_high = value,
            AxisParameter::SoftwareLimitLow => c.software_limit_low = value,
            AxisParameter::GantryAxisMask => c.gantry_axis_mask = value as u64,
        }
    }

    /// Raw BiSS absolute encoder position [counts].
    pub fn absolute_counts(&self) -> f64 {
        (self.position + self.config.encoder_offset) * self.config.counts_per_unit
    }

    // ─── Physics ────────────────────────────────────────────────────

    /// Advance the model by `dt` seconds.
    pub fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let accel = self.config.acceleration;
        let start_speed = self.velocity.abs();

        match self.motion {
            Motion::Idle | Motion::Homing { .. } => {}
            Motion::Freerun { velocity } => {
                self.velocity_command = velocity;
                self.velocity = ramp_toward(self.velocity, velocity, accel * dt);
                self.position += self.velocity * dt;
            }
            Motion::Stopping => {
                self.velocity_command = 0.0;
                self.velocity = ramp_toward(self.velocity, 0.0, accel * dt);
                self.position += self.velocity * dt;
                if self.velocity == 0.0 {
                    self.halt();
                }
            }
            Motion::Move { target, speed } => {
                let error = target - self.position;
                let stopping = self.velocity * self.velocity / (2.0 * accel);
                let desired = if error.abs() <= stopping {
                    error.signum() * (2.0 * accel * error.abs()).sqrt().min(speed)
                } else {
                    error.signum() * speed
                };
                self.velocity_command = desired;
                self.velocity = ramp_toward(self.velocity, desired, accel * dt);
                self.position += self.velocity * dt;

                let remaining = target - self.position;
                if remaining.abs() <= ARRIVAL_WINDOW || remaining.signum() != error.signum() {
                    self.position = target;
                    self.halt();
                }
            }
        }

        let end_speed = self.velocity.abs();
        self.ramp = if self.motion == Motion::Idle {
            Ramp::Steady
        } else if end_speed > start_speed {
            Ramp::Accelerating
        } else if end_speed < start_speed {
            Ramp::Decelerating
        } else {
            Ramp::Steady
        };

        self.check_limits();
        trace!(axis = %self.config.name, position = self.position, velocity = self.velocity, "step");
    }

    /// Polarity-mapped input bit and fault bit of a travel direction.
    fn limit_bits(&self, travel: Travel) -> (DriveStatusBits, AxisFaultBits) {
        let reversed = self.config.reverse_motion_direction as i64 != 0;
        match (travel, reversed) {
            (Travel::Positive, false) | (Travel::Negative, true) => (
                DriveStatusBits::CCW_END_OF_TRAVEL_LIMIT_INPUT,
                AxisFaultBits::CCW_END_OF_TRAVEL_LIMIT,
            ),
            (Travel::Positive, true) | (Travel::Negative, false) => (
                DriveStatusBits::CW_END_OF_TRAVEL_LIMIT_INPUT,
                AxisFaultBits::CW_END_OF_TRAVEL_LIMIT,
            ),
        }
    }

    fn software_limits_enabled(&self) -> bool {
        self.config.software_limit_setup as i64 != 0
    }

    /// Stop at a switch or software limit crossed while moving toward it,
    /// and raise its fault.
    fn check_limits(&mut self) {
        let c = &self.config;
        let outward = self.velocity > 0.0;
        let inward = self.velocity < 0.0;
        if let Some(end) = c.positive_travel.filter(|end| outward && self.position >= *end) {
            self.position = end;
            let (_, fault) = self.limit_bits(Travel::Positive);
            self.raise(fault);
        } else if let Some(end) = c.negative_travel.filter(|end| inward && self.position <= *end) {
            self.position = end;
            let (_, fault) = self.limit_bits(Travel::Negative);
            self.raise(fault);
        } else if self.software_limits_enabled() {
            if outward && self.position > c.software_limit_high {
                self.position = c.software_limit_high;
                self.raise(AxisFaultBits::CW_SOFTWARE_LIMIT);
            } else if inward && self.position < c.software_limit_low {
                self.position = c.software_limit_low;
                self.raise(AxisFaultBits::CCW_SOFTWARE_LIMIT);
            }
        }
    }

    // ─── Status ─────────────────────────────────────────────────────

    fn axis_status(&self) -> AxisStatusBits {
        let mut bits = AxisStatusBits::NOT_VIRTUAL;
        bits.set(AxisStatusBits::HOMED, self.homed);
        bits.set(AxisStatusBits::HOMING, matches!(self.motion, Motion::Homing { .. }));
        bits.set(
            AxisStatusBits::JOGGING,
            matches!(self.motion, Motion::Freerun { .. }),
        );
        bits.set(AxisStatusBits::PROFILING, matches!(self.motion, Motion::Move { .. }));
        bits.set(AxisStatusBits::MOTION_DONE, self.motion == Motion::Idle);
        bits.set(AxisStatusBits::GANTRY_ALIGNED, self.config.gantry_axis_mask != 0);
        bits
    }

    fn drive_status(&self) -> DriveStatusBits {
        let mut bits = DriveStatusBits::empty();
        bits.set(DriveStatusBits::ENABLED, self.enabled);
        bits.set(DriveStatusBits::MOVE_ACTIVE, self.motion != Motion::Idle);
        bits.set(
            DriveStatusBits::ACCELERATION_PHASE,
            self.ramp == Ramp::Accelerating,
        );
        bits.set(
            DriveStatusBits::DECELERATION_PHASE,
            self.ramp == Ramp::Decelerating,
        );
        let c = &self.config;
        if c.positive_travel.is_some_and(|end| self.position >= end) {
            bits |= self.limit_bits(Travel::Positive).0;
        }
        if c.negative_travel.is_some_and(|end| self.position <= end) {
            bits |= self.limit_bits(Travel::Negative).0;
        }
        bits
    }

    fn position_command(&self) -> f64 {
        match self.motion {
            Motion::Move { target, .. } => target,
            _ => self.position,
        }
    }

    /// One status sample in `items` order.
    ///
    /// A pending home is reported as homing by the first sample and
    /// completes before the next one.
    pub fn sample(&mut self, items: &[StatusItem], out: &mut [f64]) {
        if let Motion::Homing { reported: true } = self.motion {
            self.position = 0.0;
            self.homed = true;
            self.halt();
            debug!(axis = %self.config.name, "homing complete");
        }

        let mut values = [0.0; STATUS_ITEM_COUNT];
        values[StatusItem::AxisStatus.slot()] = f64::from(self.axis_status().bits());
        values[StatusItem::DriveStatus.slot()] = f64::from(self.drive_status().bits());
        values[StatusItem::ProgramPositionCommand.slot()] = self.position_command();
        values[StatusItem::ProgramPositionFeedback.slot()] = self.position;
        values[StatusItem::ProgramVelocityCommand.slot()] = self.velocity_command;
        values[StatusItem::ProgramVelocityFeedback.slot()] = self.velocity;
        values[StatusItem::AxisFault.slot()] = f64::from(self.fault.bits());
        for (slot, item) in out.iter_mut().zip(items) {
            *slot = values[item.slot()];
        }

        if let Motion::Homing { reported } = &mut self.motion {
            *reported = true;
        }
    }
}

/// Move `current` toward `target` by at most `max_change`.
fn ramp_toward(current: f64, target: f64, max_change: f64) -> f64 {
    current + (target - current).clamp(-max_change, max_change)
}
