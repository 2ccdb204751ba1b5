//! # A1 Axis Library
//!
//! Exposes motion-axis control of a multi-axis motion controller through a
//! precondition-gated command interface built on a polled bitmask status
//! protocol.
//!
//! ## Data Flow
//!
//! ```text
//! StatusSampler ──► StatusDecoder ──┬──► LimitResolver
//!                                   ├──► LifecycleState (state machine)
//!                                   └──► fault text
//!
//! Axis (command gate) ──► LifecycleState ──► SharedController (driver)
//!                    └──► GantryGroup (fault-acknowledge cascade)
//! ```
//!
//! ## Locking
//!
//! A single mutex inside [`handle::SharedController`] serializes every
//! hardware-facing call. Each axis operation holds it across the whole
//! "sample → decode → decide → act" sequence, so a decision is never made
//! against a status read that another caller has since acted upon.

pub mod axis;
pub mod command;
pub mod controller;
pub mod encoder;
pub mod error;
pub mod gantry;
pub mod handle;
pub mod limits;
pub mod state;
pub mod status;
pub mod units;

pub use axis::{Axis, AxisHandle};
pub use command::{AttrRequest, AxisAttribute, AxisCommand, Precondition};
pub use controller::Controller;
pub use encoder::AbsoluteEncoder;
pub use error::AxisError;
pub use handle::{ControllerGuard, ControllerHandle, SharedController};
pub use state::LifecycleState;
