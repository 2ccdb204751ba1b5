//! # A1 Server Library
//!
//! Drivers, device table and capability interface behind the `a1_server`
//! operator binary.
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Driver implementations (simulation)
//! - [`device`] - `Device` capability interface and entity adapters
//! - [`server`] - Device table built from configuration, state monitor
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          a1_server                             │
//! │  ┌──────────────┐   ┌──────────────┐   ┌────────────────────┐  │
//! │  │  CLI (main)  │──►│ DeviceServer │──►│  Driver Registry   │  │
//! │  └──────────────┘   └──────┬───────┘   └────────────────────┘  │
//! │                            │                                   │
//! │                            ▼                                   │
//! │             Device (Controller / Axis / Encoder)               │
//! │                            │                                   │
//! │                            ▼                                   │
//! │              a1_axis ──► ControllerDriver (trait object)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod device;
pub mod driver_registry;
pub mod drivers;
pub mod server;

pub use crate::device::{AttrValue, Device, DeviceError, DeviceKind, DeviceState};
pub use crate::driver_registry::DriverRegistry;
pub use crate::server::{DeviceServer, StateChange, StateMonitor};
