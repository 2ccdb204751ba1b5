//! Simulation driver module.
//!
//! Software model of the motion controller for development and testing
//! without hardware. Axes are declared in `[driver_config.simulation]`.

mod axis;
mod config;
mod driver;

pub use axis::SimAxis;
pub use config::{SimAxisConfig, SimulationConfig};
pub use driver::SimulationDriver;

use a1_common::driver::ControllerDriver;

/// Factory function to create a simulation driver instance.
pub fn create_driver() -> Box<dyn ControllerDriver> {
    Box::new(SimulationDriver::new())
}
