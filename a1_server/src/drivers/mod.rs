//! Controller driver implementations.
//!
//! - [`simulation`] - Software controller model for development and testing
//!
//! # Adding New Drivers
//!
//! 1. Create a new submodule under `drivers/`
//! 2. Implement the `ControllerDriver` trait from `a1_common::driver`
//! 3. Register the factory in [`register_all`]

pub mod simulation;

use crate::driver_registry::DriverRegistry;

/// Register all built-in drivers.
pub fn register_all(registry: &mut DriverRegistry) {
    registry.register("simulation", simulation::create_driver);
}
