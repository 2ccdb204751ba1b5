//! Shared controller handle.
//!
//! One `SharedController` owns the live driver connection. Every entity
//! (axes, encoders, the controller entity) receives a clone of the same
//! [`ControllerHandle`] at construction and reaches the driver only through
//! [`SharedController::lock`]. The returned guard is the critical section:
//! it is released on every exit path, errors included, when it drops.

use a1_common::driver::ControllerDriver;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

use crate::error::AxisError;

/// Reference-counted handle passed to every hardware-facing entity.
pub type ControllerHandle = Arc<SharedController>;

/// The single, mutex-guarded controller connection.
pub struct SharedController {
    driver_name: &'static str,
    driver: Mutex<Box<dyn ControllerDriver>>,
}

impl SharedController {
    /// Wrap a driver into a shareable handle.
    pub fn new(driver: Box<dyn ControllerDriver>) -> ControllerHandle {
        Arc::new(Self {
            driver_name: driver.name(),
            driver: Mutex::new(driver),
        })
    }

    /// Name of the wrapped driver.
    pub fn driver_name(&self) -> &'static str {
        self.driver_name
    }

    /// Enter the critical section. Blocks while another caller holds it.
    ///
    /// There is no timeout: a hung driver call stalls every caller.
    pub fn lock(&self) -> ControllerGuard<'_> {
        ControllerGuard {
            driver: self.driver.lock(),
        }
    }
}

impl std::fmt::Debug for SharedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedController")
            .field("driver", &self.driver_name)
            .finish_non_exhaustive()
    }
}

/// Exclusive access to the driver for the lifetime of the guard.
pub struct ControllerGuard<'a> {
    driver: MutexGuard<'a, Box<dyn ControllerDriver>>,
}

impl ControllerGuard<'_> {
    /// True while the driver holds a live connection.
    pub fn is_connected(&self) -> bool {
        self.driver.is_connected()
    }

    /// The driver, provided a connection exists.
    ///
    /// # Errors
    /// `AxisError::NotConnected` naming `operation` otherwise.
    pub fn connected(
        &mut self,
        operation: &'static str,
    ) -> Result<&mut dyn ControllerDriver, AxisError> {
        if !self.driver.is_connected() {
            return Err(AxisError::NotConnected { operation });
        }
        Ok(self.driver.as_mut())
    }

    /// The driver regardless of connection state (connect, teardown).
    pub fn driver(&mut self) -> &mut dyn ControllerDriver {
        self.driver.as_mut()
    }
}
