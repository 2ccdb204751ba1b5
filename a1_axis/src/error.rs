//! Axis error taxonomy.
//!
//! Decoding and state derivation never fail; only hardware I/O can. A failed
//! call surfaces once and the operation ends: nothing here retries.

use a1_common::consts::ERROR_MESSAGE_CAPACITY;
use a1_common::driver::{ControllerDriver, DriverResult};
use thiserror::Error;
use tracing::error;

use crate::state::LifecycleState;

/// Errors reported by axis, encoder and controller entities.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AxisError {
    /// No live controller connection. Fatal to the attempted operation only;
    /// the entity stays usable once the controller reconnects.
    #[error("{operation}: controller not connected")]
    NotConnected { operation: &'static str },

    /// The controller refused a call. The command is a no-op; no state
    /// change is assumed.
    #[error("{operation}: controller rejected the call: {message}")]
    DriverRejected {
        operation: &'static str,
        message: String,
    },

    /// A required device property is absent.
    #[error("required property '{0}' not configured")]
    ConfigurationMissing(&'static str),

    /// The precondition gate refused the action before any command was issued.
    #[error("{action} not allowed in state {state}")]
    NotAllowed {
        action: &'static str,
        state: LifecycleState,
    },

    /// Establishing the controller connection failed.
    #[error("could not connect to controller at {host}: {message}")]
    ConnectionFailed { host: String, message: String },
}

/// Map a driver result into an [`AxisError`], fetching the driver's error
/// text on failure.
pub(crate) fn checked<T>(
    driver: &dyn ControllerDriver,
    operation: &'static str,
    result: DriverResult<T>,
) -> Result<T, AxisError> {
    result.map_err(|_| {
        let message = last_error(driver);
        error!(operation, %message, "controller rejected call");
        AxisError::DriverRejected { operation, message }
    })
}

/// Driver error text, cut to what fits the controller's fixed buffer.
pub(crate) fn last_error(driver: &dyn ControllerDriver) -> String {
    let mut message = driver.last_error_message();
    let limit = ERROR_MESSAGE_CAPACITY - 1;
    if message.len() > limit {
        let mut cut = limit;
        while !message.is_char_boundary(cut) {
            cut -= 1;
        }
        message.truncate(cut);
    }
    message
}
