//! A1 Common Library
//!
//! Shared definitions for every crate of the A1 axis server workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - System-wide constants
//! - [`protocol`] - Controller protocol lookup tables (status items, bit masks, parameter ids)
//! - [`driver`] - `ControllerDriver` trait consumed by the axis core
//! - [`config`] - Configuration loading traits and types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use a1_common::prelude::*;
//! ```

pub mod config;
pub mod consts;
pub mod driver;
pub mod prelude;
pub mod protocol;
