//! Status sampling and decoding.
//!
//! - [`sampler`] - One batched status query per read
//! - [`decode`] - Pure bit-unpacking of the packed status words

pub mod decode;
pub mod sampler;

pub use decode::{
    DecodedDrive, DecodedFaults, DecodedStatus, decode_axis_fault, decode_axis_status,
    decode_drive_status, render_status,
};
pub use sampler::{DecodedSample, StatusSample, StatusSampler};
