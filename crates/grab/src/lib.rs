//! Background camera capture for the framegrab workspace.
//!
//! [`AsyncCapture`] runs a worker thread that keeps pulling frames from a
//! [`CaptureDevice`] and stores the latest one, so consumers can fetch a
//! frame without waiting on device I/O. Frames are `Tensor<u8>` in HWC
//! layout `[height, width, 3]`.

pub mod config;
pub mod convert;
pub mod device;
mod driver;
pub mod error;
pub mod reader;
pub mod testpattern;

#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use config::{CaptureConfig, Source};
pub use device::{CaptureDevice, Property};
pub use error::VideoError;
pub use reader::AsyncCapture;
pub use testpattern::TestPattern;

#[cfg(feature = "v4l2")]
pub use v4l2::V4l2Device;
