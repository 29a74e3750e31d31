use crate::Property;
use std::{fmt, time::Duration};

#[derive(Debug)]
pub enum VideoError {
    Device(String),
    Stream(String),
    Decode(crates_image::ImageError),
    Unsupported(Property),
    WarmupTimeout(Duration),
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoError::Device(msg) => write!(f, "device error: {msg}"),
            VideoError::Stream(msg) => write!(f, "stream error: {msg}"),
            VideoError::Decode(err) => write!(f, "decode error: {err}"),
            VideoError::Unsupported(property) => {
                write!(f, "unsupported property: {property:?}")
            }
            VideoError::WarmupTimeout(timeout) => write!(
                f,
                "failed to grab a frame from the camera within {:.1}s; \
                 check camera permissions and that no other application is using it, \
                 then try restarting",
                timeout.as_secs_f32()
            ),
        }
    }
}

impl std::error::Error for VideoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VideoError::Decode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for VideoError {
    fn from(err: std::io::Error) -> Self {
        VideoError::Device(err.to_string())
    }
}

impl From<crates_image::ImageError> for VideoError {
    fn from(err: crates_image::ImageError) -> Self {
        VideoError::Decode(err)
    }
}

impl From<framegrab_base::TensorError> for VideoError {
    fn from(err: framegrab_base::TensorError) -> Self {
        VideoError::Stream(err.to_string())
    }
}
