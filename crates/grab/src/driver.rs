//! Format and frame-rate negotiation for drivers that stream through mapped buffers.
//!
//! Such drivers refuse format or parameter changes while buffers are mapped,
//! so every change unmaps the stream first. When the driver then refuses the
//! change, the previous settings are applied again and the stream is remapped,
//! leaving the device usable.

#![cfg_attr(not(feature = "v4l2"), allow(dead_code))]

use crate::VideoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PixelFormat {
    Mjpeg,
    Yuyv,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Settings {
    pub format: PixelFormat,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
}

/// Raw driver operations. Format and rate changes require no mapped stream.
pub(crate) trait Driver {
    type Stream;

    /// Request a format; returns the format and size the driver chose.
    fn set_format(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<(PixelFormat, u32, u32), VideoError>;
    fn fps(&self) -> Result<f64, VideoError>;
    /// Request a frame rate; returns the rate the driver chose.
    fn set_fps(&self, fps: f64) -> Result<f64, VideoError>;
    fn map(&self) -> Result<Self::Stream, VideoError>;
}

/// A driver with its mapped stream and the settings that stream runs at.
pub(crate) struct Session<D: Driver> {
    driver: D,
    stream: Option<D::Stream>,
    settings: Settings,
}

impl<D: Driver> Session<D> {
    /// Negotiate MJPEG at the requested size, falling back to YUYV, and map the stream.
    pub fn open(driver: D, width: u32, height: u32) -> Result<Self, VideoError> {
        let settings = negotiate(&driver, width, height)?;
        let stream = driver.map()?;
        Ok(Self {
            driver,
            stream: Some(stream),
            settings,
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// The mapped stream, absent only if restoring after a refused change also failed.
    pub fn stream_mut(&mut self) -> Option<&mut D::Stream> {
        self.stream.as_mut()
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), VideoError> {
        self.reconfigure(|driver, _| negotiate(driver, width, height))
    }

    pub fn set_fps(&mut self, fps: f64) -> Result<(), VideoError> {
        self.reconfigure(|driver, current| {
            let fps = driver.set_fps(fps)?;
            Ok(Settings { fps, ..current })
        })
    }

    fn reconfigure(
        &mut self,
        change: impl FnOnce(&D, Settings) -> Result<Settings, VideoError>,
    ) -> Result<(), VideoError> {
        let previous = self.settings;
        self.stream = None;

        let outcome = change(&self.driver, previous)
            .and_then(|settings| Ok((settings, self.driver.map()?)));
        match outcome {
            Ok((settings, stream)) => {
                self.settings = settings;
                self.stream = Some(stream);
                Ok(())
            }
            Err(error) => {
                log::warn!("driver refused change ({}), restoring {:?}", error, previous);
                match restore(&self.driver, previous) {
                    Ok(stream) => self.stream = Some(stream),
                    Err(restore_error) => {
                        log::error!("could not restore previous settings: {}", restore_error)
                    }
                }
                Err(error)
            }
        }
    }
}

fn negotiate<D: Driver>(driver: &D, width: u32, height: u32) -> Result<Settings, VideoError> {
    let (mut format, mut actual_width, mut actual_height) =
        driver.set_format(PixelFormat::Mjpeg, width, height)?;
    if format != PixelFormat::Mjpeg {
        log::debug!("MJPEG refused (driver chose {:?}), trying YUYV", format);
        (format, actual_width, actual_height) = driver.set_format(PixelFormat::Yuyv, width, height)?;
    }
    if (actual_width, actual_height) != (width, height) {
        log::warn!(
            "requested {}x{}, driver chose {}x{}",
            width,
            height,
            actual_width,
            actual_height
        );
    }
    Ok(Settings {
        format,
        width: actual_width,
        height: actual_height,
        fps: driver.fps()?,
    })
}

fn restore<D: Driver>(driver: &D, settings: Settings) -> Result<D::Stream, VideoError> {
    driver.set_format(settings.format, settings.width, settings.height)?;
    if settings.fps > 0.0 {
        driver.set_fps(settings.fps)?;
    }
    driver.map()
}
