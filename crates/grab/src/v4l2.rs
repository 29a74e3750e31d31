use {
    crate::{
        driver::{Driver, PixelFormat, Session},
        *,
    },
    framegrab_base::Tensor,
    v4l::{
        Device, Format, FourCC,
        buffer::Type,
        fraction::Fraction,
        io::{mmap::Stream as MmapStream, traits::CaptureStream},
        video::{Capture, capture::Parameters},
    },
};

// number of mmap buffers queued with the driver
const BUFFER_COUNT: u32 = 4;

// frame intervals are expressed in 1/FPS_SCALE seconds
const FPS_SCALE: u32 = 1000;

fn fourcc(format: PixelFormat) -> FourCC {
    match format {
        PixelFormat::Mjpeg => FourCC::new(b"MJPG"),
        PixelFormat::Yuyv => FourCC::new(b"YUYV"),
    }
}

fn interval_to_fps(interval: Fraction) -> f64 {
    if interval.numerator == 0 {
        0.0
    } else {
        interval.denominator as f64 / interval.numerator as f64
    }
}

impl Driver for Device {
    type Stream = MmapStream<'static>;

    fn set_format(
        &self,
        format: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<(PixelFormat, u32, u32), VideoError> {
        let actual = Capture::set_format(self, &Format::new(width, height, fourcc(format)))?;
        let format = match &actual.fourcc.repr {
            b"MJPG" => PixelFormat::Mjpeg,
            b"YUYV" => PixelFormat::Yuyv,
            _ => {
                return Err(VideoError::Device(format!(
                    "unsupported pixel format: {}",
                    actual.fourcc
                )));
            }
        };
        Ok((format, actual.width, actual.height))
    }

    fn fps(&self) -> Result<f64, VideoError> {
        Ok(interval_to_fps(Capture::params(self)?.interval))
    }

    fn set_fps(&self, fps: f64) -> Result<f64, VideoError> {
        let interval = Fraction::new(FPS_SCALE, (fps * FPS_SCALE as f64).round() as u32);
        let actual = Capture::set_params(self, &Parameters::new(interval))?;
        Ok(interval_to_fps(actual.interval))
    }

    fn map(&self) -> Result<Self::Stream, VideoError> {
        MmapStream::with_buffers(self, Type::VideoCapture, BUFFER_COUNT)
            .map_err(|error| VideoError::Stream(error.to_string()))
    }
}

/// Video4Linux2 capture device.
///
/// Negotiates MJPEG at the requested size and falls back to YUYV when the
/// driver refuses it. Frames are converted to RGB before they are returned.
/// A refused `set` leaves the device streaming at its previous settings.
pub struct V4l2Device {
    session: Option<Session<Device>>,
}

impl std::fmt::Debug for V4l2Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("V4l2Device")
            .field("settings", &self.session.as_ref().map(|s| s.settings()))
            .finish()
    }
}

impl V4l2Device {
    /// Open a device by index (`/dev/videoN`) or path and negotiate the format.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::Device` if the device cannot be opened or supports
    /// neither MJPEG nor YUYV, and `VideoError::Stream` if buffers cannot be mapped.
    pub fn open(source: &Source, width: u32, height: u32) -> Result<Self, VideoError> {
        let device = match source {
            Source::Index(index) => Device::new(*index)?,
            Source::Path(path) => Device::with_path(path)?,
        };
        let session = Session::open(device, width, height)?;
        let settings = session.settings();
        log::info!(
            "opened V4L2 device {}: {}x{} {:?} at {:.1} fps",
            source,
            settings.width,
            settings.height,
            settings.format,
            settings.fps
        );
        Ok(Self {
            session: Some(session),
        })
    }

    fn session(&mut self) -> Result<&mut Session<Device>, VideoError> {
        self.session
            .as_mut()
            .ok_or_else(|| VideoError::Device("device released".to_string()))
    }
}

fn positive(property: Property, value: f64) -> Result<f64, VideoError> {
    if value.is_finite() && value > 0.0 && value <= u32::MAX as f64 {
        Ok(value)
    } else {
        Err(VideoError::Device(format!(
            "invalid value {value} for {property:?}"
        )))
    }
}

impl CaptureDevice for V4l2Device {
    fn is_opened(&self) -> bool {
        self.session.is_some()
    }

    fn read(&mut self) -> Result<Tensor<u8>, VideoError> {
        let session = self.session()?;
        let settings = session.settings();
        let stream = session
            .stream_mut()
            .ok_or_else(|| VideoError::Stream("no stream".to_string()))?;
        let (data, _metadata) =
            CaptureStream::next(stream).map_err(|error| VideoError::Stream(error.to_string()))?;
        match settings.format {
            PixelFormat::Mjpeg => convert::decode_jpeg(data),
            PixelFormat::Yuyv => convert::yuyv_to_rgb(data, settings.width, settings.height),
        }
    }

    fn set(&mut self, property: Property, value: f64) -> Result<(), VideoError> {
        let value = positive(property, value)?;
        let session = self.session()?;
        let current = session.settings();
        match property {
            Property::FrameWidth => session.resize(value as u32, current.height),
            Property::FrameHeight => session.resize(current.width, value as u32),
            Property::Fps => session.set_fps(value),
        }
    }

    fn get(&self, property: Property) -> Option<f64> {
        let settings = self.session.as_ref()?.settings();
        match property {
            Property::FrameWidth => Some(settings.width as f64),
            Property::FrameHeight => Some(settings.height as f64),
            Property::Fps => Some(settings.fps),
        }
    }

    fn release(&mut self) {
        self.session.take();
    }
}
