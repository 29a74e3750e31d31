use {
    crate::*,
    framegrab_base::Tensor,
    std::time::{Duration, Instant},
};

// frame rate until told otherwise
const DEFAULT_FPS: f64 = 30.0;

// how far the gradient moves per frame
const PATTERN_STEP: u64 = 4;

/// Largest width or height accepted through `set`.
pub const MAX_DIMENSION: u32 = 8192;

/// A device that renders a moving RGB gradient.
///
/// Reads are paced to the configured frame rate, so a reader sees the same
/// blocking behaviour as with a real camera. An fps of zero disables pacing.
#[derive(Debug)]
pub struct TestPattern {
    width: u32,
    height: u32,
    fps: f64,
    opened: bool,
    frame_index: u64,
    last_frame: Option<Instant>,
}

impl TestPattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            fps: DEFAULT_FPS,
            opened: true,
            frame_index: 0,
            last_frame: None,
        }
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    fn pace(&mut self) {
        if self.fps > 0.0 {
            if let Some(last) = self.last_frame {
                let due = last + Duration::from_secs_f64(1.0 / self.fps);
                let now = Instant::now();
                if due > now {
                    std::thread::sleep(due - now);
                }
            }
        }
        self.last_frame = Some(Instant::now());
    }

    fn render(&self) -> Result<Tensor<u8>, VideoError> {
        let (width, height) = (self.width as usize, self.height as usize);
        let offset = (self.frame_index.wrapping_mul(PATTERN_STEP) % 256) as usize;
        let size = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(3))
            .ok_or_else(|| {
                VideoError::Stream(format!("frame size {width}x{height} overflows"))
            })?;
        let mut data = Vec::with_capacity(size);
        for y in 0..height {
            for x in 0..width {
                data.push(((x + offset) % 256) as u8);
                data.push(((y + offset) % 256) as u8);
                data.push((offset % 256) as u8);
            }
        }
        Ok(Tensor::new(vec![height, width, 3], data)?)
    }
}

fn dimension(property: Property, value: f64) -> Result<u32, VideoError> {
    if value.is_finite() && value >= 1.0 && value <= MAX_DIMENSION as f64 {
        Ok(value as u32)
    } else {
        Err(VideoError::Device(format!(
            "invalid value {value} for {property:?}"
        )))
    }
}

impl CaptureDevice for TestPattern {
    fn is_opened(&self) -> bool {
        self.opened
    }

    fn read(&mut self) -> Result<Tensor<u8>, VideoError> {
        if !self.opened {
            return Err(VideoError::Stream("test pattern released".to_string()));
        }
        self.pace();
        let frame = self.render()?;
        self.frame_index = self.frame_index.wrapping_add(1);
        Ok(frame)
    }

    fn set(&mut self, property: Property, value: f64) -> Result<(), VideoError> {
        match property {
            Property::FrameWidth => self.width = dimension(property, value)?,
            Property::FrameHeight => self.height = dimension(property, value)?,
            Property::Fps => {
                if !value.is_finite() || value < 0.0 {
                    return Err(VideoError::Device(format!("invalid frame rate {value}")));
                }
                self.fps = value;
            }
        }
        Ok(())
    }

    fn get(&self, property: Property) -> Option<f64> {
        match property {
            Property::FrameWidth => Some(self.width as f64),
            Property::FrameHeight => Some(self.height as f64),
            Property::Fps => Some(self.fps),
        }
    }

    fn release(&mut self) {
        self.opened = false;
    }
}
