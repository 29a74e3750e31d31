use std::{fmt, path::PathBuf, time::Duration};

// how long start() waits for the first frame
const DEFAULT_WARMUP_TIMEOUT: Duration = Duration::from_secs(30);

// how often start() checks the slot during warmup
const DEFAULT_WARMUP_POLL: Duration = Duration::from_millis(500);

// how often warmup progress is logged
const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

// delay before retrying after a failed read
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Which device to open.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    /// `/dev/video{n}` on Linux.
    Index(usize),
    Path(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Index(index) => write!(f, "#{index}"),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

impl From<usize> for Source {
    fn from(index: usize) -> Self {
        Source::Index(index)
    }
}

impl From<&str> for Source {
    /// Numeric strings select an index, anything else is a path.
    fn from(value: &str) -> Self {
        match value.parse::<usize>() {
            Ok(index) => Source::Index(index),
            Err(_) => Source::Path(PathBuf::from(value)),
        }
    }
}

/// Configuration for asynchronous capture.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    source: Source,
    width: u32,
    height: u32,
    warmup_timeout: Duration,
    warmup_poll: Duration,
    progress_interval: Duration,
    retry_delay: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: Source::Index(0),
            width: 640,
            height: 480,
            warmup_timeout: DEFAULT_WARMUP_TIMEOUT,
            warmup_poll: DEFAULT_WARMUP_POLL,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl CaptureConfig {
    /// Set the device to open.
    pub fn with_source(mut self, source: impl Into<Source>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the requested capture width in pixels.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set the requested capture height in pixels.
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Set how long `start` waits for the first frame.
    pub fn with_warmup_timeout(mut self, timeout: Duration) -> Self {
        self.warmup_timeout = timeout;
        self
    }

    /// Set the polling period used while waiting for the first frame.
    pub fn with_warmup_poll(mut self, poll: Duration) -> Self {
        self.warmup_poll = poll;
        self
    }

    /// Set how often warmup progress is logged.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the sleep between a failed read and the next attempt.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    // Getters
    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn warmup_timeout(&self) -> Duration {
        self.warmup_timeout
    }

    pub fn warmup_poll(&self) -> Duration {
        self.warmup_poll
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval
    }

    pub fn retry_delay(&self) -> Duration {
        self.retry_delay
    }
}
