use {
    crate::*,
    framegrab_base::Tensor,
    std::{
        fmt,
        sync::{
            Arc, Mutex, MutexGuard,
            atomic::{AtomicBool, AtomicU64, Ordering},
        },
        thread::{self, JoinHandle},
        time::{Duration, Instant},
    },
};

// name of the background capture thread
const WORKER_NAME: &str = "framegrab-capture";

// channels in every frame handed out by the reader
const FRAME_CHANNELS: usize = 3;

/// The latest frame and whether any capture has succeeded yet.
struct Slot {
    grabbed: bool,
    frame: Tensor<u8>,
}

impl Slot {
    fn empty() -> Self {
        Self {
            grabbed: false,
            frame: Tensor::empty_image(FRAME_CHANNELS),
        }
    }
}

// poisoning only means the worker panicked mid-iteration; the data is still whole
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

#[derive(Debug, PartialEq)]
enum WarmupStep {
    Ready,
    Wait(Duration),
    TimedOut,
}

/// Bookkeeping for the wait on the first frame, shared by the blocking and async starts.
struct Warmup {
    started: Instant,
    timeout: Duration,
    poll: Duration,
    progress_interval: Duration,
    next_progress: Duration,
}

impl Warmup {
    fn new(config: &CaptureConfig) -> Self {
        log::info!(
            "starting camera warmup (timeout: {:.1}s)...",
            config.warmup_timeout().as_secs_f32()
        );
        Self {
            started: Instant::now(),
            timeout: config.warmup_timeout(),
            poll: config.warmup_poll(),
            progress_interval: config.progress_interval(),
            next_progress: Duration::ZERO,
        }
    }

    fn step(&mut self, grabbed: bool) -> WarmupStep {
        self.step_at(grabbed, self.started.elapsed())
    }

    // a Wait never extends past the timeout, so the timeout check must come first
    fn step_at(&mut self, grabbed: bool, elapsed: Duration) -> WarmupStep {
        if grabbed {
            log::info!("camera warmup finished after {:.1}s", elapsed.as_secs_f32());
            return WarmupStep::Ready;
        }
        if elapsed >= self.timeout {
            return WarmupStep::TimedOut;
        }
        if self.progress_due(elapsed) {
            log::info!("waiting for camera... {:.1}s elapsed", elapsed.as_secs_f32());
        }
        WarmupStep::Wait(self.poll.min(self.timeout - elapsed))
    }

    fn progress_due(&mut self, elapsed: Duration) -> bool {
        if elapsed < self.next_progress {
            return false;
        }
        self.next_progress = elapsed + self.progress_interval;
        true
    }
}

/// Reads frames from a [`CaptureDevice`] on a background thread and keeps the
/// most recent one for [`read`](AsyncCapture::read), which never waits on the device.
///
/// The device sits behind its own mutex, separate from the frame slot, so
/// [`set`](AsyncCapture::set) still reaches it while the worker is running.
/// Dropping the reader stops the worker and releases the device.
pub struct AsyncCapture<D: CaptureDevice + 'static> {
    config: CaptureConfig,
    device: Arc<Mutex<D>>,
    slot: Arc<Mutex<Slot>>,
    running: Arc<AtomicBool>,
    frame_count: Arc<AtomicU64>,
    join_handle: Option<JoinHandle<()>>,
}

impl<D: CaptureDevice + 'static> fmt::Debug for AsyncCapture<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncCapture")
            .field("config", &self.config)
            .field("device", &"<CaptureDevice>")
            .field("frame_count", &self.frame_count())
            .field("started", &self.is_started())
            .finish()
    }
}

#[cfg(feature = "v4l2")]
impl AsyncCapture<v4l2::V4l2Device> {
    /// Open the V4L2 device named by `config.source()` at the configured resolution.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::Device` if the device cannot be opened or configured.
    pub fn open(config: CaptureConfig) -> Result<Self, VideoError> {
        let device = v4l2::V4l2Device::open(config.source(), config.width(), config.height())?;
        Self::new(device, config)
    }
}

impl<D: CaptureDevice + 'static> AsyncCapture<D> {
    /// Wrap an opened device.
    ///
    /// Requests the configured resolution and performs one synchronous read to
    /// seed the latest frame. A refused resolution or a failed seed read is
    /// logged and does not fail construction.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::Device` if the device is not open.
    pub fn new(mut device: D, config: CaptureConfig) -> Result<Self, VideoError> {
        if !device.is_opened() {
            return Err(VideoError::Device(format!(
                "cannot open camera {}",
                config.source()
            )));
        }

        for (property, value) in [
            (Property::FrameWidth, config.width()),
            (Property::FrameHeight, config.height()),
        ] {
            if let Err(error) = device.set(property, value as f64) {
                log::warn!("could not set {:?} to {}: {}", property, value, error);
            }
        }

        let slot = match device.read() {
            Ok(frame) if !frame.is_empty() => Slot {
                grabbed: true,
                frame,
            },
            Ok(_) => {
                log::warn!("initial read returned an empty frame");
                Slot::empty()
            }
            Err(error) => {
                log::warn!("initial read failed: {}", error);
                Slot::empty()
            }
        };
        let frame_count = if slot.grabbed { 1 } else { 0 };

        Ok(Self {
            config,
            device: Arc::new(Mutex::new(device)),
            slot: Arc::new(Mutex::new(slot)),
            running: Arc::new(AtomicBool::new(false)),
            frame_count: Arc::new(AtomicU64::new(frame_count)),
            join_handle: None,
        })
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Forward a property change to the device.
    ///
    /// Waits for an in-flight read on the worker to finish.
    pub fn set(&self, property: Property, value: f64) -> Result<(), VideoError> {
        lock(&self.device).set(property, value)
    }

    pub fn get(&self, property: Property) -> Option<f64> {
        lock(&self.device).get(property)
    }

    pub fn is_opened(&self) -> bool {
        lock(&self.device).is_opened()
    }

    /// Whether a worker is running.
    ///
    /// A worker that exited on its own (it panicked) counts as not started;
    /// the next `start` reaps it and spawns a fresh one.
    pub fn is_started(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Number of frames captured successfully, including the seed read.
    pub fn frame_count(&self) -> u64 {
        self.frame_count.load(Ordering::Relaxed)
    }

    /// Start the background worker and block until the first frame arrives.
    ///
    /// Calling this on a running reader logs a warning and does nothing.
    ///
    /// # Errors
    ///
    /// Returns `VideoError::WarmupTimeout` if no frame is captured within the
    /// warmup timeout; the worker is stopped before returning.
    pub fn start(&mut self) -> Result<(), VideoError> {
        if self.is_started() {
            log::warn!("asynchronous capture has already been started");
            return Ok(());
        }
        self.stop();
        self.spawn_worker()?;

        let mut warmup = Warmup::new(&self.config);
        loop {
            match warmup.step(self.grabbed()) {
                WarmupStep::Ready => return Ok(()),
                WarmupStep::Wait(delay) => thread::sleep(delay),
                WarmupStep::TimedOut => return Err(self.fail_warmup()),
            }
        }
    }

    /// Like [`start`](AsyncCapture::start), but waits on the tokio timer
    /// instead of blocking the calling thread.
    pub async fn start_async(&mut self) -> Result<(), VideoError> {
        if self.is_started() {
            log::warn!("asynchronous capture has already been started");
            return Ok(());
        }
        self.stop();
        self.spawn_worker()?;

        let mut warmup = Warmup::new(&self.config);
        loop {
            match warmup.step(self.grabbed()) {
                WarmupStep::Ready => return Ok(()),
                WarmupStep::Wait(delay) => tokio::time::sleep(delay).await,
                WarmupStep::TimedOut => return Err(self.fail_warmup()),
            }
        }
    }

    /// Copy out the latest frame.
    ///
    /// Returns `(false, empty frame)` until some capture has succeeded. The
    /// frame may be stale if the device stopped delivering.
    pub fn read(&self) -> (bool, Tensor<u8>) {
        let slot = lock(&self.slot);
        (slot.grabbed, slot.frame.clone())
    }

    /// Signal the worker to exit and wait for it.
    ///
    /// The worker notices the signal after its current read returns.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.join_handle.take() {
            if handle.join().is_err() {
                log::error!("capture worker panicked");
            }
            log::debug!("capture worker joined");
        }
    }

    fn grabbed(&self) -> bool {
        lock(&self.slot).grabbed
    }

    fn spawn_worker(&mut self) -> Result<(), VideoError> {
        self.running.store(true, Ordering::SeqCst);

        let device = Arc::clone(&self.device);
        let slot = Arc::clone(&self.slot);
        let running = Arc::clone(&self.running);
        let frame_count = Arc::clone(&self.frame_count);
        let retry_delay = self.config.retry_delay();

        let spawned = thread::Builder::new()
            .name(WORKER_NAME.to_string())
            .spawn(move || capture_loop(device, slot, running, frame_count, retry_delay));

        match spawned {
            Ok(handle) => {
                self.join_handle = Some(handle);
                Ok(())
            }
            Err(error) => {
                self.running.store(false, Ordering::SeqCst);
                Err(VideoError::Device(format!(
                    "failed to spawn capture worker: {error}"
                )))
            }
        }
    }

    fn fail_warmup(&mut self) -> VideoError {
        let timeout = self.config.warmup_timeout();
        log::error!(
            "camera warmup timeout after {:.1}s; the camera may need permissions or be in use by another application",
            timeout.as_secs_f32()
        );
        log::error!("please check:");
        log::error!("1. the current user is allowed to access the camera device");
        log::error!("2. no other application is using the camera");
        log::error!("3. try restarting the application");
        self.stop();
        VideoError::WarmupTimeout(timeout)
    }
}

impl<D: CaptureDevice + 'static> Drop for AsyncCapture<D> {
    fn drop(&mut self) {
        self.stop();
        lock(&self.device).release();
    }
}

fn capture_loop<D: CaptureDevice>(
    device: Arc<Mutex<D>>,
    slot: Arc<Mutex<Slot>>,
    running: Arc<AtomicBool>,
    frame_count: Arc<AtomicU64>,
    retry_delay: Duration,
) {
    log::info!("capture worker: started");
    while running.load(Ordering::SeqCst) {
        let result = lock(&device).read();
        match result {
            Ok(frame) if !frame.is_empty() => {
                log::trace!("capture worker: grabbed frame {:?}", frame.shape);
                let stale = {
                    let mut slot = lock(&slot);
                    slot.grabbed = true;
                    std::mem::replace(&mut slot.frame, frame)
                };
                // free the previous buffer outside the lock
                drop(stale);
                frame_count.fetch_add(1, Ordering::Relaxed);
            }
            Ok(frame) => {
                log::warn!(
                    "capture worker: read returned an empty frame (shape {:?})",
                    frame.shape
                );
                thread::sleep(retry_delay);
            }
            Err(error) => {
                log::warn!("capture worker: camera read failed: {}", error);
                thread::sleep(retry_delay);
            }
        }
    }
    log::info!("capture worker: stopped");
}
