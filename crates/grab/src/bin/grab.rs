use {
    framegrab::*,
    framegrab_base::log,
    std::time::{Duration, Instant},
};

// how often the consumer samples the latest frame
const CONSUMER_INTERVAL: Duration = Duration::from_millis(200);

// how many samples to take before exiting
const SAMPLE_COUNT: usize = 25;

fn open_device(source: &str, config: &CaptureConfig) -> Result<Box<dyn CaptureDevice>, VideoError> {
    if source == "test" {
        return Ok(Box::new(TestPattern::new(config.width(), config.height())));
    }
    #[cfg(feature = "v4l2")]
    {
        Ok(Box::new(V4l2Device::open(
            config.source(),
            config.width(),
            config.height(),
        )?))
    }
    #[cfg(not(feature = "v4l2"))]
    {
        Err(VideoError::Device(format!(
            "cannot open {source}: built without the v4l2 feature"
        )))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    framegrab_base::init_stdout_logger();

    // grab [SOURCE] [WIDTH] [HEIGHT]
    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "test".to_string());
    let mut config = CaptureConfig::default();
    if let Some(width) = args.next() {
        config = config.with_width(width.parse()?);
    }
    if let Some(height) = args.next() {
        config = config.with_height(height.parse()?);
    }
    if source != "test" {
        config = config.with_source(source.as_str());
    }

    log::info!("Frame Grabber");
    log::info!(
        "Source: {}, requested {}x{}",
        source,
        config.width(),
        config.height()
    );

    let device = open_device(&source, &config)?;
    let mut capture = AsyncCapture::new(device, config)?;
    capture.start()?;

    for sample in 0..SAMPLE_COUNT {
        let before = Instant::now();
        let (grabbed, frame) = capture.read();
        let took = before.elapsed();
        log::info!(
            "sample {}: grabbed={} {}x{} read in {:?}, {} frames captured",
            sample,
            grabbed,
            frame.width(),
            frame.height(),
            took,
            capture.frame_count()
        );
        std::thread::sleep(CONSUMER_INTERVAL);
    }

    capture.stop();
    log::info!("Exiting...");
    Ok(())
}
