use framegrab::{CaptureConfig, Source};
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_default_config() {
    let config = CaptureConfig::default();
    assert_eq!(config.source(), &Source::Index(0));
    assert_eq!(config.width(), 640);
    assert_eq!(config.height(), 480);
    assert_eq!(config.warmup_timeout(), Duration::from_secs(30));
    assert_eq!(config.warmup_poll(), Duration::from_millis(500));
    assert_eq!(config.progress_interval(), Duration::from_secs(5));
    assert_eq!(config.retry_delay(), Duration::from_millis(100));
}

#[test]
fn test_builder_overrides() {
    let config = CaptureConfig::default()
        .with_source(2)
        .with_width(1280)
        .with_height(720)
        .with_warmup_timeout(Duration::from_secs(3))
        .with_warmup_poll(Duration::from_millis(50))
        .with_progress_interval(Duration::from_secs(1))
        .with_retry_delay(Duration::from_millis(20));

    assert_eq!(config.source(), &Source::Index(2));
    assert_eq!(config.width(), 1280);
    assert_eq!(config.height(), 720);
    assert_eq!(config.warmup_timeout(), Duration::from_secs(3));
    assert_eq!(config.warmup_poll(), Duration::from_millis(50));
    assert_eq!(config.progress_interval(), Duration::from_secs(1));
    assert_eq!(config.retry_delay(), Duration::from_millis(20));
}

#[test]
fn test_source_from_str() {
    assert_eq!(Source::from("1"), Source::Index(1));
    assert_eq!(
        Source::from("/dev/video2"),
        Source::Path(PathBuf::from("/dev/video2"))
    );
}

#[test]
fn test_source_display() {
    assert_eq!(Source::Index(3).to_string(), "#3");
    assert_eq!(Source::from("/dev/video0").to_string(), "/dev/video0");
}
