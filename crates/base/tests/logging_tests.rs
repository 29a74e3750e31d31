use framegrab_base::logging::{StdoutLogger, format_record, init_stdout_logger};
use log::Log;

#[test]
fn test_format_record_contains_parts() {
    let record = log::RecordBuilder::new()
        .level(log::Level::Warn)
        .target("test")
        .file(Some("reader.rs"))
        .line(Some(42))
        .args(format_args!("camera read failed"))
        .build();

    let line = format_record(&record);
    assert!(line.contains("[WARN]"), "Should contain log level");
    assert!(line.contains("thread:"), "Should contain thread");
    assert!(line.contains("reader.rs:42"), "Should contain file and line");
    assert!(line.ends_with("camera read failed"), "Should end with message");
}

#[test]
fn test_format_record_uses_thread_name() {
    let line = std::thread::Builder::new()
        .name("framegrab-test".to_string())
        .spawn(|| {
            let record = log::RecordBuilder::new()
                .level(log::Level::Info)
                .args(format_args!("hello"))
                .build();
            format_record(&record)
        })
        .unwrap()
        .join()
        .unwrap();
    assert!(line.contains("[thread:framegrab-test]"));
    assert!(line.contains("unknown:0"));
}

#[test]
fn test_init_stdout_logger_sets_global_logger() {
    // log::set_logger can only succeed once per process; repeated calls are no-ops
    init_stdout_logger();
    init_stdout_logger();

    assert_ne!(log::max_level(), log::LevelFilter::Off);
    log::info!("Test message from global logger");

    let logger = StdoutLogger;
    logger.flush();
}
