use framegrab::{Property, VideoError};
use std::error::Error;
use std::io;

#[test]
fn test_from_io_error() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "device not found");
    let err: VideoError = io_err.into();

    match err {
        VideoError::Device(msg) => assert!(msg.contains("device not found")),
        other => panic!("Expected VideoError::Device, got {:?}", other),
    }
}

#[test]
fn test_from_tensor_error() {
    let tensor_err = framegrab_base::Tensor::<u8>::new(vec![2, 2], vec![0; 3]).unwrap_err();
    let err: VideoError = tensor_err.into();
    assert!(matches!(err, VideoError::Stream(_)));
}

#[test]
fn test_decode_error_has_source() {
    let decode_err = crates_image::load_from_memory_with_format(
        b"not a jpeg",
        crates_image::ImageFormat::Jpeg,
    )
    .unwrap_err();
    let err: VideoError = decode_err.into();

    assert!(err.to_string().starts_with("decode error:"));
    assert!(err.source().is_some());
}

#[test]
fn test_error_display() {
    assert!(
        VideoError::Device("busy".to_string())
            .to_string()
            .contains("device error: busy")
    );
    assert!(
        VideoError::Stream("timeout".to_string())
            .to_string()
            .contains("stream error: timeout")
    );
    assert_eq!(
        VideoError::Unsupported(Property::Fps).to_string(),
        "unsupported property: Fps"
    );
}
