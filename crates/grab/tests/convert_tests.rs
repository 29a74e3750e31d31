use crates_image::ImageEncoder;
use framegrab::VideoError;
use framegrab::convert::{decode_jpeg, yuyv_to_rgb};

#[test]
fn test_yuyv_neutral_gray() {
    // Y=128 with neutral chroma is mid gray
    let data = [128, 128, 128, 128];
    let frame = yuyv_to_rgb(&data, 2, 1).unwrap();
    assert_eq!(frame.shape, vec![1, 2, 3]);
    assert_eq!(frame.data, vec![128; 6]);
}

#[test]
fn test_yuyv_luma_per_pixel() {
    // black then white, sharing neutral chroma
    let data = [0, 128, 255, 128];
    let frame = yuyv_to_rgb(&data, 2, 1).unwrap();
    assert_eq!(frame.data, vec![0, 0, 0, 255, 255, 255]);
}

#[test]
fn test_yuyv_ignores_padding() {
    let data = [128u8; 4 + 8];
    let frame = yuyv_to_rgb(&data, 2, 1).unwrap();
    assert_eq!(frame.len(), 6);
}

#[test]
fn test_yuyv_short_buffer() {
    let result = yuyv_to_rgb(&[0u8; 6], 2, 2);
    assert!(matches!(result, Err(VideoError::Stream(_))));
}

#[test]
fn test_yuyv_odd_width() {
    let result = yuyv_to_rgb(&[0u8; 12], 3, 2);
    assert!(matches!(result, Err(VideoError::Stream(_))));
}

#[test]
fn test_decode_jpeg() {
    let mut jpeg = Vec::new();
    let img = crates_image::RgbImage::from_fn(16, 8, |x, y| {
        crates_image::Rgb([(x * 8) as u8, (y * 16) as u8, 100])
    });
    crates_image::codecs::jpeg::JpegEncoder::new(&mut jpeg)
        .write_image(img.as_raw(), 16, 8, crates_image::ExtendedColorType::Rgb8)
        .unwrap();

    let frame = decode_jpeg(&jpeg).unwrap();
    assert_eq!(frame.shape, vec![8, 16, 3]);
    assert_eq!(frame.len(), 16 * 8 * 3);
}

#[test]
fn test_decode_garbage() {
    let result = decode_jpeg(&[0xde, 0xad, 0xbe, 0xef]);
    assert!(matches!(result, Err(VideoError::Decode(_))));
}
