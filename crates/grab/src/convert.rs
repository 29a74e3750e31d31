//! Conversions from raw device payloads to RGB frames.

use {
    crate::VideoError,
    crates_image::ImageFormat,
    framegrab_base::Tensor,
};

/// BT.601 YUV to RGB for one pixel.
fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = y as f32;
    let u = u as f32 - 128.0;
    let v = v as f32 - 128.0;
    [
        (y + 1.402 * v).clamp(0.0, 255.0) as u8,
        (y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8,
        (y + 1.772 * u).clamp(0.0, 255.0) as u8,
    ]
}

/// Converts packed YUYV 4:2:2 (`[Y0, U, Y1, V, ...]`) into an RGB tensor
/// of shape `[height, width, 3]`.
///
/// Extra trailing bytes (drivers sometimes pad the buffer) are ignored.
///
/// # Errors
///
/// Returns `VideoError::Stream` if `data` holds fewer than
/// `width * height * 2` bytes or `width` is odd.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Result<Tensor<u8>, VideoError> {
    let (width, height) = (width as usize, height as usize);
    if width % 2 != 0 {
        return Err(VideoError::Stream(format!("YUYV width must be even, got {width}")));
    }
    let expected = width * height * 2;
    if data.len() < expected {
        return Err(VideoError::Stream(format!(
            "short YUYV buffer: expected {expected} bytes, got {}",
            data.len()
        )));
    }

    let mut rgb = Vec::with_capacity(width * height * 3);
    for quad in data[..expected].chunks_exact(4) {
        rgb.extend_from_slice(&yuv_to_rgb(quad[0], quad[1], quad[3]));
        rgb.extend_from_slice(&yuv_to_rgb(quad[2], quad[1], quad[3]));
    }
    Ok(Tensor::new(vec![height, width, 3], rgb)?)
}

/// Decodes one MJPEG frame into an RGB tensor of shape `[height, width, 3]`.
pub fn decode_jpeg(data: &[u8]) -> Result<Tensor<u8>, VideoError> {
    let image = crates_image::load_from_memory_with_format(data, ImageFormat::Jpeg)?.to_rgb8();
    let (width, height) = image.dimensions();
    Ok(Tensor::new(
        vec![height as usize, width as usize, 3],
        image.into_raw(),
    )?)
}
