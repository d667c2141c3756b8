// src/services/imaging.rs
// DOCUMENTATION: Pure image operations used by the derivation pipeline
// PURPOSE: Decode, resize, enhance and JPEG-encode in-memory images

use crate::errors::PhotoError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, ImageError, RgbImage};

/// Contrast scale applied by the enhanced variants
pub const CONTRAST_FACTOR: f32 = 1.1;

/// Brightness scale applied after contrast
pub const BRIGHTNESS_FACTOR: f32 = 1.2;

/// Step the size-bounded encoder lowers quality by per attempt
pub const QUALITY_STEP: u8 = 10;

/// Lowest quality the size-bounded encoder will try; an encoding that
/// still exceeds the byte cap at this floor is accepted as-is
pub const MIN_QUALITY: u8 = 10;

/// Decode uploaded bytes into a 3-channel RGB image
/// DOCUMENTATION: Unknown containers map to UnsupportedFormat, corrupt
/// data to DecodeError; every successfully decoded image is normalized
/// to 8-bit RGB
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, PhotoError> {
    let dynamic = image::load_from_memory(bytes).map_err(|e| match e {
        ImageError::Unsupported(inner) => PhotoError::UnsupportedFormat(inner.to_string()),
        other => PhotoError::DecodeError(other.to_string()),
    })?;

    Ok(dynamic.to_rgb8())
}

/// Height that keeps the aspect ratio at the given target width
pub fn scaled_height(width: u32, height: u32, target_width: u32) -> u32 {
    let ratio = target_width as f64 / width as f64;
    ((height as f64 * ratio).round() as u32).max(1)
}

/// Proportional Lanczos rescale so the output width equals the target
/// DOCUMENTATION: Narrow sources are scaled up, wide ones down; only an
/// image already at the target width is returned unchanged
pub fn resize_to_width(image: &RgbImage, target_width: u32) -> RgbImage {
    let (width, height) = image.dimensions();
    if width == target_width {
        return image.clone();
    }

    let new_height = scaled_height(width, height, target_width);
    imageops::resize(image, target_width, new_height, FilterType::Lanczos3)
}

/// Contrast then brightness, with the classic enhancer semantics:
/// contrast interpolates each channel against the rounded mean luma
/// (L = (299R + 587G + 114B) / 1000), brightness scales each channel,
/// both quantizing to u8 with clamping between the two passes
pub fn enhance(image: &RgbImage) -> RgbImage {
    let mean = mean_luma(image);
    let contrasted = map_channels(image, |value| mean + CONTRAST_FACTOR * (value as f32 - mean));
    map_channels(&contrasted, |value| value as f32 * BRIGHTNESS_FACTOR)
}

fn mean_luma(image: &RgbImage) -> f32 {
    let pixel_count = (image.width() as u64) * (image.height() as u64);
    if pixel_count == 0 {
        return 0.0;
    }

    let total: u64 = image
        .pixels()
        .map(|pixel| {
            let [r, g, b] = pixel.0;
            (299 * r as u64 + 587 * g as u64 + 114 * b as u64) / 1000
        })
        .sum();

    // Rounded to an integer, as the reference enhancers do
    ((total as f64 / pixel_count as f64) + 0.5).floor() as f32
}

fn map_channels(image: &RgbImage, op: impl Fn(u8) -> f32) -> RgbImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for value in pixel.0.iter_mut() {
            *value = op(*value).clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// JPEG-encode at an explicit quality
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, PhotoError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| {
            log::error!("JPEG encode at quality {} failed: {}", quality, e);
            PhotoError::StorageError(format!("JPEG encode failed: {}", e))
        })?;

    Ok(buffer)
}

/// JPEG-encode under a byte cap, stepping quality down until the result
/// fits or the quality floor is reached
/// DOCUMENTATION: Returns the encoded bytes and the quality they were
/// produced at; the floor result is returned even when it exceeds the cap
pub fn encode_jpeg_capped(
    image: &RgbImage,
    start_quality: u8,
    max_bytes: u64,
) -> Result<(Vec<u8>, u8), PhotoError> {
    let mut quality = start_quality.clamp(MIN_QUALITY, 100);
    let mut bytes = encode_jpeg(image, quality)?;

    while bytes.len() as u64 > max_bytes && quality > MIN_QUALITY {
        quality = quality.saturating_sub(QUALITY_STEP).max(MIN_QUALITY);
        bytes = encode_jpeg(image, quality)?;
    }

    if bytes.len() as u64 > max_bytes {
        log::warn!(
            "Encoded image still {} bytes over the {} byte cap at quality {}",
            bytes.len() as u64 - max_bytes,
            max_bytes,
            quality
        );
    }

    Ok((bytes, quality))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;

    fn gradient_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        encode_jpeg(&gradient_image(width, height), 90).unwrap()
    }

    #[test]
    fn test_scaled_height_matches_expected_dimensions() {
        assert_eq!(scaled_height(4000, 3000, 1920), 1440);
        assert_eq!(scaled_height(400, 300, 192), 144);
        // Rounds to the nearest pixel
        assert_eq!(scaled_height(1000, 333, 500), 167);
        assert_eq!(scaled_height(999, 100, 500), 50);
        // Never collapses to zero height
        assert_eq!(scaled_height(4000, 1, 1920), 1);
    }

    #[test]
    fn test_resize_downscales_to_target_width() {
        let image = gradient_image(400, 300);
        let resized = resize_to_width(&image, 192);
        assert_eq!(resized.dimensions(), (192, 144));
    }

    #[test]
    fn test_resize_upscales_narrow_sources_to_target_width() {
        let image = gradient_image(100, 80);
        let resized = resize_to_width(&image, 200);
        assert_eq!(resized.dimensions(), (200, 160));
    }

    #[test]
    fn test_resize_at_target_width_is_identity() {
        let image = gradient_image(192, 80);
        let resized = resize_to_width(&image, 192);
        assert_eq!(resized.as_raw(), image.as_raw());
    }

    #[test]
    fn test_enhance_is_deterministic() {
        let image = gradient_image(64, 48);
        let first = enhance(&image);
        let second = enhance(&image);
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_enhance_scales_uniform_gray_by_brightness_only() {
        // Uniform gray has mean luma equal to its value, so contrast
        // interpolation is the identity and only brightness applies
        let image = RgbImage::from_pixel(10, 10, Rgb([100, 100, 100]));
        let enhanced = enhance(&image);
        assert_eq!(enhanced.get_pixel(0, 0).0, [120, 120, 120]);
    }

    #[test]
    fn test_enhance_clamps_bright_channels() {
        let image = RgbImage::from_pixel(10, 10, Rgb([250, 250, 250]));
        let enhanced = enhance(&image);
        assert_eq!(enhanced.get_pixel(0, 0).0, [255, 255, 255]);
    }

    #[test]
    fn test_decode_rejects_unknown_containers() {
        let err = decode_rgb(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PhotoError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        let full = jpeg_bytes(64, 48);
        let err = decode_rgb(&full[..full.len() / 2]).unwrap_err();
        assert!(matches!(
            err,
            PhotoError::DecodeError(_) | PhotoError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_decode_accepts_png_uploads() {
        let mut bytes = Vec::new();
        let image = image::DynamicImage::ImageRgb8(gradient_image(32, 32));
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_rgb(&bytes).unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
    }

    #[test]
    fn test_capped_encode_keeps_quality_when_cap_is_generous() {
        let image = gradient_image(128, 96);
        let (bytes, quality) = encode_jpeg_capped(&image, 90, 10_000_000).unwrap();
        assert_eq!(quality, 90);
        assert!(bytes.len() as u64 <= 10_000_000);
    }

    #[test]
    fn test_capped_encode_stops_at_the_first_fitting_quality() {
        // A cap sized to the quality-80 encoding: one step down from 90
        // fits, so the descent ends there rather than at the floor
        let image = gradient_image(128, 96);
        let at_90 = encode_jpeg(&image, 90).unwrap();
        let at_80 = encode_jpeg(&image, 80).unwrap();
        assert!(at_80.len() < at_90.len());

        let (bytes, quality) = encode_jpeg_capped(&image, 90, at_80.len() as u64).unwrap();
        assert_eq!(quality, 80);
        assert_eq!(bytes.len(), at_80.len());
    }

    #[test]
    fn test_capped_encode_clamps_at_the_quality_floor() {
        // A cap no encoding can meet forces the loop down to the floor,
        // where the oversized result is accepted
        let image = gradient_image(128, 96);
        let (bytes, quality) = encode_jpeg_capped(&image, 90, 100).unwrap();
        assert_eq!(quality, MIN_QUALITY);
        assert!(bytes.len() > 100);
    }
}
