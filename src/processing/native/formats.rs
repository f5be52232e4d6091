//! Maps the `[0, 1]` quality knob to format-specific encoder settings.

use std::io::Cursor;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use crate::utils::{ConverterError, ConverterResult, OutputFormat};

/// Converts `[0, 1]` quality to the 0-100 scale the encoders use.
fn encoder_quality(quality: f32) -> f32 {
    (quality.clamp(0.0, 1.0) * 100.0).round()
}

/// Rejects surfaces the encoder for `format` cannot take.
pub fn check_dimensions(width: u32, height: u32, format: OutputFormat) -> ConverterResult<()> {
    if width == 0 || height == 0 {
        return Err(ConverterError::encode(format!("Cannot encode an empty {width}×{height} surface")));
    }
    if let Some(max) = format.max_dimension() {
        if width > max || height > max {
            return Err(ConverterError::encode(format!(
                "{width}×{height} exceeds the {max}px limit of {}",
                format.mime_type()
            )));
        }
    }
    Ok(())
}

/// Encodes `image` as lossy WebP.
///
/// The surface is converted to RGBA so alpha survives; libwebp decides per
/// image whether the alpha plane is needed.
pub fn encode_webp(image: &DynamicImage, quality: f32) -> ConverterResult<Vec<u8>> {
    check_dimensions(image.width(), image.height(), OutputFormat::WebP)?;

    let rgba = image.to_rgba8();
    let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
    let encoded = encoder
        .encode_simple(false, encoder_quality(quality))
        .map_err(|e| ConverterError::encode(format!("WebP encode failed: {e:?}")))?;

    if encoded.is_empty() {
        return Err(ConverterError::encode("WebP encoder produced no output"));
    }
    Ok(encoded.to_vec())
}

/// Encodes `image` as baseline JPEG. Alpha is dropped.
pub fn encode_jpeg(image: &DynamicImage, quality: f32) -> ConverterResult<Vec<u8>> {
    check_dimensions(image.width(), image.height(), OutputFormat::JPEG)?;

    let rgb = image.to_rgb8();
    let q = encoder_quality(quality).max(1.0) as u8;
    let mut buf = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buf, q)
        .encode_image(&rgb)
        .map_err(|e| ConverterError::encode(format!("JPEG encode failed: {e}")))?;

    Ok(buf.into_inner())
}

/// Dispatches to the encoder for `format`.
pub fn encode_as(image: &DynamicImage, format: OutputFormat, quality: f32) -> ConverterResult<Vec<u8>> {
    match format {
        OutputFormat::WebP => encode_webp(image, quality),
        OutputFormat::JPEG => encode_jpeg(image, quality),
    }
}
