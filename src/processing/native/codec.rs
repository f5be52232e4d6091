//! Raster decode/encode capability.

use image::DynamicImage;

use crate::utils::{ConverterError, ConverterResult, OutputFormat};
use super::formats::encode_as;

/// Decodes raw bytes into pixels and encodes pixels into a target format.
///
/// Both calls are blocking; the pipeline runs them on tokio's blocking pool.
pub trait RasterCodec: Send + Sync + 'static {
    fn decode(&self, bytes: &[u8]) -> ConverterResult<DynamicImage>;

    fn encode(&self, image: &DynamicImage, format: OutputFormat, quality: f32) -> ConverterResult<Vec<u8>>;
}

/// Codec backed by the `image` decoders and the libwebp/JPEG encoders.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCodec;

impl RasterCodec for NativeCodec {
    fn decode(&self, bytes: &[u8]) -> ConverterResult<DynamicImage> {
        if bytes.is_empty() {
            return Err(ConverterError::decode("Input is empty"));
        }
        image::load_from_memory(bytes).map_err(|e| ConverterError::decode(e.to_string()))
    }

    fn encode(&self, image: &DynamicImage, format: OutputFormat, quality: f32) -> ConverterResult<Vec<u8>> {
        encode_as(image, format, quality)
    }
}
