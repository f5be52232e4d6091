//! Single-image conversion: decode, resolve dimensions, resample, encode.

use std::sync::Arc;
use tracing::debug;

use crate::core::{ConversionParams, ConversionResult, InputImage};
use crate::processing::resolve_dimensions;
use crate::utils::{ConverterError, ConverterResult, output_name};

use super::codec::{NativeCodec, RasterCodec};
use super::formats::check_dimensions;
use super::resize::resample;

/// Converts one input image at a time.
///
/// Decoding and encoding each run as one blocking task, awaited in turn, so
/// a conversion has exactly two suspension points. The decoded surface is
/// moved into the encode task and dropped there, whether or not encoding
/// succeeds.
#[derive(Clone)]
pub struct ConversionPipeline {
    codec: Arc<dyn RasterCodec>,
}

impl ConversionPipeline {
    pub fn new(codec: Arc<dyn RasterCodec>) -> Self {
        Self { codec }
    }

    pub async fn convert(
        &self,
        input: &InputImage,
        params: &ConversionParams,
    ) -> ConverterResult<ConversionResult> {
        let name = input.name().to_string();

        let codec = Arc::clone(&self.codec);
        let bytes = input.shared_bytes();
        let decoded = tokio::task::spawn_blocking(move || codec.decode(&bytes))
            .await
            .map_err(|e| ConverterError::decode(format!("Decode task failed: {e}")))??;

        let (orig_w, orig_h) = (decoded.width(), decoded.height());
        let (width, height) = resolve_dimensions(orig_w, orig_h, params.policy());
        debug!("Decoded '{name}': {orig_w}×{orig_h} → {width}×{height}");

        let format = params.format();
        // Reject before resampling so an oversized target is never allocated.
        check_dimensions(width, height, format)?;

        let codec = Arc::clone(&self.codec);
        let quality = params.quality();
        let encoded = tokio::task::spawn_blocking(move || {
            let surface = resample(decoded, width, height);
            codec.encode(&surface, format, quality)
        })
        .await
        .map_err(|e| ConverterError::encode(format!("Encode task failed: {e}")))??;

        debug!(
            "'{name}': {} → {} bytes as {}",
            input.size(),
            encoded.len(),
            format.mime_type()
        );

        Ok(ConversionResult::new(
            input.clone(),
            output_name(&name, format.extension()),
            encoded,
            format,
            (width, height),
        ))
    }
}

impl Default for ConversionPipeline {
    fn default() -> Self {
        Self::new(Arc::new(NativeCodec))
    }
}
