//! Native image conversion via the `image` and `webp` crates.
//!
//! # Architecture
//!
//! - [`BatchOrchestrator`]: Drives a batch over a session and emits progress events.
//! - [`ConversionPipeline`]: Converts one image (decode, resize, encode).
//! - [`RasterCodec`]: Decode/encode seam; [`NativeCodec`] is the default implementation.
//! - [`resize`]: Resamples the decoded surface to the resolved dimensions.
//! - [`formats`]: Maps the quality knob to WebP and JPEG encoder settings.

mod codec;
mod executor;
pub mod formats;
mod pipeline;
pub mod resize;

pub use codec::{NativeCodec, RasterCodec};
pub use executor::{BatchOrchestrator, CancelFlag};
pub use pipeline::ConversionPipeline;
