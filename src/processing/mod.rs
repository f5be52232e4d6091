mod geometry;
pub mod native;

pub use geometry::resolve_dimensions;
pub use native::{BatchOrchestrator, CancelFlag, ConversionPipeline, NativeCodec, RasterCodec};
