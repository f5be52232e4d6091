// Module declarations in dependency order
pub mod utils;
pub mod core;
pub mod processing;
pub mod archive;

// Public exports for external consumers
pub use crate::core::{
    BatchEvent, BatchSummary, ConversionParams, ConversionResult, ConversionSettings, ConverterSession,
    FailureRecord, InputImage, ProgressEmitter, ProgressUpdate, ResizePolicy, progress_channel,
};
pub use processing::{BatchOrchestrator, CancelFlag, ConversionPipeline, NativeCodec, RasterCodec, resolve_dimensions};
pub use archive::{ArchiveBundler, ArchiveEntry, ZipBundler, bundle_session};
pub use utils::{ConverterError, ConverterResult, ErrorKind, OutputFormat};

// This library file is the public API; the command-line host lives in main.rs.
