//! Core converter types and state management.
//!
//! This module contains the fundamental types used throughout the crate:
//! - [`InputImage`]: One source image (name and shared bytes)
//! - [`ConversionParams`] / [`ResizePolicy`]: What a batch run does to each image
//! - [`ConversionResult`] / [`FailureRecord`] / [`BatchSummary`]: What a run produced
//! - [`ConverterSession`]: Caller-owned state across runs
//! - [`BatchEvent`]: Progress tracking for batch runs
//! - [`ConversionSettings`]: Serde-facing configuration

mod input;
mod progress;
mod settings;
mod state;
mod types;

pub use input::InputImage;
pub use progress::{
    BatchEvent, ChannelEmitter, ItemOutcome, ProgressEmitter, ProgressUpdate, percent, progress_channel,
};
pub use settings::{ConversionSettings, ResizeMode, ResizeSettings};
pub use state::ConverterSession;
pub use types::{
    BatchSummary, ConversionParams, ConversionResult, DEFAULT_QUALITY, DEFAULT_TARGET_HEIGHT,
    DEFAULT_TARGET_WIDTH, FailureRecord, ResizePolicy,
};
