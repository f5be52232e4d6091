//! Core types for conversion parameters and results.

use std::sync::Arc;
use serde::Serialize;
use tracing::warn;

use crate::core::InputImage;
use crate::utils::{ConverterError, ErrorKind, OutputFormat};

/// Width used when a width target is missing or not positive.
pub const DEFAULT_TARGET_WIDTH: u32 = 800;
/// Height used when a height target is missing or not positive.
pub const DEFAULT_TARGET_HEIGHT: u32 = 600;
/// Quality used when none is configured.
pub const DEFAULT_QUALITY: f32 = 0.8;

/// Rule for computing output dimensions from the decoded dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum ResizePolicy {
    /// Keep the original dimensions
    #[default]
    NoResize,
    /// Fix the width, scale the height proportionally
    FixedWidth { width: u32 },
    /// Fix the height, scale the width proportionally
    FixedHeight { height: u32 },
    /// Force both sides, ignoring aspect ratio
    FixedBoth { width: u32, height: u32 },
}

impl ResizePolicy {
    pub fn fixed_width(width: i64) -> Self {
        Self::FixedWidth { width: target_or(width, DEFAULT_TARGET_WIDTH) }
    }

    pub fn fixed_height(height: i64) -> Self {
        Self::FixedHeight { height: target_or(height, DEFAULT_TARGET_HEIGHT) }
    }

    pub fn fixed_both(width: i64, height: i64) -> Self {
        Self::FixedBoth {
            width: target_or(width, DEFAULT_TARGET_WIDTH),
            height: target_or(height, DEFAULT_TARGET_HEIGHT),
        }
    }

    /// Replaces zero targets with the defaults.
    ///
    /// Policies built directly from the enum variants skip the fallback done
    /// by the constructors; [`ConversionParams::new`] normalises them.
    pub fn normalized(self) -> Self {
        match self {
            Self::NoResize => Self::NoResize,
            Self::FixedWidth { width } => Self::fixed_width(width as i64),
            Self::FixedHeight { height } => Self::fixed_height(height as i64),
            Self::FixedBoth { width, height } => Self::fixed_both(width as i64, height as i64),
        }
    }
}

fn target_or(value: i64, default: u32) -> u32 {
    if value > 0 {
        u32::try_from(value).unwrap_or(u32::MAX)
    } else {
        default
    }
}

/// Parameters for one batch run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConversionParams {
    quality: f32,
    policy: ResizePolicy,
    format: OutputFormat,
}

impl ConversionParams {
    /// Creates parameters targeting WebP.
    ///
    /// Quality is clamped into `[0, 1]`; NaN becomes the default quality.
    pub fn new(quality: f32, policy: ResizePolicy) -> Self {
        let clamped = if quality.is_nan() {
            DEFAULT_QUALITY
        } else {
            quality.clamp(0.0, 1.0)
        };
        if clamped != quality {
            warn!("Quality {quality} outside [0, 1], using {clamped}");
        }

        Self {
            quality: clamped,
            policy: policy.normalized(),
            format: OutputFormat::WebP,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }
}

impl Default for ConversionParams {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY, ResizePolicy::NoResize)
    }
}

/// A successfully converted image.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    input: InputImage,
    output_name: String,
    output: Arc<[u8]>,
    format: OutputFormat,
    width: u32,
    height: u32,
}

impl ConversionResult {
    pub(crate) fn new(
        input: InputImage,
        output_name: String,
        output: Vec<u8>,
        format: OutputFormat,
        (width, height): (u32, u32),
    ) -> Self {
        Self {
            input,
            output_name,
            output: output.into(),
            format,
            width,
            height,
        }
    }

    pub fn input(&self) -> &InputImage {
        &self.input
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn output_bytes(&self) -> &[u8] {
        &self.output
    }

    pub(crate) fn shared_output(&self) -> Arc<[u8]> {
        Arc::clone(&self.output)
    }

    pub fn output_size(&self) -> u64 {
        self.output.len() as u64
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Output dimensions in pixels
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size saved relative to the input as a percentage (negative if it grew)
    pub fn size_reduction_percent(&self) -> f64 {
        let original = self.input.size();
        if original == 0 {
            return 0.0;
        }
        (1.0 - self.output_size() as f64 / original as f64) * 100.0
    }
}

/// An input that failed to convert, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub input: InputImage,
    pub error: ConverterError,
}

impl FailureRecord {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// Terminal report of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Number of inputs in the batch
    pub total: usize,
    /// Number of inputs the run attempted, successful or not
    pub attempted: usize,
    /// Successful conversions in input order
    pub results: Vec<ConversionResult>,
    /// Failed conversions in input order
    pub failures: Vec<FailureRecord>,
    /// Whether the run stopped before attempting every input
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn total_input_bytes(&self) -> u64 {
        self.results.iter().map(|r| r.input().size()).sum()
    }

    pub fn total_output_bytes(&self) -> u64 {
        self.results.iter().map(|r| r.output_size()).sum()
    }
}
