//! User-facing conversion settings.
//!
//! Settings mirror the shape the configuration UI sends: a quality value,
//! a resize block with a mode string and optional targets, and an output
//! format. They are loose on purpose (raw integers, optional fields) and are
//! turned into validated [`ConversionParams`] with [`ConversionSettings::to_params`].

use std::path::Path;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::core::{ConversionParams, DEFAULT_QUALITY, ResizePolicy};
use crate::utils::{ConverterError, ConverterResult, OutputFormat};

/// Configuration settings for one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionSettings {
    /// Encoder quality in `[0, 1]`
    #[serde(default = "default_quality")]
    pub quality: f32,
    /// Resize settings for image dimensions
    #[serde(default)]
    pub resize: ResizeSettings,
    /// Output format ("webp" or "jpeg")
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_quality() -> f32 {
    DEFAULT_QUALITY
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            resize: ResizeSettings::default(),
            output_format: OutputFormat::WebP,
        }
    }
}

/// Resize mode selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    #[default]
    None,
    Width,
    Height,
    Both,
}

impl FromStr for ResizeMode {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "width" => Ok(Self::Width),
            "height" => Ok(Self::Height),
            "both" => Ok(Self::Both),
            other => Err(ConverterError::settings(format!("Unknown resize mode: {other}"))),
        }
    }
}

/// Resize settings for image dimensions.
///
/// Targets are kept signed so that zero or negative values coming from a
/// form field fall back to the defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResizeSettings {
    #[serde(default)]
    pub mode: ResizeMode,
    /// Target width in pixels
    pub width: Option<i64>,
    /// Target height in pixels
    pub height: Option<i64>,
}

impl ResizeSettings {
    pub fn to_policy(&self) -> ResizePolicy {
        let width = self.width.unwrap_or(0);
        let height = self.height.unwrap_or(0);
        match self.mode {
            ResizeMode::None => ResizePolicy::NoResize,
            ResizeMode::Width => ResizePolicy::fixed_width(width),
            ResizeMode::Height => ResizePolicy::fixed_height(height),
            ResizeMode::Both => ResizePolicy::fixed_both(width, height),
        }
    }
}

impl ConversionSettings {
    /// Loads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> ConverterResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConverterError::settings(format!("Cannot read {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> ConverterResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_params(&self) -> ConversionParams {
        ConversionParams::new(self.quality, self.resize.to_policy()).with_format(self.output_format)
    }
}
