use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use crate::utils::ConverterError;

/// Lossy output formats the encoder can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    WebP,
    JPEG,
}

impl OutputFormat {
    /// Get the canonical file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::JPEG => "jpg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::WebP => "image/webp",
            Self::JPEG => "image/jpeg",
        }
    }

    /// Largest side the encoder accepts, if the format has a hard limit
    pub fn max_dimension(&self) -> Option<u32> {
        match self {
            Self::WebP => Some(16383),
            Self::JPEG => Some(u16::MAX as u32),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ConverterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(Self::WebP),
            "jpg" | "jpeg" => Ok(Self::JPEG),
            other => Err(ConverterError::settings(format!(
                "Unsupported output format: {other}"
            ))),
        }
    }
}

/// Input extensions the native decoder is built with.
const DECODABLE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "webp", "gif", "bmp", "tif", "tiff",
];

/// Check whether a path looks like an image the decoder can read.
///
/// This only looks at the extension; the real check happens at decode time.
pub fn is_image_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| DECODABLE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}
