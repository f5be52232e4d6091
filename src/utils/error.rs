//! Error types for the converter.
//!
//! Provides a flat error enum using `thiserror`. Per-image errors (`Decode`,
//! `Encode`) are captured by the batch orchestrator and turned into
//! [`FailureRecord`](crate::core::FailureRecord)s; only archive and host I/O
//! errors ever reach the caller of a top-level action.

use std::io;
use serde::Serialize;
use thiserror::Error;

/// Main error type for the converter.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "camelCase")]
pub enum ConverterError {
    /// Input bytes could not be interpreted as a raster image
    #[error("Decode error: {0}")]
    Decode(String),

    /// The output encoder refused the surface or produced no output
    #[error("Encode error: {0}")]
    Encode(String),

    /// The archive bundler failed to produce an archive
    #[error("Archive error: {0}")]
    Archive(String),

    /// File IO error on the host side
    #[error("IO error: {0}")]
    IO(String),

    /// Settings could not be loaded or parsed
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Payload-free discriminant of [`ConverterError`], stored with failure records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Decode,
    Encode,
    Archive,
    IO,
    Settings,
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

// Helper methods for error creation
impl ConverterError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn archive<T: Into<String>>(msg: T) -> Self {
        Self::Archive(msg.into())
    }

    pub fn io<T: Into<String>>(msg: T) -> Self {
        Self::IO(msg.into())
    }

    pub fn settings<T: Into<String>>(msg: T) -> Self {
        Self::Settings(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::Decode,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Archive(_) => ErrorKind::Archive,
            Self::IO(_) => ErrorKind::IO,
            Self::Settings(_) => ErrorKind::Settings,
        }
    }
}

// Convert std::io::Error to ConverterError
impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<serde_json::Error> for ConverterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Settings(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_variant() {
        assert_eq!(ConverterError::decode("x").kind(), ErrorKind::Decode);
        assert_eq!(ConverterError::encode("x").kind(), ErrorKind::Encode);
        assert_eq!(ConverterError::archive("x").kind(), ErrorKind::Archive);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(ConverterError::decode("bad header")).unwrap();
        assert_eq!(json["kind"], "decode");
        assert_eq!(json["message"], "bad header");
    }

    #[test]
    fn io_errors_convert() {
        let err: ConverterError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), ErrorKind::IO);
    }
}
