use std::collections::HashSet;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::utils::{ConverterError, ConverterResult};
use super::{ArchiveBundler, ArchiveEntry};

/// Writes entries into an in-memory ZIP archive.
///
/// Entries are stored uncompressed by default: encoded images do not shrink
/// further and storing keeps bundling fast.
#[derive(Debug, Clone, Copy)]
pub struct ZipBundler {
    compression: CompressionMethod,
}

impl ZipBundler {
    pub fn new() -> Self {
        Self {
            compression: CompressionMethod::Stored,
        }
    }

    pub fn deflated() -> Self {
        Self {
            compression: CompressionMethod::Deflated,
        }
    }
}

impl Default for ZipBundler {
    fn default() -> Self {
        Self::new()
    }
}

fn archive_err(e: impl std::fmt::Display) -> ConverterError {
    ConverterError::archive(format!("ZIP write failed: {e}"))
}

impl ArchiveBundler for ZipBundler {
    fn bundle(&self, entries: &[ArchiveEntry]) -> ConverterResult<Vec<u8>> {
        let mut seen = HashSet::with_capacity(entries.len());
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(self.compression);

        for entry in entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(ConverterError::archive(format!("Duplicate entry name: {}", entry.name)));
            }
            writer.start_file(entry.name.as_str(), options).map_err(archive_err)?;
            writer.write_all(&entry.bytes).map_err(archive_err)?;
            debug!("Added {} ({} bytes)", entry.name, entry.bytes.len());
        }

        let cursor = writer.finish().map_err(archive_err)?;
        Ok(cursor.into_inner())
    }
}
