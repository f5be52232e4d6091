//! Bundling results into one downloadable archive.
//!
//! The converter only hands over named byte blobs; the container format is
//! the bundler's business. [`ZipBundler`] is the default implementation.

mod zip_bundler;

use std::sync::Arc;
use tracing::info;

use crate::core::ConverterSession;
use crate::utils::{ConverterError, ConverterResult};

pub use zip_bundler::ZipBundler;

/// Default file name for an archive of all results.
pub const DEFAULT_ARCHIVE_NAME: &str = "webp_images.zip";

/// One named file inside an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Arc<[u8]>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Packs named blobs into a single archive blob.
pub trait ArchiveBundler {
    fn bundle(&self, entries: &[ArchiveEntry]) -> ConverterResult<Vec<u8>>;
}

/// Bundles every result currently held by `session`.
///
/// Fails with [`ConverterError::Archive`] when there is nothing to bundle or
/// the bundler fails; the session's results are untouched either way.
pub fn bundle_session(session: &ConverterSession, bundler: &dyn ArchiveBundler) -> ConverterResult<Vec<u8>> {
    let entries = session.archive_entries();
    if entries.is_empty() {
        return Err(ConverterError::archive("No converted images to bundle"));
    }

    let archive = bundler.bundle(&entries)?;
    info!("Bundled {} file(s) into a {} byte archive", entries.len(), archive.len());
    Ok(archive)
}
