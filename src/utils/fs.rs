use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use crate::core::InputImage;
use crate::utils::{ConverterError, ConverterResult, is_image_path};

/// Reads a file into an [`InputImage`], named after its file name.
pub async fn read_input_image(path: impl AsRef<Path>) -> ConverterResult<InputImage> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .await
        .map_err(|e| ConverterError::io(format!("Failed to read {}: {e}", path.display())))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    Ok(InputImage::new(name, bytes))
}

/// Expands the given paths into image files, preserving argument order.
///
/// Directories are scanned one level deep and their entries sorted by name.
/// Anything that does not look like an image is skipped with a warning.
pub async fn collect_image_paths(paths: &[PathBuf]) -> ConverterResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let meta = fs::metadata(path)
            .await
            .map_err(|e| ConverterError::io(format!("Cannot access {}: {e}", path.display())))?;

        if meta.is_dir() {
            let mut entries = Vec::new();
            let mut dir = fs::read_dir(path).await?;
            while let Some(entry) = dir.next_entry().await? {
                let entry_path = entry.path();
                if entry.file_type().await?.is_file() && is_image_path(&entry_path) {
                    entries.push(entry_path);
                }
            }
            entries.sort();
            debug!("{}: {} image(s)", path.display(), entries.len());
            files.extend(entries);
        } else if is_image_path(path) {
            files.push(path.clone());
        } else {
            warn!("Skipping non-image file {}", path.display());
        }
    }

    Ok(files)
}

/// Writes `bytes` to `dir/name`, creating `dir` if needed.
pub async fn write_output(dir: impl AsRef<Path>, name: &str, bytes: &[u8]) -> ConverterResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)
        .await
        .map_err(|e| ConverterError::io(format!("Cannot create output directory: {e}")))?;

    let path = dir.join(name);
    fs::write(&path, bytes)
        .await
        .map_err(|e| ConverterError::io(format!("Failed to write {}: {e}", path.display())))?;
    Ok(path)
}

/// Human readable size: bytes below 1 KB, one decimal KB, two decimal MB.
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    }
}
