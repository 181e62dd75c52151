// ─── Native Bundles ───
// Expands platform-specific native jars into a version's natives directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

/// Extract every entry of the zip at `archive_path` into `dest_dir`,
/// skipping entries whose name starts with one of `exclude`.
///
/// Directory structure inside the archive is preserved. Entries that would
/// land outside `dest_dir` (absolute names, `..`) abort the extraction.
pub fn extract_archive(
    archive_path: &Path,
    dest_dir: &Path,
    exclude: &[String],
) -> LauncherResult<Vec<PathBuf>> {
    let file = std::fs::File::open(archive_path).map_err(LauncherError::io(archive_path))?;
    let mut archive = zip::ZipArchive::new(std::io::BufReader::new(file))?;
    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let name = entry.name().to_string();

        if exclude.iter().any(|prefix| name.starts_with(prefix.as_str())) {
            continue;
        }

        let Some(relative) = entry.enclosed_name() else {
            return Err(LauncherError::UnsafeArchiveEntry {
                archive: archive_path.to_path_buf(),
                entry: name,
            });
        };
        let target = dest_dir.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&target).map_err(LauncherError::io(&target))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).map_err(LauncherError::io(parent))?;
        }
        let mut out = std::fs::File::create(&target).map_err(LauncherError::io(&target))?;
        std::io::copy(&mut entry, &mut out).map_err(LauncherError::io(&target))?;
        debug!("Extracted native: {}", name);
        extracted.push(target);
    }

    Ok(extracted)
}

/// Async wrapper running [`extract_archive`] on the blocking pool.
pub async fn expand_native_bundle(
    archive_path: PathBuf,
    dest_dir: PathBuf,
    exclude: Vec<String>,
) -> LauncherResult<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || extract_archive(&archive_path, &dest_dir, &exclude))
        .await
        .map_err(|e| {
            LauncherError::Io {
                path: PathBuf::new(),
                source: std::io::Error::other(format!("native extraction task failed: {e}")),
            }
        })?
}
