// ─── Manifest Resolver ───
// Walks the manifest chain: global index → release descriptor.

use std::sync::Arc;

use tracing::info;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::RemoteSource;

use super::manifest::VersionManifest;
use super::version_file::ReleaseDescriptor;

/// A parsed descriptor plus the exact bytes it was parsed from.
#[derive(Debug, Clone)]
pub struct ResolvedRelease {
    pub descriptor: ReleaseDescriptor,
    pub raw_json: Vec<u8>,
}

pub struct ManifestResolver {
    source: Arc<dyn RemoteSource>,
    manifest_url: String,
}

impl ManifestResolver {
    pub fn new(source: Arc<dyn RemoteSource>, manifest_url: impl Into<String>) -> Self {
        Self {
            source,
            manifest_url: manifest_url.into(),
        }
    }

    /// Resolve `release_id` to its descriptor.
    ///
    /// Two network reads, no writes. Fails with `VersionNotFound` before any
    /// descriptor request when the id is absent from the index.
    pub async fn resolve(&self, release_id: &str) -> LauncherResult<ResolvedRelease> {
        let manifest = VersionManifest::fetch(self.source.as_ref(), &self.manifest_url).await?;

        let entry = manifest
            .find_version(release_id)
            .ok_or_else(|| LauncherError::VersionNotFound(release_id.to_string()))?;

        info!("Resolving version {} from {}", release_id, entry.url);
        let raw_json = self.source.fetch(&entry.url).await?;
        let descriptor = ReleaseDescriptor::parse(release_id, &raw_json)?;

        info!(
            "Version {} ({}) has {} libraries, asset index {}",
            descriptor.id,
            descriptor.release_type,
            descriptor.libraries.len(),
            descriptor.asset_index.id
        );
        Ok(ResolvedRelease {
            descriptor,
            raw_json,
        })
    }
}
