// ─── Library Materializer ───
// Fetches classpath jars and native bundles for one release and target platform.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::downloader::{run_ordered, Downloader};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::GameLayout;
use crate::core::platform::Platform;
use crate::core::version::{DependencyEntry, LibraryArtifact};

use super::natives::expand_native_bundle;

/// Classpath jars (descriptor order) plus bookkeeping about native bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializedLibraries {
    /// Absolute jar paths in descriptor order. Never contains native bundles.
    pub classpath: Vec<PathBuf>,
    /// Native bundles downloaded and expanded during this run.
    pub expanded_natives: Vec<PathBuf>,
}

/// What one dependency entry produced.
#[derive(Debug, Default)]
struct LibraryOutcome {
    classpath_entry: Option<PathBuf>,
    expanded_bundle: Option<PathBuf>,
}

pub struct LibraryMaterializer<'a> {
    layout: &'a GameLayout,
    downloader: &'a Downloader,
    natives_dir: PathBuf,
    platform: Platform,
}

impl<'a> LibraryMaterializer<'a> {
    pub fn new(
        layout: &'a GameLayout,
        downloader: &'a Downloader,
        version_id: &str,
        platform: Platform,
    ) -> Self {
        Self {
            layout,
            downloader,
            natives_dir: layout.natives_dir(version_id),
            platform,
        }
    }

    /// Ensure every library allowed on the target platform is on disk.
    ///
    /// For each entry: the primary artifact is fetched if absent and added to
    /// the classpath; the platform variant is fetched if absent and, only when
    /// it was fetched in this run, expanded into the natives directory. A
    /// bundle left on disk unexpanded by an interrupted run is not expanded
    /// again until the bundle file itself is removed.
    pub async fn materialize(
        &self,
        libraries: &[DependencyEntry],
    ) -> LauncherResult<MaterializedLibraries> {
        let allowed: Vec<&DependencyEntry> = libraries
            .iter()
            .filter(|lib| {
                let allowed = lib.is_allowed_on(self.platform);
                if !allowed {
                    debug!("Skipping library (OS rule): {}", lib.name);
                }
                allowed
            })
            .collect();

        let outcomes = run_ordered(
            "library",
            allowed,
            self.downloader.concurrency(),
            move |lib| self.materialize_one(lib),
        )
        .await?;

        let mut result = MaterializedLibraries::default();
        for outcome in outcomes {
            result.classpath.extend(outcome.classpath_entry);
            result.expanded_natives.extend(outcome.expanded_bundle);
        }

        info!(
            "Processed {} libraries ({} on classpath, {} native bundles expanded) for {}",
            libraries.len(),
            result.classpath.len(),
            result.expanded_natives.len(),
            self.platform
        );
        Ok(result)
    }

    async fn materialize_one(&self, lib: &DependencyEntry) -> LauncherResult<LibraryOutcome> {
        let mut outcome = LibraryOutcome::default();

        // ── Main artifact ──
        if let Some(artifact) = &lib.artifact {
            let dest = self.local_path(lib, artifact)?;
            self.downloader
                .ensure_file(&artifact.url, &dest, artifact.sha1.as_deref())
                .await?;
            outcome.classpath_entry = Some(dest);
        }

        // ── Native classifier ──
        if let Some(native) = lib.platform_variant(self.platform) {
            let dest = self.local_path(lib, native)?;
            let fetched = self
                .downloader
                .ensure_file(&native.url, &dest, native.sha1.as_deref())
                .await?;

            if fetched.was_fetched() {
                let files = expand_native_bundle(
                    dest.clone(),
                    self.natives_dir.clone(),
                    lib.extract_exclude.clone(),
                )
                .await?;
                debug!("Expanded {} files from {:?}", files.len(), dest);
                outcome.expanded_bundle = Some(dest);
            }
        }

        Ok(outcome)
    }

    fn local_path(&self, lib: &DependencyEntry, artifact: &LibraryArtifact) -> LauncherResult<PathBuf> {
        self.layout
            .library_path(&artifact.path)
            .ok_or_else(|| LauncherError::MalformedManifest {
                document: format!("library {}", lib.name),
                field: "downloads.path",
            })
    }
}
