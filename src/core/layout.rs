// ─── Game Layout ───
// Fixed directory tree under the game data root (`.minecraft` equivalent).

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

/// Every on-disk location the pipeline reads or writes, derived from one root.
///
/// ```text
/// <root>/versions/<id>/<id>.jar
/// <root>/versions/<id>/<id>.json
/// <root>/versions/<id>/natives/
/// <root>/assets/indexes/<name>.json
/// <root>/assets/objects/<hash[0..2]>/<hash>
/// <root>/libraries/<artifact path>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameLayout {
    root: PathBuf,
}

impl GameLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn versions_dir(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_dir(&self, version_id: &str) -> PathBuf {
        self.versions_dir().join(version_id)
    }

    pub fn client_jar(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}.jar", version_id))
    }

    pub fn version_json(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id)
            .join(format!("{}.json", version_id))
    }

    pub fn natives_dir(&self, version_id: &str) -> PathBuf {
        self.version_dir(version_id).join("natives")
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn asset_indexes_dir(&self) -> PathBuf {
        self.assets_dir().join("indexes")
    }

    pub fn asset_index_file(&self, index_name: &str) -> PathBuf {
        self.asset_indexes_dir()
            .join(format!("{}.json", index_name))
    }

    pub fn asset_objects_dir(&self) -> PathBuf {
        self.assets_dir().join("objects")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.root.join("libraries")
    }

    /// Resolve a manifest-provided artifact path under `libraries/`.
    ///
    /// Returns `None` for absolute paths or paths that climb out with `..`.
    pub fn library_path(&self, relative: &str) -> Option<PathBuf> {
        if !is_contained_relative(Path::new(relative)) {
            return None;
        }
        Some(self.libraries_dir().join(relative))
    }

    /// Create the directory skeleton for `version_id`. Idempotent.
    pub async fn ensure(&self, version_id: &str) -> LauncherResult<()> {
        let dirs = [
            self.version_dir(version_id),
            self.natives_dir(version_id),
            self.asset_indexes_dir(),
            self.asset_objects_dir(),
            self.libraries_dir(),
        ];

        for dir in dirs {
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(LauncherError::io(&dir))?;
        }

        debug!("Game layout ready at {:?}", self.root);
        Ok(())
    }
}

/// True if `path` is relative and never escapes its base directory.
pub(crate) fn is_contained_relative(path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return false;
    }
    path.components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// True if `name` is usable as a single directory or file name: one normal
/// path component, no separators, not `.` or `..`.
pub(crate) fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}
