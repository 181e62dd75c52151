// ─── Content Store ───
// Hash-addressed blobs under `assets/objects/<hash[0..2]>/<hash>`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Content-addressed object store.
///
/// An object's path is a pure function of its hash, so two asset names that
/// share a hash share one file. Presence on disk is the only completeness
/// signal: writes go through [`write_atomic`], which never leaves a partial
/// file at the final path.
#[derive(Debug, Clone)]
pub struct ContentStore {
    objects_dir: PathBuf,
}

impl ContentStore {
    pub fn new(objects_dir: impl Into<PathBuf>) -> Self {
        Self {
            objects_dir: objects_dir.into(),
        }
    }

    pub fn objects_dir(&self) -> &Path {
        &self.objects_dir
    }

    /// Storage path for `hash`, sharded on its first two characters.
    pub fn object_path(&self, hash: &str) -> LauncherResult<PathBuf> {
        validate_hash(hash)?;
        Ok(self.objects_dir.join(&hash[..2]).join(hash))
    }

    pub fn contains(&self, hash: &str) -> LauncherResult<bool> {
        Ok(self.object_path(hash)?.is_file())
    }

    /// Store `bytes` under `hash`. Overwrites an existing object atomically.
    pub async fn put(&self, hash: &str, bytes: &[u8]) -> LauncherResult<PathBuf> {
        let dest = self.object_path(hash)?;
        write_atomic(&dest, bytes).await?;
        Ok(dest)
    }
}

/// `hash[0..2]` must be a valid shard and the hash a single path segment.
fn validate_hash(hash: &str) -> LauncherResult<()> {
    if hash.len() >= 2 && hash.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(LauncherError::MalformedManifest {
            document: format!("asset object `{}`", hash),
            field: "hash",
        })
    }
}

/// Write `bytes` to a sibling temp file, then rename it over `dest`.
///
/// Creates parent directories as needed. The temp file handle is dropped
/// before the rename (required on Windows).
pub async fn write_atomic(dest: &Path, bytes: &[u8]) -> LauncherResult<()> {
    let parent = dest.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(LauncherError::io(parent))?;

    let file_name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let tmp = parent.join(format!(
        ".{}.{}-{}.part",
        file_name,
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    ));

    {
        let mut file = tokio::fs::File::create(&tmp)
            .await
            .map_err(LauncherError::io(&tmp))?;
        file.write_all(bytes).await.map_err(LauncherError::io(&tmp))?;
        file.flush().await.map_err(LauncherError::io(&tmp))?;
    }

    if let Err(source) = tokio::fs::rename(&tmp, dest).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(LauncherError::Io {
            path: dest.to_path_buf(),
            source,
        });
    }

    debug!("Wrote {} bytes to {:?}", bytes.len(), dest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_shards_on_hash_prefix() {
        let store = ContentStore::new("/mc/assets/objects");
        assert_eq!(
            store.object_path("abcd1234").unwrap(),
            PathBuf::from("/mc/assets/objects/ab/abcd1234")
        );
    }

    #[test]
    fn rejects_hashes_that_are_not_a_single_segment() {
        let store = ContentStore::new("/mc/assets/objects");
        assert!(store.object_path("a").is_err());
        assert!(store.object_path("../../etc").is_err());
        assert!(store.object_path("ab/cd").is_err());
    }

    #[tokio::test]
    async fn put_then_contains() {
        let temp = tempfile::tempdir().unwrap();
        let store = ContentStore::new(temp.path().join("objects"));

        assert!(!store.contains("ffee0011").unwrap());
        let path = store.put("ffee0011", b"payload").await.unwrap();

        assert!(store.contains("ffee0011").unwrap());
        assert_eq!(std::fs::read(path).unwrap(), b"payload");
    }

    #[tokio::test]
    async fn write_atomic_leaves_no_temp_files_behind() {
        let temp = tempfile::tempdir().unwrap();
        let dest = temp.path().join("nested").join("file.bin");

        write_atomic(&dest, b"first").await.unwrap();
        write_atomic(&dest, b"second").await.unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"second");
        let leftovers: Vec<_> = std::fs::read_dir(dest.parent().unwrap())
            .unwrap()
            .flatten()
            .filter(|e| e.file_name().to_string_lossy().ends_with(".part"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
