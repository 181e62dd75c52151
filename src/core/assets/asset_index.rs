use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;
use tracing::info;

use crate::core::downloader::{run_ordered, Downloader};
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::GameLayout;
use crate::core::store::{write_atomic, ContentStore};
use crate::core::version::AssetIndexRef;

pub const RESOURCES_URL: &str = "https://resources.download.minecraft.net";

/// Manages Minecraft asset downloads (sounds, textures referenced by asset index).
pub struct AssetManager;

/// Top-level asset index JSON structure.
#[derive(Debug, Deserialize)]
pub struct AssetIndex {
    #[serde(default)]
    pub objects: Option<HashMap<String, AssetObject>>,
}

#[derive(Debug, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    #[serde(default)]
    pub size: Option<u64>,
}

impl AssetIndex {
    /// Each stored hash once, regardless of how many names point at it.
    pub fn distinct_hashes(objects: &HashMap<String, AssetObject>) -> BTreeSet<&str> {
        objects.values().map(|obj| obj.hash.as_str()).collect()
    }
}

/// What a sync run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub index_name: String,
    /// Named entries in the index.
    pub objects: usize,
    /// Distinct hashes among them.
    pub distinct: usize,
    /// Objects fetched this run (the rest were already stored).
    pub fetched: usize,
}

/// Download URL for an object: `<base>/<hash[0..2]>/<hash>`.
pub fn object_url(resources_url: &str, hash: &str) -> String {
    format!(
        "{}/{}/{}",
        resources_url.trim_end_matches('/'),
        &hash[..2.min(hash.len())],
        hash
    )
}

impl AssetManager {
    /// Download the asset index JSON and every object it references that is
    /// not already in the content store.
    ///
    /// The index file itself is rewritten on every run.
    pub async fn sync(
        index_ref: &AssetIndexRef,
        layout: &GameLayout,
        downloader: &Downloader,
        resources_url: &str,
    ) -> LauncherResult<SyncReport> {
        // 1. Download and save the asset index JSON
        let index_bytes = downloader
            .fetch_verified(&index_ref.url, index_ref.sha1.as_deref())
            .await?;
        let index_path = layout.asset_index_file(&index_ref.id);
        write_atomic(&index_path, &index_bytes).await?;

        let index: AssetIndex = serde_json::from_slice(&index_bytes)?;
        let objects = index
            .objects
            .ok_or_else(|| LauncherError::MalformedManifest {
                document: format!("asset index {}", index_ref.id),
                field: "objects",
            })?;

        // 2. Work list: distinct hashes not yet stored
        let store = ContentStore::new(layout.asset_objects_dir());
        let distinct = AssetIndex::distinct_hashes(&objects);
        let mut missing = Vec::new();
        for hash in &distinct {
            if !store.contains(hash)? {
                missing.push(hash.to_string());
            }
        }

        info!(
            "Downloading {} asset objects ({} already cached, {} names in index {})",
            missing.len(),
            distinct.len() - missing.len(),
            objects.len(),
            index_ref.id
        );

        // 3. Fetch concurrently
        let fetched = missing.len();
        let store = &store;
        run_ordered("asset", missing, downloader.concurrency(), move |hash| async move {
            let url = object_url(resources_url, &hash);
            let bytes = downloader.fetch_verified(&url, Some(&hash)).await?;
            store.put(&hash, &bytes).await?;
            Ok(())
        })
        .await?;

        Ok(SyncReport {
            index_name: index_ref.id.clone(),
            objects: objects.len(),
            distinct: distinct.len(),
            fetched,
        })
    }
}
