// ─── Launch Pipeline ───
// Resolve → client jar → assets → libraries → compose → spawn.

use std::sync::Arc;

use tracing::info;

use crate::core::assets::AssetManager;
use crate::core::auth::LaunchAccountProfile;
use crate::core::config::LauncherConfig;
use crate::core::downloader::Downloader;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::{HttpSource, RemoteSource};
use crate::core::launch::{compose, LaunchPlan, ProcessSpawner};
use crate::core::layout::{is_plain_name, GameLayout};
use crate::core::libraries::LibraryMaterializer;
use crate::core::store::write_atomic;
use crate::core::version::ManifestResolver;

/// Everything one launch needs, wired from a [`LauncherConfig`].
pub struct Pipeline {
    config: LauncherConfig,
    layout: GameLayout,
    downloader: Downloader,
    resolver: ManifestResolver,
}

impl Pipeline {
    pub fn new(config: LauncherConfig, source: Arc<dyn RemoteSource>) -> Self {
        let layout = GameLayout::new(config.game_dir.clone());
        let downloader = Downloader::new(source.clone())
            .with_concurrency(config.concurrency)
            .with_verification(config.verify_hashes);
        let resolver = ManifestResolver::new(source, config.manifest_url.clone());
        Self {
            config,
            layout,
            downloader,
            resolver,
        }
    }

    /// Pipeline backed by the real HTTP client.
    pub fn from_config(config: LauncherConfig) -> LauncherResult<Self> {
        let source = HttpSource::new(config.retry_policy())?;
        Ok(Self::new(config, Arc::new(source)))
    }

    pub fn layout(&self) -> &GameLayout {
        &self.layout
    }

    /// Make `release_id` launchable and return the launch plan.
    ///
    /// Every download step is existence-gated, so a second call with the same
    /// id only re-reads the version index, the descriptor and the asset index.
    pub async fn prepare(&self, release_id: &str, nickname: &str) -> LauncherResult<LaunchPlan> {
        if !is_plain_name(release_id) {
            return Err(LauncherError::VersionNotFound(release_id.to_string()));
        }

        info!("Preparing {} in {:?}", release_id, self.layout.root());
        self.layout.ensure(release_id).await?;

        // 1. Version descriptor
        let resolved = self.resolver.resolve(release_id).await?;
        let descriptor = resolved.descriptor;
        write_atomic(&self.layout.version_json(release_id), &resolved.raw_json).await?;

        // 2. Client jar
        let client_jar = self.layout.client_jar(release_id);
        let outcome = self
            .downloader
            .ensure_file(
                &descriptor.client.url,
                &client_jar,
                descriptor.client.sha1.as_deref(),
            )
            .await?;
        if outcome.was_fetched() {
            info!("Downloaded client jar for {}", release_id);
        }

        // 3. Assets
        let report = AssetManager::sync(
            &descriptor.asset_index,
            &self.layout,
            &self.downloader,
            &self.config.resources_url,
        )
        .await?;
        info!(
            "Assets {}: {} objects, {} distinct, {} downloaded",
            report.index_name, report.objects, report.distinct, report.fetched
        );

        // 4. Libraries
        let libraries = LibraryMaterializer::new(
            &self.layout,
            &self.downloader,
            release_id,
            self.config.platform,
        )
        .materialize(&descriptor.libraries)
        .await?;

        // 5. Command line
        let account = LaunchAccountProfile::offline(nickname);
        Ok(compose(
            &descriptor,
            libraries.classpath,
            client_jar,
            &self.layout,
            &account,
            &self.config.launch_options(),
        ))
    }

    /// Prepare, then run the game and return its exit code.
    pub async fn launch(
        &self,
        release_id: &str,
        nickname: &str,
        spawner: &dyn ProcessSpawner,
    ) -> LauncherResult<i32> {
        let plan = self.prepare(release_id, nickname).await?;
        info!("Launching {} as {}", release_id, nickname);
        spawner.run(&plan).await
    }
}
