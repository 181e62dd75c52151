pub mod core;

use tracing_subscriber::EnvFilter;

use crate::core::config::LauncherConfig;
use crate::core::error::LauncherResult;
use crate::core::launch::JavaProcess;
use crate::core::pipeline::Pipeline;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mclaunch=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Prepare `version` and run it as `nickname`, returning the game's exit code.
pub async fn run(config: LauncherConfig, version: &str, nickname: &str) -> LauncherResult<i32> {
    tracing::info!("mclaunch {} starting", env!("CARGO_PKG_VERSION"));
    let pipeline = Pipeline::from_config(config)?;
    pipeline.launch(version, nickname, &JavaProcess).await
}
