// ─── Launcher Configuration ───
// Defaults plus `MCLAUNCH_*` environment overrides.

use std::path::PathBuf;
use std::str::FromStr;

use crate::core::assets::RESOURCES_URL;
use crate::core::downloader::DEFAULT_CONCURRENCY;
use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::RetryPolicy;
use crate::core::launch::{locate_java_binary, LaunchOptions, DEFAULT_MAX_MEMORY};
use crate::core::platform::Platform;
use crate::core::version::VERSION_MANIFEST_URL;

const GAME_DIR_NAME: &str = ".minecraft";

pub const ENV_GAME_DIR: &str = "MCLAUNCH_GAME_DIR";
pub const ENV_MANIFEST_URL: &str = "MCLAUNCH_MANIFEST_URL";
pub const ENV_RESOURCES_URL: &str = "MCLAUNCH_RESOURCES_URL";
pub const ENV_CONCURRENCY: &str = "MCLAUNCH_CONCURRENCY";
pub const ENV_VERIFY_HASHES: &str = "MCLAUNCH_VERIFY_HASHES";
pub const ENV_JAVA: &str = "MCLAUNCH_JAVA";
pub const ENV_MAX_MEMORY: &str = "MCLAUNCH_MAX_MEMORY";
pub const ENV_PLATFORM: &str = "MCLAUNCH_PLATFORM";
pub const ENV_RETRIES: &str = "MCLAUNCH_RETRIES";

#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Root of the on-disk layout; always absolute.
    pub game_dir: PathBuf,
    pub manifest_url: String,
    pub resources_url: String,
    /// Upper bound on in-flight downloads per batch.
    pub concurrency: usize,
    /// Check SHA-1 of freshly downloaded files when the manifest lists one.
    pub verify_hashes: bool,
    /// Attempts per request, including the first.
    pub retries: u32,
    pub java_binary: PathBuf,
    pub max_memory: String,
    /// Target platform for library selection and classpath joining.
    pub platform: Platform,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            game_dir: default_game_dir(),
            manifest_url: VERSION_MANIFEST_URL.into(),
            resources_url: RESOURCES_URL.into(),
            concurrency: DEFAULT_CONCURRENCY,
            verify_hashes: true,
            retries: RetryPolicy::default().max_attempts,
            java_binary: PathBuf::from("java"),
            max_memory: DEFAULT_MAX_MEMORY.into(),
            platform: Platform::current(),
        }
    }
}

impl LauncherConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> LauncherResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> LauncherResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        config.game_dir = match get(ENV_GAME_DIR) {
            Some(dir) => absolutize(PathBuf::from(dir))?,
            None => game_dir_under(dirs::home_dir())?,
        };
        if let Some(url) = get(ENV_MANIFEST_URL) {
            config.manifest_url = url;
        }
        if let Some(url) = get(ENV_RESOURCES_URL) {
            config.resources_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = get(ENV_CONCURRENCY) {
            let n: usize = parse_value(ENV_CONCURRENCY, &raw)?;
            if n == 0 {
                return Err(LauncherError::Config(format!(
                    "{ENV_CONCURRENCY} must be at least 1"
                )));
            }
            config.concurrency = n;
        }
        if let Some(raw) = get(ENV_VERIFY_HASHES) {
            config.verify_hashes = parse_flag(ENV_VERIFY_HASHES, &raw)?;
        }
        if let Some(raw) = get(ENV_RETRIES) {
            config.retries = parse_value(ENV_RETRIES, &raw)?;
        }
        if let Some(mem) = get(ENV_MAX_MEMORY) {
            config.max_memory = mem;
        }
        if let Some(raw) = get(ENV_PLATFORM) {
            config.platform = raw.parse()?;
        }

        config.java_binary = match get(ENV_JAVA) {
            Some(java) => PathBuf::from(java),
            None => locate_java_binary(get("JAVA_HOME").map(PathBuf::from).as_deref()),
        };

        Ok(config)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::attempts(self.retries)
    }

    pub fn launch_options(&self) -> LaunchOptions {
        LaunchOptions {
            java_binary: self.java_binary.clone(),
            max_memory: self.max_memory.clone(),
            platform: self.platform,
        }
    }
}

fn default_game_dir() -> PathBuf {
    let home = dirs::home_dir();
    game_dir_under(home.clone())
        .unwrap_or_else(|_| home.unwrap_or_default().join(GAME_DIR_NAME))
}

/// `<home>/.minecraft`, or `./.minecraft` made absolute when there is no home.
fn game_dir_under(home: Option<PathBuf>) -> LauncherResult<PathBuf> {
    let base = home.unwrap_or_else(|| PathBuf::from("."));
    absolutize(base.join(GAME_DIR_NAME))
}

fn absolutize(path: PathBuf) -> LauncherResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(LauncherError::io("."))?;
    Ok(cwd.join(path))
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> LauncherResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| LauncherError::Config(format!("invalid value for {key}: {raw:?}")))
}

fn parse_flag(key: &str, raw: &str) -> LauncherResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LauncherError::Config(format!(
            "invalid value for {key}: {raw:?}"
        ))),
    }
}
