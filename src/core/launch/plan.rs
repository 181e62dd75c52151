// ─── Launch Plan ───
// Assembles the classpath and full Java command line for a resolved release.

use std::path::{Path, PathBuf};

use crate::core::auth::LaunchAccountProfile;
use crate::core::layout::GameLayout;
use crate::core::platform::Platform;
use crate::core::version::ReleaseDescriptor;

pub const LAUNCHER_BRAND: &str = "mclaunch";
pub const LAUNCHER_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DEFAULT_MAX_MEMORY: &str = "2G";
const THREAD_STACK_SIZE: &str = "1M";

/// Knobs for the JVM side of the command line.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub java_binary: PathBuf,
    /// `-Xmx` value, e.g. `2G` or `4096M`.
    pub max_memory: String,
    /// Platform the process runs on; decides the classpath separator.
    pub platform: Platform,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            java_binary: PathBuf::from("java"),
            max_memory: DEFAULT_MAX_MEMORY.into(),
            platform: Platform::current(),
        }
    }
}

/// Everything needed to start the game process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub java_binary: PathBuf,
    /// JVM flags preceding `-cp`.
    pub jvm_args: Vec<String>,
    /// Libraries in descriptor order, client jar last.
    pub classpath: Vec<PathBuf>,
    pub main_class: String,
    /// Arguments after the main class.
    pub game_args: Vec<String>,
    pub natives_dir: PathBuf,
    /// Working directory for the process.
    pub game_dir: PathBuf,
    pub platform: Platform,
}

impl LaunchPlan {
    /// Classpath joined with the target platform's separator.
    pub fn classpath_string(&self) -> String {
        self.classpath
            .iter()
            .map(|p| path_arg(p))
            .collect::<Vec<_>>()
            .join(self.platform.classpath_separator())
    }

    /// Full argument vector (without the java binary itself).
    pub fn arguments(&self) -> Vec<String> {
        let mut args = self.jvm_args.clone();
        args.push("-cp".into());
        args.push(self.classpath_string());
        args.push(self.main_class.clone());
        args.extend(self.game_args.iter().cloned());
        args
    }
}

/// Compose the launch plan for `descriptor`.
///
/// `libraries` must already be in descriptor order; the client jar is
/// appended last.
pub fn compose(
    descriptor: &ReleaseDescriptor,
    libraries: Vec<PathBuf>,
    client_jar: PathBuf,
    layout: &GameLayout,
    account: &LaunchAccountProfile,
    options: &LaunchOptions,
) -> LaunchPlan {
    let natives_dir = layout.natives_dir(&descriptor.id);

    let mut classpath = libraries;
    classpath.push(client_jar);

    let jvm_args = vec![
        format!("-Xmx{}", options.max_memory),
        format!("-Xss{}", THREAD_STACK_SIZE),
        "-Dfile.encoding=UTF-8".to_string(),
        format!("-Djava.library.path={}", path_arg(&natives_dir)),
        format!("-Dminecraft.launcher.brand={}", LAUNCHER_BRAND),
        format!("-Dminecraft.launcher.version={}", LAUNCHER_VERSION),
    ];

    let game_args = vec![
        account.username.clone(),
        "--version".into(),
        descriptor.id.clone(),
        "--gameDir".into(),
        path_arg(layout.root()),
        "--assetsDir".into(),
        path_arg(&layout.assets_dir()),
        "--assetIndex".into(),
        descriptor.asset_index.id.clone(),
        "--uuid".into(),
        account.uuid.clone(),
        "--accessToken".into(),
        account.access_token.clone(),
        "--userType".into(),
        account.user_type.clone(),
        "--versionType".into(),
        descriptor.release_type.to_string(),
    ];

    LaunchPlan {
        java_binary: options.java_binary.clone(),
        jvm_args,
        classpath,
        main_class: descriptor.main_class.clone(),
        game_args,
        natives_dir,
        game_dir: layout.root().to_path_buf(),
        platform: options.platform,
    }
}

pub(crate) fn path_arg(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::version::{AssetIndexRef, ClientArtifact, ReleaseType};

    fn descriptor() -> ReleaseDescriptor {
        ReleaseDescriptor {
            id: "1.5.2".into(),
            main_class: "net.minecraft.client.Minecraft".into(),
            release_type: ReleaseType::Release,
            client: ClientArtifact {
                url: "https://x/client.jar".into(),
                sha1: None,
            },
            asset_index: AssetIndexRef {
                id: "pre-1.6".into(),
                url: "https://x/pre-1.6.json".into(),
                sha1: None,
            },
            libraries: vec![],
        }
    }

    fn options(platform: Platform) -> LaunchOptions {
        LaunchOptions {
            java_binary: PathBuf::from("/usr/bin/java"),
            max_memory: "2G".into(),
            platform,
        }
    }

    #[test]
    fn client_jar_is_appended_last() {
        let layout = GameLayout::new("/mc");
        let plan = compose(
            &descriptor(),
            vec![PathBuf::from("/mc/libraries/a.jar"), PathBuf::from("/mc/libraries/b.jar")],
            layout.client_jar("1.5.2"),
            &layout,
            &LaunchAccountProfile::offline("Steve"),
            &options(Platform::Linux),
        );

        assert_eq!(
            plan.classpath,
            vec![
                PathBuf::from("/mc/libraries/a.jar"),
                PathBuf::from("/mc/libraries/b.jar"),
                PathBuf::from("/mc/versions/1.5.2/1.5.2.jar"),
            ]
        );
        assert_eq!(
            plan.classpath_string(),
            "/mc/libraries/a.jar:/mc/libraries/b.jar:/mc/versions/1.5.2/1.5.2.jar"
        );
    }

    #[test]
    fn windows_target_joins_with_semicolons() {
        let layout = GameLayout::new("/mc");
        let plan = compose(
            &descriptor(),
            vec![PathBuf::from("a.jar")],
            PathBuf::from("client.jar"),
            &layout,
            &LaunchAccountProfile::offline("Steve"),
            &options(Platform::Windows),
        );
        assert_eq!(plan.classpath_string(), "a.jar;client.jar");
    }

    #[test]
    fn argument_order_matches_the_launch_contract() {
        let layout = GameLayout::new("/mc");
        let plan = compose(
            &descriptor(),
            vec![],
            layout.client_jar("1.5.2"),
            &layout,
            &LaunchAccountProfile::offline("Steve"),
            &options(Platform::Linux),
        );

        let expected: Vec<String> = [
            "-Xmx2G",
            "-Xss1M",
            "-Dfile.encoding=UTF-8",
            "-Djava.library.path=/mc/versions/1.5.2/natives",
            "-Dminecraft.launcher.brand=mclaunch",
            &format!("-Dminecraft.launcher.version={}", LAUNCHER_VERSION),
            "-cp",
            "/mc/versions/1.5.2/1.5.2.jar",
            "net.minecraft.client.Minecraft",
            "Steve",
            "--version",
            "1.5.2",
            "--gameDir",
            "/mc",
            "--assetsDir",
            "/mc/assets",
            "--assetIndex",
            "pre-1.6",
            "--uuid",
            "00000000-0000-0000-0000-000000000000",
            "--accessToken",
            "null",
            "--userType",
            "legacy",
            "--versionType",
            "release",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        assert_eq!(plan.arguments(), expected);
    }

    #[test]
    fn nickname_is_passed_verbatim() {
        let layout = GameLayout::new("/mc");
        let plan = compose(
            &descriptor(),
            vec![],
            layout.client_jar("1.5.2"),
            &layout,
            &LaunchAccountProfile::offline("--not-a-flag really"),
            &options(Platform::Linux),
        );
        assert_eq!(plan.game_args[0], "--not-a-flag really");
    }
}
