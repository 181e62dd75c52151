// ─── Process Spawner ───
// Runs a composed launch plan as a child Java process.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{info, warn};

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::platform::Platform;

use super::plan::{path_arg, LaunchPlan};

/// Boundary between the pipeline and the operating system.
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    /// Start the process described by `plan`, wait for it, and return its exit code.
    async fn run(&self, plan: &LaunchPlan) -> LauncherResult<i32>;
}

/// Spawns the game with inherited stdio, working directory set to the game root.
#[derive(Debug, Default, Clone, Copy)]
pub struct JavaProcess;

#[async_trait]
impl ProcessSpawner for JavaProcess {
    async fn run(&self, plan: &LaunchPlan) -> LauncherResult<i32> {
        let mut cmd = Command::new(&plan.java_binary);
        cmd.args(plan.arguments())
            .current_dir(&plan.game_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        configure_native_library_env(&mut cmd, plan.platform, &plan.natives_dir);

        info!("Launch command: {}", format_command_for_logs(cmd.as_std()));

        let mut child = cmd.spawn().map_err(|e| {
            LauncherError::JavaExecution(format!(
                "could not start {}: {}",
                plan.java_binary.display(),
                e
            ))
        })?;

        info!("Game process started (pid {:?})", child.id());

        let status = child.wait().await.map_err(|e| {
            LauncherError::JavaExecution(format!("failed waiting for game process: {}", e))
        })?;

        let code = exit_code(status);
        if code == 0 {
            info!("Game exited normally");
        } else {
            warn!("Game exited with code {}", code);
        }
        Ok(code)
    }
}

/// Java executable inside `java_home`, or plain `java` resolved through `PATH`.
pub fn locate_java_binary(java_home: Option<&Path>) -> PathBuf {
    match java_home {
        Some(home) => {
            let candidate = home.join("bin").join(java_exe());
            if candidate.is_file() {
                candidate
            } else {
                warn!(
                    "JAVA_HOME set but {} does not exist, falling back to PATH",
                    candidate.display()
                );
                PathBuf::from("java")
            }
        }
        None => PathBuf::from("java"),
    }
}

pub fn java_exe() -> &'static str {
    if cfg!(target_os = "windows") {
        "java.exe"
    } else {
        "java"
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

fn configure_native_library_env(cmd: &mut Command, platform: Platform, natives_dir: &Path) {
    let native_path = path_arg(natives_dir);
    let var_name = match platform {
        Platform::Windows => "PATH",
        Platform::Linux => "LD_LIBRARY_PATH",
        Platform::Osx => "DYLD_LIBRARY_PATH",
    };
    let merged = append_env_path(
        std::env::var(var_name).ok().as_deref(),
        &native_path,
        platform.classpath_separator(),
    );
    cmd.env(var_name, merged);
}

fn append_env_path(existing: Option<&str>, value: &str, separator: &str) -> String {
    match existing {
        Some(existing) if !existing.trim().is_empty() => {
            format!("{}{}{}", value, separator, existing)
        }
        _ => value.to_string(),
    }
}

fn format_command_for_logs(cmd: &std::process::Command) -> String {
    let program = shell_escape(&cmd.get_program().to_string_lossy());
    let args = cmd
        .get_args()
        .map(|arg| shell_escape(&arg.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ");

    if args.is_empty() {
        program
    } else {
        format!("{} {}", program, args)
    }
}

fn shell_escape(raw: &str) -> String {
    if raw.is_empty() {
        return "\"\"".to_string();
    }

    if raw.chars().all(|ch| {
        ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.' | '/' | ':' | '\\' | '=')
    }) {
        return raw.to_string();
    }

    format!("\"{}\"", raw.replace('"', "\\\""))
}
