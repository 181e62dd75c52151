// ─── Platform ───
// Target operating system for library selection, natives and classpath joining.

use std::fmt;
use std::str::FromStr;

use crate::core::error::LauncherError;

/// Operating systems as named by Mojang version metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Windows,
    Linux,
    Osx,
}

impl Platform {
    /// The platform this binary was compiled for.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "macos") {
            Platform::Osx
        } else {
            Platform::Linux
        }
    }

    /// OS name used in library rules and `natives` maps.
    pub fn os_name(self) -> &'static str {
        match self {
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Osx => "osx",
        }
    }

    /// Default classifier key for this platform's native bundle.
    pub fn natives_classifier(self) -> String {
        format!("natives-{}", self.os_name())
    }

    /// Java classpath separator on this platform.
    pub fn classpath_separator(self) -> &'static str {
        match self {
            Platform::Windows => ";",
            Platform::Linux | Platform::Osx => ":",
        }
    }

    /// Value substituted for `${arch}` in classifier templates.
    pub fn arch_bits() -> &'static str {
        if cfg!(target_pointer_width = "64") {
            "64"
        } else {
            "32"
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.os_name())
    }
}

impl FromStr for Platform {
    type Err = LauncherError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        let name = normalized
            .strip_prefix("natives-")
            .unwrap_or(normalized.as_str());
        match name {
            "windows" | "win" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            "osx" | "macos" | "mac" => Ok(Platform::Osx),
            _ => Err(LauncherError::Config(format!("unknown platform `{raw}`"))),
        }
    }
}
