use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launcher pipeline.
/// Every module returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("{failed} of {total} transfers failed; first failure: {first}")]
    Transfer {
        failed: usize,
        total: usize,
        first: Box<LauncherError>,
    },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {url}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // ── Manifests ───────────────────────────────────────
    #[error("Version {0} not found in version manifest")]
    VersionNotFound(String),

    #[error("Malformed manifest {document}: missing or invalid `{field}`")]
    MalformedManifest {
        document: String,
        field: &'static str,
    },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ── Archive ─────────────────────────────────────────
    #[error("Zip extraction error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Unsafe entry {entry:?} in archive {archive:?}")]
    UnsafeArchiveEntry { archive: PathBuf, entry: String },

    // ── Process ─────────────────────────────────────────
    #[error("Java execution failed: {0}")]
    JavaExecution(String),

    // ── Configuration ───────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Connection failures, timeouts, `429` and `5xx` responses are transient.
    /// Everything else (4xx, bad JSON, hash mismatches) fails immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            LauncherError::Http(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            LauncherError::DownloadFailed { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| LauncherError::Io { path, source }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
