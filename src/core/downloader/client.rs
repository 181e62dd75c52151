use std::path::Path;
use std::sync::Arc;

use sha1::{Digest, Sha1};
use tracing::debug;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::RemoteSource;
use crate::core::store::write_atomic;

/// Default number of parallel transfers.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Result of an existence-gated download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was already on disk; nothing was transferred.
    Present,
    /// The file was missing and has just been written.
    Fetched,
}

impl FetchOutcome {
    pub fn was_fetched(self) -> bool {
        self == FetchOutcome::Fetched
    }
}

/// Bounded, optionally SHA-1 validating downloader.
#[derive(Clone)]
pub struct Downloader {
    source: Arc<dyn RemoteSource>,
    /// Maximum number of parallel downloads.
    concurrency: usize,
    /// Check freshly fetched bytes against manifest hashes.
    verify_hashes: bool,
}

impl Downloader {
    pub fn new(source: Arc<dyn RemoteSource>) -> Self {
        Self {
            source,
            concurrency: DEFAULT_CONCURRENCY,
            verify_hashes: true,
        }
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify_hashes = verify;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn source(&self) -> &dyn RemoteSource {
        self.source.as_ref()
    }

    /// Fetch `url` into memory, validating SHA-1 when enabled and known.
    pub async fn fetch_verified(
        &self,
        url: &str,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<Vec<u8>> {
        let bytes = self.source.fetch(url).await?;

        if self.verify_hashes {
            if let Some(expected) = sha1_expected {
                let actual = sha1_hex(&bytes);
                if !actual.eq_ignore_ascii_case(expected) {
                    return Err(LauncherError::Sha1Mismatch {
                        url: url.to_string(),
                        expected: expected.to_string(),
                        actual,
                    });
                }
            }
        }

        Ok(bytes)
    }

    // ── Single file download ────────────────────────────

    /// Download `url` to `dest` unconditionally.
    ///
    /// Parent directories are created as needed; the write is atomic.
    pub async fn download_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<()> {
        let bytes = self.fetch_verified(url, sha1_expected).await?;
        write_atomic(dest, &bytes).await?;
        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }

    /// Download `url` to `dest` unless `dest` already exists.
    ///
    /// Existing files are trusted as-is; their contents are not re-hashed.
    pub async fn ensure_file(
        &self,
        url: &str,
        dest: &Path,
        sha1_expected: Option<&str>,
    ) -> LauncherResult<FetchOutcome> {
        if dest.is_file() {
            debug!("Already present: {:?}", dest);
            return Ok(FetchOutcome::Present);
        }

        self.download_file(url, dest, sha1_expected).await?;
        Ok(FetchOutcome::Fetched)
    }
}

/// Lowercase hex SHA-1 of `bytes`.
pub fn sha1_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
