use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::error::{LauncherError, LauncherResult};

const APP_USER_AGENT: &str = concat!("mclaunch/", env!("CARGO_PKG_VERSION"));

pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .build()
}

/// Anything that can hand back the bytes behind a URL.
///
/// The pipeline only ever issues plain GETs, so manifests, asset objects and
/// library jars all go through this one method.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn fetch(&self, url: &str) -> LauncherResult<Vec<u8>>;
}

/// Fetch `url` and decode it as JSON.
pub async fn fetch_json<T: DeserializeOwned>(
    source: &dyn RemoteSource,
    url: &str,
) -> LauncherResult<T> {
    let bytes = source.fetch(url).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Exponential backoff for transient fetch failures.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one. `1` disables retrying.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles afterwards.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::default()
        }
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

/// Run `op` until it succeeds, fails permanently, or the policy is exhausted.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, op: F) -> LauncherResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = LauncherResult<T>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_transient() && attempt + 1 < max_attempts => {
                let delay = policy.delay_for(attempt);
                attempt += 1;
                warn!(
                    attempt,
                    max_attempts, "Request for {} failed, retrying in {:?}: {}", label, delay, err
                );
                tokio::time::sleep(delay).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// `RemoteSource` backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    retry: RetryPolicy,
}

impl HttpSource {
    pub fn new(retry: RetryPolicy) -> LauncherResult<Self> {
        Ok(Self {
            client: build_http_client()?,
            retry,
        })
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    async fn fetch_once(&self, url: &str) -> LauncherResult<Vec<u8>> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("GET {} ({} bytes)", url, bytes.len());
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl RemoteSource for HttpSource {
    async fn fetch(&self, url: &str) -> LauncherResult<Vec<u8>> {
        with_retry(&self.retry, url, move || self.fetch_once(url)).await
    }
}
