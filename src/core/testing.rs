// In-memory fakes shared by unit tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::http::RemoteSource;

/// `RemoteSource` serving canned bodies and recording every request.
/// Unknown URLs answer HTTP 404.
#[derive(Default)]
pub(crate) struct MemorySource {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl MemorySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }

    pub(crate) fn with_json(self, url: &str, body: serde_json::Value) -> Self {
        self.with(url, body.to_string().into_bytes())
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }

    pub(crate) fn reset(&self) {
        self.requests.lock().unwrap().clear();
    }
}

#[async_trait]
impl RemoteSource for MemorySource {
    async fn fetch(&self, url: &str) -> LauncherResult<Vec<u8>> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| LauncherError::DownloadFailed {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// Build an in-memory zip archive from `(name, contents)` pairs.
pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, contents) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
