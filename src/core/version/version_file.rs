// ─── Version File ───
// Parses a Mojang version JSON into a validated release descriptor and
// evaluates per-platform library rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::core::error::{LauncherError, LauncherResult};
use crate::core::layout::{is_contained_relative, is_plain_name};
use crate::core::platform::Platform;

// ─── Wire format ───
// Everything optional here; `ReleaseDescriptor::parse` decides what is required.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionJson {
    #[serde(default)]
    main_class: Option<String>,
    #[serde(default, rename = "type")]
    release_type: Option<String>,
    #[serde(default)]
    downloads: Option<VersionDownloads>,
    #[serde(default)]
    asset_index: Option<AssetIndexInfo>,
    #[serde(default)]
    libraries: Vec<LibraryJson>,
}

#[derive(Debug, Deserialize)]
struct VersionDownloads {
    #[serde(default)]
    client: Option<DownloadJson>,
}

#[derive(Debug, Deserialize)]
struct DownloadJson {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    sha1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AssetIndexInfo {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    sha1: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LibraryJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    downloads: Option<LibraryDownloads>,
    #[serde(default)]
    rules: Vec<LibraryRule>,
    #[serde(default)]
    natives: Option<BTreeMap<String, String>>,
    #[serde(default)]
    extract: Option<ExtractJson>,
}

#[derive(Debug, Deserialize)]
struct LibraryDownloads {
    #[serde(default)]
    artifact: Option<LibArtifactJson>,
    #[serde(default)]
    classifiers: BTreeMap<String, LibArtifactJson>,
}

#[derive(Debug, Deserialize)]
struct LibArtifactJson {
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    sha1: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExtractJson {
    #[serde(default)]
    exclude: Vec<String>,
}

// ─── Validated model ───

/// Release channel from the descriptor's `type` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseType {
    Release,
    Snapshot,
    OldBeta,
    OldAlpha,
    Other(String),
}

impl ReleaseType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "release" => ReleaseType::Release,
            "snapshot" => ReleaseType::Snapshot,
            "old_beta" => ReleaseType::OldBeta,
            "old_alpha" => ReleaseType::OldAlpha,
            other => ReleaseType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ReleaseType::Release => "release",
            ReleaseType::Snapshot => "snapshot",
            ReleaseType::OldBeta => "old_beta",
            ReleaseType::OldAlpha => "old_alpha",
            ReleaseType::Other(raw) => raw,
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The client jar download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientArtifact {
    pub url: String,
    pub sha1: Option<String>,
}

/// Pointer to the release's asset index document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetIndexRef {
    /// Logical name, e.g. `"17"` or `"legacy"`.
    pub id: String,
    pub url: String,
    pub sha1: Option<String>,
}

/// A downloadable library file and where it lives under `libraries/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryArtifact {
    pub url: String,
    pub path: String,
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LibraryRule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
}

/// One library from the descriptor's `libraries` list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyEntry {
    pub name: String,
    /// The jar that goes on the classpath, if any.
    pub artifact: Option<LibraryArtifact>,
    /// Classifier builds keyed by classifier name (`natives-windows`, ...).
    pub classifiers: BTreeMap<String, LibraryArtifact>,
    /// Explicit OS → classifier template map (legacy LWJGL 2 style).
    pub natives: Option<BTreeMap<String, String>>,
    pub rules: Vec<LibraryRule>,
    /// Archive path prefixes skipped when expanding the native bundle.
    pub extract_exclude: Vec<String>,
}

impl DependencyEntry {
    /// Evaluate whether this library should be included on `platform`.
    ///
    /// Rules logic (Mojang semantics):
    /// - If no rules → allowed.
    /// - Process rules top-to-bottom. Start with "disallowed".
    /// - Each rule either sets "allow" or "disallow" if the OS matches (or if no OS is specified).
    /// - Final state determines inclusion.
    pub fn is_allowed_on(&self, platform: Platform) -> bool {
        if self.rules.is_empty() {
            return true;
        }

        let mut allowed = false;
        for rule in &self.rules {
            let os_matches = match rule.os.as_ref().and_then(|os| os.name.as_deref()) {
                None => true,
                Some(name) => name == platform.os_name(),
            };

            if os_matches {
                allowed = rule.action == RuleAction::Allow;
            }
        }

        allowed
    }

    /// Classifier key of the native bundle for `platform`.
    ///
    /// With a `natives` map the key comes from it (with `${arch}` replaced);
    /// a map without an entry for the OS means there is no bundle. Without a
    /// map the conventional `natives-<os>` key is used.
    pub fn native_classifier(&self, platform: Platform) -> Option<String> {
        match &self.natives {
            Some(map) => map
                .get(platform.os_name())
                .map(|template| template.replace("${arch}", Platform::arch_bits())),
            None => Some(platform.natives_classifier()),
        }
    }

    /// The platform-specific native bundle for `platform`, if declared.
    pub fn platform_variant(&self, platform: Platform) -> Option<&LibraryArtifact> {
        let classifier = self.native_classifier(platform)?;
        self.classifiers.get(&classifier)
    }
}

/// A validated release descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDescriptor {
    pub id: String,
    pub main_class: String,
    pub release_type: ReleaseType,
    pub client: ClientArtifact,
    pub asset_index: AssetIndexRef,
    pub libraries: Vec<DependencyEntry>,
}

impl ReleaseDescriptor {
    /// Parse and validate the version JSON for `id`.
    ///
    /// Missing `mainClass`, `type`, `downloads.client.url`, `assetIndex.id`
    /// or `assetIndex.url` fail with `MalformedManifest`, as do library
    /// downloads lacking `url` or `path`. An `assetIndex.id` that is not a
    /// plain file name, or a library `path` leaving `libraries/`, is also
    /// malformed.
    pub fn parse(id: &str, raw: &[u8]) -> LauncherResult<Self> {
        let json: VersionJson = serde_json::from_slice(raw)?;
        let document = format!("version {}", id);

        let main_class = required(json.main_class, &document, "mainClass")?;
        let release_type = ReleaseType::parse(&required(json.release_type, &document, "type")?);

        let client = json
            .downloads
            .and_then(|d| d.client)
            .ok_or_else(|| malformed(&document, "downloads.client"))?;
        let client = ClientArtifact {
            url: required(client.url, &document, "downloads.client.url")?,
            sha1: client.sha1,
        };

        let asset_index = json
            .asset_index
            .ok_or_else(|| malformed(&document, "assetIndex"))?;
        let index_id = required(asset_index.id, &document, "assetIndex.id")?;
        if !is_plain_name(&index_id) {
            return Err(malformed(&document, "assetIndex.id"));
        }
        let asset_index = AssetIndexRef {
            id: index_id,
            url: required(asset_index.url, &document, "assetIndex.url")?,
            sha1: asset_index.sha1,
        };

        let libraries = json
            .libraries
            .into_iter()
            .map(|lib| convert_library(lib, &document))
            .collect::<LauncherResult<Vec<_>>>()?;

        Ok(Self {
            id: id.to_string(),
            main_class,
            release_type,
            client,
            asset_index,
            libraries,
        })
    }
}

fn convert_library(lib: LibraryJson, document: &str) -> LauncherResult<DependencyEntry> {
    let (artifact, classifiers) = match lib.downloads {
        Some(downloads) => {
            let artifact = downloads
                .artifact
                .map(|a| convert_artifact(a, document, "libraries[].downloads.artifact"))
                .transpose()?;
            let classifiers = downloads
                .classifiers
                .into_iter()
                .map(|(key, a)| {
                    convert_artifact(a, document, "libraries[].downloads.classifiers")
                        .map(|a| (key, a))
                })
                .collect::<LauncherResult<BTreeMap<_, _>>>()?;
            (artifact, classifiers)
        }
        None => (None, BTreeMap::new()),
    };

    Ok(DependencyEntry {
        name: lib.name.unwrap_or_default(),
        artifact,
        classifiers,
        natives: lib.natives,
        rules: lib.rules,
        extract_exclude: lib.extract.map(|e| e.exclude).unwrap_or_default(),
    })
}

fn convert_artifact(
    raw: LibArtifactJson,
    document: &str,
    field: &'static str,
) -> LauncherResult<LibraryArtifact> {
    let url = required(raw.url, document, field)?;
    let path = required(raw.path, document, field)?;
    if !is_contained_relative(std::path::Path::new(&path)) {
        return Err(malformed(document, "libraries[].downloads.path"));
    }
    Ok(LibraryArtifact {
        url,
        path,
        sha1: raw.sha1,
    })
}

fn required(value: Option<String>, document: &str, field: &'static str) -> LauncherResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| malformed(document, field))
}

fn malformed(document: &str, field: &'static str) -> LauncherError {
    LauncherError::MalformedManifest {
        document: document.to_string(),
        field,
    }
}
