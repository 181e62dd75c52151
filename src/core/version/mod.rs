pub mod manifest;
pub mod resolver;
pub mod version_file;

pub use manifest::{VersionEntry, VersionManifest, VERSION_MANIFEST_URL};
pub use resolver::{ManifestResolver, ResolvedRelease};
pub use version_file::{
    AssetIndexRef, ClientArtifact, DependencyEntry, LibraryArtifact, LibraryRule, OsRule,
    ReleaseDescriptor, ReleaseType, RuleAction,
};
