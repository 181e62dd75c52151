// ─── mclaunch Core ───
// Installs and launches a vanilla Minecraft release from Mojang metadata.
//
// Architecture:
//   core/
//     version/    : Version manifest, release descriptor, library rules
//     store/      : Content-addressed object store + atomic writes
//     downloader/ : Fetch-if-absent with SHA-1 checks, ordered batches
//     assets/     : Asset index + object sync
//     libraries/  : Classpath jars + native bundle expansion
//     launch/     : Command line composition + process spawner
//     pipeline    : End-to-end sequencing
//     config      : Defaults and environment overrides

pub mod assets;
pub mod auth;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod launch;
pub mod layout;
pub mod libraries;
pub mod pipeline;
pub mod platform;
pub mod store;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;
