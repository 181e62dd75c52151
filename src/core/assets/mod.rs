pub mod asset_index;

pub use asset_index::{object_url, AssetIndex, AssetManager, AssetObject, SyncReport, RESOURCES_URL};
