pub mod materializer;
pub mod natives;

pub use materializer::{LibraryMaterializer, MaterializedLibraries};
pub use natives::{expand_native_bundle, extract_archive};
