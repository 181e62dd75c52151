pub mod content_store;

pub use content_store::{write_atomic, ContentStore};
