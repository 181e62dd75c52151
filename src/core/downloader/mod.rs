pub mod batch;
pub mod client;

pub use batch::run_ordered;
pub use client::{sha1_hex, Downloader, FetchOutcome, DEFAULT_CONCURRENCY};
