//! Remote fetcher for transcode sources.
//!
//! The fetcher downloads the caller's `fileUrl` into the workspace input
//! path. The body is streamed chunk by chunk to disk, so memory use does not
//! grow with the size of the source.

mod error;
mod http;
mod traits;

pub use error::FetchError;
pub use http::HttpFetcher;
pub use traits::{FetchResult, Fetcher};
