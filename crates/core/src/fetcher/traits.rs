//! Trait definitions for the fetcher module.

use async_trait::async_trait;
use std::path::Path;

use super::error::FetchError;

/// Outcome of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    /// Bytes written to the destination file.
    pub bytes_written: u64,
}

/// Downloads a remote file to a local path.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` into `destination`, creating the file.
    ///
    /// A non-success response fails before anything is written. There are
    /// no retries.
    async fn fetch(&self, url: &str, destination: &Path) -> Result<FetchResult, FetchError>;
}
