//! Mock fetcher for testing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::fetcher::{FetchError, FetchResult, Fetcher};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    pub url: String,
    pub destination: PathBuf,
}

/// Mock implementation of the Fetcher trait.
///
/// Writes a configurable body to the destination, or fails with a
/// configured error, and records every call.
#[derive(Debug, Clone)]
pub struct MockFetcher {
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    body: Arc<RwLock<Vec<u8>>>,
    next_error: Arc<RwLock<Option<FetchError>>>,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFetcher {
    /// Create a new mock fetcher serving a small default body.
    pub fn new() -> Self {
        Self {
            fetches: Arc::new(RwLock::new(Vec::new())),
            body: Arc::new(RwLock::new(b"ID3 mock audio".to_vec())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the bytes written by subsequent fetches.
    pub async fn set_body(&self, body: Vec<u8>) {
        *self.body.write().await = body;
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Get all recorded fetches.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, destination: &Path) -> Result<FetchResult, FetchError> {
        self.fetches.write().await.push(RecordedFetch {
            url: url.to_string(),
            destination: destination.to_path_buf(),
        });

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let body = self.body.read().await.clone();
        tokio::fs::write(destination, &body)
            .await
            .map_err(|e| FetchError::write(destination, e))?;

        Ok(FetchResult {
            bytes_written: body.len() as u64,
        })
    }
}
