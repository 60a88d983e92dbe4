//! Error types for the fetcher module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while downloading a source file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The remote answered with a non-success status.
    #[error("Failed to download file: {status_text}")]
    Status { status: u16, status_text: String },

    /// The request could not be sent or the body stream broke.
    #[error("Failed to download file: {0}")]
    Request(#[from] reqwest::Error),

    /// Writing the downloaded bytes to disk failed.
    #[error("Failed to write downloaded file to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl FetchError {
    /// Creates a status error from a response status code.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        let status_text = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_str().to_string());
        Self::Status {
            status: status.as_u16(),
            status_text,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}
