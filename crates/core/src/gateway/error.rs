//! Error aggregation at the orchestrator boundary.

use thiserror::Error;

use crate::fetcher::FetchError;
use crate::request::ValidationError;
use crate::response::{ErrorBody, FramingError};
use crate::transcoder::TranscodeError;

/// Broad classes of invocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller sent bad parameters.
    Validation,
    /// The host is missing something it needs, such as the engine.
    Environment,
    /// The source file could not be downloaded.
    Fetch,
    /// The engine failed.
    Process,
    /// Anything else.
    Other,
}

/// Any failure that ends an invocation early.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to prepare workspace: {0}")]
    Workspace(#[source] std::io::Error),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),

    #[error(transparent)]
    Framing(#[from] FramingError),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transcode(e) if e.is_environment() => ErrorKind::Environment,
            Self::Transcode(_) => ErrorKind::Process,
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::Workspace(_) | Self::Framing(_) => ErrorKind::Other,
        }
    }

    /// HTTP status reported to the caller.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            _ => 500,
        }
    }

    /// Caller-facing body; the message is the error's own description.
    pub fn to_error_body(&self) -> ErrorBody {
        ErrorBody::new(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_validation_is_client_error() {
        let err = GatewayError::from(ValidationError::MissingFileUrl);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.status_code(), 400);
        assert_eq!(
            err.to_error_body().message,
            "`fileUrl` query parameter not specified"
        );
    }

    #[test]
    fn test_missing_engine_is_environment_error() {
        let err = GatewayError::from(TranscodeError::EngineNotInstalled {
            path: PathBuf::from("/opt/bin/ffmpeg"),
        });
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.to_error_body().message, "ffmpeg not installed");
    }

    #[test]
    fn test_process_and_fetch_errors_are_server_errors() {
        let err = GatewayError::from(TranscodeError::Exited { code: 1 });
        assert_eq!(err.kind(), ErrorKind::Process);
        assert_eq!(err.status_code(), 500);
        assert!(err.to_error_body().message.contains('1'));

        let err = GatewayError::from(FetchError::Status {
            status: 404,
            status_text: "Not Found".to_string(),
        });
        assert_eq!(err.kind(), ErrorKind::Fetch);
        assert_eq!(err.status_code(), 500);
        assert_eq!(
            err.to_error_body().message,
            "Failed to download file: Not Found"
        );
    }
}
