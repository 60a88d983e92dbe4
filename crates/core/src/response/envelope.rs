//! Response envelopes and their metadata frames.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// The attachment name is fixed regardless of the requested output extension.
pub const SUCCESS_CONTENT_DISPOSITION: &str = r#"attachment; filename="output.mp3""#;

/// The metadata frame sent ahead of every body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
}

impl ResponseMetadata {
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A 200 response whose body is the transcoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessPayload {
    pub path: PathBuf,
}

/// A 4xx/5xx response with a JSON message body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPayload {
    pub status_code: u16,
    pub body: ErrorBody,
}

/// Exactly one of these is produced per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseEnvelope {
    Success(SuccessPayload),
    Error(ErrorPayload),
}

impl ResponseEnvelope {
    pub fn success(path: impl Into<PathBuf>) -> Self {
        Self::Success(SuccessPayload { path: path.into() })
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::Error(payload) => payload.status_code,
        }
    }

    /// The metadata frame announcing this envelope.
    pub fn metadata(&self) -> ResponseMetadata {
        match self {
            Self::Success(_) => ResponseMetadata::new(200)
                .with_header("Content-Type", CONTENT_TYPE_OCTET_STREAM)
                .with_header("Content-Disposition", SUCCESS_CONTENT_DISPOSITION),
            Self::Error(payload) => ResponseMetadata::new(payload.status_code)
                .with_header("Content-Type", CONTENT_TYPE_JSON),
        }
    }
}

/// Builds an error envelope.
pub fn error_response(status_code: u16, body: ErrorBody) -> ResponseEnvelope {
    ResponseEnvelope::Error(ErrorPayload { status_code, body })
}
