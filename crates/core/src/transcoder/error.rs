//! Error types for the transcoder module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while running the engine.
#[derive(Debug, Error)]
pub enum TranscodeError {
    /// The engine executable is missing from its fixed location.
    #[error("ffmpeg not installed")]
    EngineNotInstalled { path: PathBuf },

    /// The engine could not be started.
    #[error("Failed to start ffmpeg at {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine exited with a non-zero code.
    #[error("ffmpeg exited with code {code}")]
    Exited { code: i32 },

    /// The engine was killed by a signal.
    #[error("ffmpeg was terminated by a signal")]
    Terminated,

    /// The engine ran longer than the configured limit and was killed.
    #[error("ffmpeg timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The engine reported success but left no output file.
    #[error("ffmpeg produced no output file at {path}")]
    OutputMissing { path: PathBuf },

    /// I/O error while waiting on the engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscodeError {
    /// Whether this error is an environment fault rather than a job fault.
    pub fn is_environment(&self) -> bool {
        matches!(self, Self::EngineNotInstalled { .. } | Self::Spawn { .. })
    }

    /// Exit code reported by the engine, if it exited on its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exited { code } => Some(*code),
            _ => None,
        }
    }
}
