//! Types for the transcoder module.

use std::path::PathBuf;

/// One engine invocation: where to read, where to write, and at what rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeJob {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Audio bitrate in kbps, as given by the caller.
    pub bitrate_kbps: String,
}

/// Result of a successful engine run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeResult {
    /// Path of the written output file.
    pub output_path: PathBuf,
    /// Size of the output file in bytes.
    pub output_size_bytes: u64,
    /// Engine exit code (always 0 on success).
    pub exit_code: i32,
    /// Wall-clock time of the engine run in milliseconds.
    pub duration_ms: u64,
}
