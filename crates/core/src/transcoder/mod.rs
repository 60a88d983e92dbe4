//! Transcoder module for running the external audio engine.
//!
//! This module provides the `Transcoder` trait and an ffmpeg implementation
//! that runs the engine as a child process with a fixed argument template:
//!
//! ```text
//! ffmpeg -y -i <input> -map 0:a:0 -b:a <bitrate>k <output>
//! ```
//!
//! The engine's stdout and stderr are drained concurrently with the wait for
//! its exit and forwarded to the host's own channels.
//!
//! # Example
//!
//! ```ignore
//! use transcodegate_core::transcoder::{FfmpegTranscoder, Transcoder, TranscodeJob};
//!
//! let transcoder = FfmpegTranscoder::with_defaults();
//! transcoder.validate().await?;
//!
//! let result = transcoder
//!     .transcode(TranscodeJob {
//!         input_path: PathBuf::from("/tmp/lambda-x/input.wav"),
//!         output_path: PathBuf::from("/tmp/lambda-x/output.mp3"),
//!         bitrate_kbps: "64".to_string(),
//!     })
//!     .await?;
//! println!("exit {} in {} ms", result.exit_code, result.duration_ms);
//! ```

mod error;
mod ffmpeg;
mod traits;
mod types;

pub use error::TranscodeError;
pub use ffmpeg::FfmpegTranscoder;
pub use traits::Transcoder;
pub use types::{TranscodeJob, TranscodeResult};
