//! Trait definitions for the transcoder module.

use async_trait::async_trait;

use super::error::TranscodeError;
use super::types::{TranscodeJob, TranscodeResult};

/// Something that can transcode a local audio file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Returns the name of this transcoder implementation.
    fn name(&self) -> &str;

    /// Checks that the engine is installed and usable.
    async fn validate(&self) -> Result<(), TranscodeError>;

    /// Runs the job to completion.
    ///
    /// On success the output file is complete and closed.
    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscodeError>;
}
