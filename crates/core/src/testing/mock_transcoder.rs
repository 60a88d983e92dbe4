//! Mock transcoder for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::transcoder::{TranscodeError, TranscodeJob, TranscodeResult, Transcoder};

/// Mock implementation of the Transcoder trait.
///
/// By default it "transcodes" by copying the input to the output. It can be
/// told that the engine is missing, to fail the next job, or to write a
/// fixed output instead.
#[derive(Debug, Clone)]
pub struct MockTranscoder {
    jobs: Arc<RwLock<Vec<TranscodeJob>>>,
    installed: Arc<RwLock<bool>>,
    next_error: Arc<RwLock<Option<TranscodeError>>>,
    output: Arc<RwLock<Option<Vec<u8>>>>,
    duration_ms: Arc<RwLock<u64>>,
}

impl Default for MockTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscoder {
    /// Create a new mock transcoder with an installed engine.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            installed: Arc::new(RwLock::new(true)),
            next_error: Arc::new(RwLock::new(None)),
            output: Arc::new(RwLock::new(None)),
            duration_ms: Arc::new(RwLock::new(0)),
        }
    }

    /// Pretend the engine is (or is not) installed.
    pub async fn set_installed(&self, installed: bool) {
        *self.installed.write().await = installed;
    }

    /// Configure the next job to fail with the given error.
    pub async fn set_next_error(&self, error: TranscodeError) {
        *self.next_error.write().await = Some(error);
    }

    /// Write these bytes as output instead of copying the input.
    pub async fn set_output(&self, output: Vec<u8>) {
        *self.output.write().await = Some(output);
    }

    /// Set the simulated engine run time.
    pub async fn set_duration(&self, duration: Duration) {
        *self.duration_ms.write().await = duration.as_millis() as u64;
    }

    /// Get all submitted jobs.
    pub async fn recorded_jobs(&self) -> Vec<TranscodeJob> {
        self.jobs.read().await.clone()
    }

    /// Get the number of jobs submitted.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }
}

#[async_trait]
impl Transcoder for MockTranscoder {
    fn name(&self) -> &str {
        "mock"
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        if *self.installed.read().await {
            Ok(())
        } else {
            Err(TranscodeError::EngineNotInstalled {
                path: "/opt/bin/ffmpeg".into(),
            })
        }
    }

    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscodeError> {
        self.jobs.write().await.push(job.clone());

        let duration_ms = *self.duration_ms.read().await;
        if duration_ms > 0 {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let output = match self.output.read().await.clone() {
            Some(bytes) => bytes,
            None => tokio::fs::read(&job.input_path).await?,
        };
        tokio::fs::write(&job.output_path, &output).await?;

        Ok(TranscodeResult {
            output_path: job.output_path,
            output_size_bytes: output.len() as u64,
            exit_code: 0,
            duration_ms,
        })
    }
}
