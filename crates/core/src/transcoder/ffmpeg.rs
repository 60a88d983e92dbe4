//! FFmpeg-based transcoder implementation.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::config::{DiagnosticTarget, EngineConfig};

use super::error::TranscodeError;
use super::traits::Transcoder;
use super::types::{TranscodeJob, TranscodeResult};

/// Transcoder that shells out to an ffmpeg executable.
#[derive(Debug, Clone)]
pub struct FfmpegTranscoder {
    config: EngineConfig,
}

impl FfmpegTranscoder {
    /// Creates a new ffmpeg transcoder with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Creates a transcoder with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Builds the engine argument list. The shape is fixed; only the paths
    /// and the bitrate vary.
    pub fn build_args(job: &TranscodeJob) -> Vec<String> {
        vec![
            "-y".to_string(), // Overwrite output
            "-i".to_string(),
            job.input_path.to_string_lossy().to_string(),
            "-map".to_string(),
            "0:a:0".to_string(), // First audio stream only
            "-b:a".to_string(),
            format!("{}k", job.bitrate_kbps),
            job.output_path.to_string_lossy().to_string(),
        ]
    }

    async fn run(&self, job: &TranscodeJob) -> Result<TranscodeResult, TranscodeError> {
        let start = Instant::now();
        let args = Self::build_args(job);
        debug!(engine = %self.config.path.display(), ?args, "Starting ffmpeg");

        let mut child = Command::new(&self.config.path)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    TranscodeError::EngineNotInstalled {
                        path: self.config.path.clone(),
                    }
                } else {
                    TranscodeError::Spawn {
                        path: self.config.path.clone(),
                        source: e,
                    }
                }
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_target = self.config.stdout;
        let stderr_target = self.config.stderr;

        // Both pipes must keep draining while we wait, or a chatty engine
        // blocks on a full pipe and never exits.
        let run = async {
            let drains = async {
                tokio::join!(
                    forward(stdout, stdout_target, "stdout"),
                    forward(stderr, stderr_target, "stderr"),
                )
            };
            let (_, status) = tokio::join!(drains, child.wait());
            status
        };

        let waited = match self.config.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), run)
                .await
                .map_err(|_| secs),
            None => Ok(run.await),
        };

        let status = match waited {
            Ok(status) => status?,
            Err(timeout_secs) => {
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill timed out ffmpeg");
                }
                return Err(TranscodeError::Timeout { timeout_secs });
            }
        };

        if !status.success() {
            return Err(match status.code() {
                Some(code) => TranscodeError::Exited { code },
                None => TranscodeError::Terminated,
            });
        }

        let output_meta = tokio::fs::metadata(&job.output_path).await.map_err(|_| {
            TranscodeError::OutputMissing {
                path: job.output_path.clone(),
            }
        })?;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            duration_ms,
            output_bytes = output_meta.len(),
            "ffmpeg finished"
        );

        Ok(TranscodeResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            exit_code: 0,
            duration_ms,
        })
    }
}

/// Copies one child output stream to its host channel until EOF.
async fn forward<R>(reader: Option<R>, target: DiagnosticTarget, channel: &'static str)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };

    let result = match target {
        DiagnosticTarget::Stdout => copy_and_flush(&mut reader, &mut tokio::io::stdout()).await,
        DiagnosticTarget::Stderr => copy_and_flush(&mut reader, &mut tokio::io::stderr()).await,
        DiagnosticTarget::Discard => copy_and_flush(&mut reader, &mut tokio::io::sink()).await,
    };

    if let Err(e) = result {
        warn!(channel, error = %e, "Failed to forward ffmpeg output");
        // Keep draining so the engine is never blocked on this pipe.
        let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
    }
}

async fn copy_and_flush<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let copied = tokio::io::copy(reader, writer).await?;
    writer.flush().await?;
    Ok(copied)
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    async fn validate(&self) -> Result<(), TranscodeError> {
        match tokio::fs::try_exists(&self.config.path).await {
            Ok(true) => Ok(()),
            _ => Err(TranscodeError::EngineNotInstalled {
                path: self.config.path.clone(),
            }),
        }
    }

    async fn transcode(&self, job: TranscodeJob) -> Result<TranscodeResult, TranscodeError> {
        self.run(&job).await
    }
}
