//! Gateway runner: sequences one invocation end to end.

use std::collections::HashMap;
use std::time::Instant;
use tokio::io::AsyncWrite;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::{Config, WorkspaceConfig};
use crate::fetcher::{FetchError, Fetcher, HttpFetcher};
use crate::request::Request;
use crate::response::{emit, error_response, ResponseEnvelope};
use crate::transcoder::{FfmpegTranscoder, TranscodeJob, Transcoder};
use crate::workspace::Workspace;

use super::error::GatewayError;
use super::types::{InvocationOutcome, Stage};

/// The transcode pipeline, parameterised over its fetch and engine seams.
pub struct Gateway<F: Fetcher, T: Transcoder> {
    workspace_config: WorkspaceConfig,
    fetcher: F,
    transcoder: T,
}

/// The response that went out, before timing and id are attached.
#[derive(Debug)]
struct Responded {
    status_code: u16,
    failed_stage: Option<Stage>,
    error_message: Option<String>,
    body_bytes: u64,
    stream_completed: bool,
}

impl Responded {
    fn completed(status_code: u16, body_bytes: u64) -> Self {
        Self {
            status_code,
            failed_stage: None,
            error_message: None,
            body_bytes,
            stream_completed: true,
        }
    }

    fn into_outcome(self, invocation_id: Uuid, started: Instant) -> InvocationOutcome {
        InvocationOutcome {
            invocation_id,
            status_code: self.status_code,
            failed_stage: self.failed_stage,
            error_message: self.error_message,
            body_bytes: self.body_bytes,
            stream_completed: self.stream_completed,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }
}

impl Gateway<HttpFetcher, FfmpegTranscoder> {
    /// Builds a gateway with the HTTP fetcher and ffmpeg engine.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(
            config.workspace.clone(),
            HttpFetcher::new(&config.fetch)?,
            FfmpegTranscoder::new(config.engine.clone()),
        ))
    }
}

impl<F: Fetcher, T: Transcoder> Gateway<F, T> {
    pub fn new(workspace_config: WorkspaceConfig, fetcher: F, transcoder: T) -> Self {
        Self {
            workspace_config,
            fetcher,
            transcoder,
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn transcoder(&self) -> &T {
        &self.transcoder
    }

    /// Handles one invocation, writing exactly one framed response to `channel`.
    ///
    /// Never fails: every error becomes an error response, and the outcome
    /// records what was sent.
    pub async fn handle<W>(&self, params: &HashMap<String, String>, channel: W) -> InvocationOutcome
    where
        W: AsyncWrite + Unpin + Send,
    {
        let invocation_id = Uuid::new_v4();
        let span = info_span!("invocation", id = %invocation_id);

        async move {
            let started = Instant::now();
            let outcome = self
                .run(params, channel)
                .await
                .into_outcome(invocation_id, started);

            info!(
                stage = %Stage::Done,
                status = outcome.status_code,
                body_bytes = outcome.body_bytes,
                duration_ms = outcome.duration_ms,
                "Invocation finished"
            );
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run<W>(&self, params: &HashMap<String, String>, mut channel: W) -> Responded
    where
        W: AsyncWrite + Unpin + Send,
    {
        debug!(stage = %Stage::Validating, "Validating request");
        let request = match self.validate(params).await {
            Ok(request) => request,
            Err(e) => return self.respond_error(&mut channel, Stage::Validating, e).await,
        };

        let workspace = match Workspace::allocate(&self.workspace_config, &request) {
            Ok(workspace) => workspace,
            Err(e) => {
                return self
                    .respond_error(&mut channel, Stage::Fetching, GatewayError::Workspace(e))
                    .await
            }
        };

        let responded = self.process(&request, &workspace, &mut channel).await;

        debug!(
            stage = %Stage::Cleanup,
            dir = %workspace.dir().display(),
            "Releasing workspace"
        );
        workspace.release().await;

        responded
    }

    async fn validate(&self, params: &HashMap<String, String>) -> Result<Request, GatewayError> {
        let request = Request::from_query(params)?;
        self.transcoder.validate().await?;
        Ok(request)
    }

    async fn process<W>(&self, request: &Request, workspace: &Workspace, channel: &mut W) -> Responded
    where
        W: AsyncWrite + Unpin + Send,
    {
        info!(stage = %Stage::Fetching, url = %request.file_url, "Fetching source file");
        match self
            .fetcher
            .fetch(&request.file_url, workspace.input_path())
            .await
        {
            Ok(fetched) => debug!(bytes = fetched.bytes_written, "Source file downloaded"),
            Err(e) => return self.respond_error(channel, Stage::Fetching, e.into()).await,
        }

        let job = TranscodeJob {
            input_path: workspace.input_path().to_path_buf(),
            output_path: workspace.output_path().to_path_buf(),
            bitrate_kbps: request.output_bitrate.clone(),
        };
        info!(
            stage = %Stage::Transcoding,
            engine = self.transcoder.name(),
            bitrate_kbps = %request.output_bitrate,
            "Transcoding"
        );
        if let Err(e) = self.transcoder.transcode(job).await {
            return self
                .respond_error(channel, Stage::Transcoding, e.into())
                .await;
        }

        info!(stage = %Stage::Responding, "Streaming transcoded output");
        let envelope = ResponseEnvelope::success(workspace.output_path());
        match emit(&mut *channel, &envelope).await {
            Ok(body_bytes) => Responded::completed(200, body_bytes),
            Err(e) if !e.metadata_sent() => {
                self.respond_error(channel, Stage::Responding, e.into())
                    .await
            }
            Err(e) => {
                // A second metadata frame is not allowed; all we can do is log.
                error!(
                    stage = %Stage::Responding,
                    error = %e,
                    "Response stream broke after metadata was sent"
                );
                Responded {
                    status_code: 200,
                    failed_stage: Some(Stage::Responding),
                    error_message: Some(e.to_string()),
                    body_bytes: e.body_bytes(),
                    stream_completed: false,
                }
            }
        }
    }

    async fn respond_error<W>(&self, channel: &mut W, stage: Stage, err: GatewayError) -> Responded
    where
        W: AsyncWrite + Unpin + Send,
    {
        let status_code = err.status_code();
        let body = err.to_error_body();
        error!(
            stage = %stage,
            status = status_code,
            kind = ?err.kind(),
            error = ?err,
            "Invocation failed"
        );

        let envelope = error_response(status_code, body.clone());
        let (body_bytes, stream_completed) = match emit(channel, &envelope).await {
            Ok(written) => (written, true),
            Err(e) => {
                warn!(error = %e, "Failed to stream error response");
                (e.body_bytes(), false)
            }
        };

        Responded {
            status_code,
            failed_stage: Some(stage),
            error_message: Some(body.message),
            body_bytes,
            stream_completed,
        }
    }
}
