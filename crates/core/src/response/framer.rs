//! Metadata-then-body response framing over any async writer.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::envelope::{ErrorBody, ResponseEnvelope, ResponseMetadata};

/// Bytes separating the metadata frame from the body.
pub const METADATA_DELIMITER: [u8; 8] = [0; 8];

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Errors that can occur while emitting a response.
#[derive(Debug, Error)]
pub enum FramingError {
    /// A frame or body could not be serialized.
    #[error("Failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),

    /// The success body could not be opened.
    #[error("Failed to open response body {path}: {source}")]
    BodySource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing to the channel (or reading the body source) failed midway.
    #[error("Response stream failed after {body_bytes} body bytes: {source}")]
    Stream {
        body_bytes: u64,
        #[source]
        source: io::Error,
    },
}

impl FramingError {
    /// Whether the metadata frame may already be on the wire.
    ///
    /// When true, no other response can be sent on the same channel.
    pub fn metadata_sent(&self) -> bool {
        matches!(self, Self::Stream { .. })
    }

    /// Body bytes fully written before the failure.
    pub fn body_bytes(&self) -> u64 {
        match self {
            Self::Stream { body_bytes, .. } => *body_bytes,
            _ => 0,
        }
    }
}

/// A channel on which nothing has been written yet.
#[derive(Debug)]
pub struct ResponseStream<W> {
    channel: W,
}

impl<W> ResponseStream<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(channel: W) -> Self {
        Self { channel }
    }

    /// Writes the metadata frame and hands over the body half of the channel.
    pub async fn send_metadata(
        mut self,
        metadata: &ResponseMetadata,
    ) -> Result<BodyStream<W>, FramingError> {
        let mut frame = serde_json::to_vec(metadata)?;
        frame.extend_from_slice(&METADATA_DELIMITER);
        self.channel
            .write_all(&frame)
            .await
            .map_err(|source| FramingError::Stream {
                body_bytes: 0,
                source,
            })?;

        Ok(BodyStream {
            channel: self.channel,
            bytes_written: 0,
        })
    }
}

/// A channel whose metadata frame has been sent.
#[derive(Debug)]
pub struct BodyStream<W> {
    channel: W,
    bytes_written: u64,
}

impl<W> BodyStream<W>
where
    W: AsyncWrite + Unpin,
{
    /// Writes a chunk of body bytes.
    pub async fn write(&mut self, bytes: &[u8]) -> Result<(), FramingError> {
        self.channel
            .write_all(bytes)
            .await
            .map_err(|e| self.stream_error(e))?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Streams `reader` into the body until EOF, one buffer at a time.
    pub async fn pipe_from<R>(&mut self, reader: &mut R) -> Result<u64, FramingError>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        let mut buf = vec![0u8; COPY_BUFFER_SIZE];
        let mut copied = 0u64;
        loop {
            let n = reader.read(&mut buf).await.map_err(|e| self.stream_error(e))?;
            if n == 0 {
                break;
            }
            self.write(&buf[..n]).await?;
            copied += n as u64;
        }
        Ok(copied)
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Flushes and closes the channel. Returns the body length.
    pub async fn finish(mut self) -> Result<u64, FramingError> {
        if let Err(e) = self.channel.flush().await {
            return Err(self.stream_error(e));
        }
        if let Err(e) = self.channel.shutdown().await {
            return Err(self.stream_error(e));
        }
        Ok(self.bytes_written)
    }

    fn stream_error(&self, source: io::Error) -> FramingError {
        FramingError::Stream {
            body_bytes: self.bytes_written,
            source,
        }
    }
}

/// Emits a JSON error response and completes the channel.
pub async fn emit_error<W>(
    channel: W,
    status_code: u16,
    body: &ErrorBody,
) -> Result<u64, FramingError>
where
    W: AsyncWrite + Unpin,
{
    let envelope = super::envelope::error_response(status_code, body.clone());
    let encoded = serde_json::to_vec(body)?;

    let mut stream = ResponseStream::new(channel)
        .send_metadata(&envelope.metadata())
        .await?;
    stream.write(&encoded).await?;
    stream.finish().await
}

/// Emits the file at `path` as a 200 attachment and completes the channel.
///
/// The file is opened before anything is written, so a missing file leaves
/// the channel untouched.
pub async fn emit_success<W>(channel: W, path: &Path) -> Result<u64, FramingError>
where
    W: AsyncWrite + Unpin,
{
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|source| FramingError::BodySource {
            path: path.to_path_buf(),
            source,
        })?;

    let envelope = ResponseEnvelope::success(path);
    let mut stream = ResponseStream::new(channel)
        .send_metadata(&envelope.metadata())
        .await?;
    stream.pipe_from(&mut file).await?;
    stream.finish().await
}

/// Emits whichever response the envelope describes.
pub async fn emit<W>(channel: W, envelope: &ResponseEnvelope) -> Result<u64, FramingError>
where
    W: AsyncWrite + Unpin,
{
    match envelope {
        ResponseEnvelope::Success(payload) => emit_success(channel, &payload.path).await,
        ResponseEnvelope::Error(payload) => {
            emit_error(channel, payload.status_code, &payload.body).await
        }
    }
}
