//! Testing utilities and mock implementations.
//!
//! Mocks for the fetch and engine seams let the whole pipeline run without
//! network access or an ffmpeg install. [`BrokenChannel`] injects a response
//! channel failure partway through a body.
//!
//! # Example
//!
//! ```rust,ignore
//! use transcodegate_core::testing::{MockFetcher, MockTranscoder};
//!
//! let fetcher = MockFetcher::new();
//! fetcher.set_body(b"source bytes".to_vec()).await;
//! let transcoder = MockTranscoder::new();
//!
//! let gateway = Gateway::new(workspace_config, fetcher.clone(), transcoder.clone());
//! let outcome = gateway.handle(&params, &mut channel).await;
//!
//! assert_eq!(transcoder.job_count().await, 1);
//! ```

mod broken_channel;
mod mock_fetcher;
mod mock_transcoder;

pub use broken_channel::BrokenChannel;
pub use mock_fetcher::{MockFetcher, RecordedFetch};
pub use mock_transcoder::MockTranscoder;

/// Splits framed response bytes into the parsed metadata frame and the body.
///
/// Panics if the bytes are not a well-formed frame.
pub fn split_response(bytes: &[u8]) -> (serde_json::Value, Vec<u8>) {
    use crate::response::METADATA_DELIMITER;

    let at = bytes
        .windows(METADATA_DELIMITER.len())
        .position(|w| w == METADATA_DELIMITER)
        .expect("response has no metadata delimiter");
    let metadata = serde_json::from_slice(&bytes[..at]).expect("metadata frame is not JSON");
    (metadata, bytes[at + METADATA_DELIMITER.len()..].to_vec())
}
