//! Types describing an invocation's progress and result.

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Pipeline stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Validating,
    Fetching,
    Transcoding,
    Responding,
    Cleanup,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Fetching => "fetching",
            Self::Transcoding => "transcoding",
            Self::Responding => "responding",
            Self::Cleanup => "cleanup",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What happened during one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationOutcome {
    pub invocation_id: Uuid,
    /// Status code in the metadata frame that was sent.
    pub status_code: u16,
    /// Stage at which the invocation failed, if it did.
    pub failed_stage: Option<Stage>,
    /// Description of the failure, if any.
    pub error_message: Option<String>,
    /// Body bytes written to the channel.
    pub body_bytes: u64,
    /// Whether the channel was flushed and closed cleanly.
    pub stream_completed: bool,
    pub duration_ms: u64,
}

impl InvocationOutcome {
    pub fn is_success(&self) -> bool {
        self.status_code == 200 && self.failed_stage.is_none() && self.stream_completed
    }
}
