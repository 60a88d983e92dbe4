pub mod config;
pub mod fetcher;
pub mod gateway;
pub mod request;
pub mod response;
pub mod testing;
pub mod transcoder;
pub mod workspace;

pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, DiagnosticTarget, EngineConfig, FetchConfig, WorkspaceConfig,
};
pub use fetcher::{FetchError, FetchResult, Fetcher, HttpFetcher};
pub use gateway::{ErrorKind, Gateway, GatewayError, InvocationOutcome, Stage};
pub use request::{InvocationEvent, Request, ValidationError};
pub use response::{
    emit, emit_error, emit_success, error_response, BodyStream, ErrorBody, FramingError,
    ResponseEnvelope, ResponseMetadata, ResponseStream,
};
pub use transcoder::{FfmpegTranscoder, TranscodeError, TranscodeJob, TranscodeResult, Transcoder};
pub use workspace::Workspace;
