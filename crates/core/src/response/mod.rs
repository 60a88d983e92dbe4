//! Two-phase response framing.
//!
//! Every response is one metadata frame (status code and headers) followed
//! by a raw body stream. On the wire the metadata is a compact JSON object
//! terminated by eight NUL bytes:
//!
//! ```text
//! {"statusCode":200,"headers":{...}}\0\0\0\0\0\0\0\0<body bytes...>
//! ```
//!
//! [`ResponseStream`] and [`BodyStream`] encode the ordering in the type
//! system: metadata can only be sent once, and body bytes can only be
//! written after it.

mod envelope;
mod framer;

pub use envelope::{
    error_response, ErrorBody, ErrorPayload, ResponseEnvelope, ResponseMetadata, SuccessPayload,
    CONTENT_TYPE_JSON, CONTENT_TYPE_OCTET_STREAM, SUCCESS_CONTENT_DISPOSITION,
};
pub use framer::{
    emit, emit_error, emit_success, BodyStream, FramingError, ResponseStream, METADATA_DELIMITER,
};
