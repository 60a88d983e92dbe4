//! Pipeline orchestrator.
//!
//! One call to [`Gateway::handle`] is one invocation:
//!
//! ```text
//! Validating -> Fetching -> Transcoding -> Responding -> Cleanup -> Done
//!      \____________\____________\
//!                                 -> Failed -> Responding (error) -> Cleanup -> Done
//! ```
//!
//! Every failure is turned into an error response at this boundary, and the
//! workspace is released on every path once it has been allocated.

mod error;
mod runner;
mod types;

pub use error::{ErrorKind, GatewayError};
pub use runner::Gateway;
pub use types::{InvocationOutcome, Stage};
