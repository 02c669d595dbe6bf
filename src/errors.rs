//! Error taxonomy for request execution.

use crate::validate::ValidationError;

/// Errors produced by [`crate::RequestExecutor`].
///
/// Every failure of a request carries exactly one of these kinds. Callers
/// branch on [`Error::kind`] to decide their own retry or backoff policy;
/// the executor itself never retries.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Transport-level failure with no usable response (DNS, connection,
    /// TLS).
    #[error("network error: {0}")]
    Network(String),
    /// The server answered with a status in 400..=499.
    #[error("{status}: {status_text}")]
    Client { status: u16, status_text: String },
    /// The server answered with a status of 500 or above.
    #[error("{status}: {status_text}")]
    Server { status: u16, status_text: String },
    /// The request was cancelled or timed out before completion.
    #[error("request aborted: {0}")]
    Abort(String),
    /// The response body decoded, but did not match the expected schema.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
    /// Anything that does not fit the other kinds, e.g. a 2xx body that is
    /// not valid JSON, or a request body that could not be serialized.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Discriminant of [`Error`], for branching without destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Client,
    Server,
    Abort,
    Validation,
    Unexpected,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::Client { .. } => ErrorKind::Client,
            Error::Server { .. } => ErrorKind::Server,
            Error::Abort(_) => ErrorKind::Abort,
            Error::Validation(_) => ErrorKind::Validation,
            Error::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}
