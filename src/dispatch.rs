//! Side-effecting error dispatch.
//!
//! Every failed request passes through [`dispatch`] exactly once before the
//! error is returned to the caller. Dispatch only logs; it never recovers,
//! never rewrites the error, and never fails.

use crate::errors::{Error, ErrorKind};

/// Which handler a given error kind routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Handler {
    Abort,
    Network,
    Client,
    Server,
    /// Fallback for every kind without a dedicated handler.
    Default,
}

pub(crate) fn handler_for(kind: ErrorKind) -> Handler {
    match kind {
        ErrorKind::Abort => Handler::Abort,
        ErrorKind::Network => Handler::Network,
        ErrorKind::Client => Handler::Client,
        ErrorKind::Server => Handler::Server,
        ErrorKind::Validation | ErrorKind::Unexpected => Handler::Default,
    }
}

/// Routes an error to its logging handler. Infallible by construction: the
/// routing match is exhaustive and each handler only writes a log line.
pub(crate) fn dispatch(error: &Error) {
    match handler_for(error.kind()) {
        Handler::Abort => tracing::warn!("Request aborted: {}", error),
        Handler::Network => tracing::error!("Network failure: {}", error),
        Handler::Client => tracing::warn!("Client error response: {}", error),
        Handler::Server => tracing::error!("Server error response: {}", error),
        Handler::Default => tracing::error!("Unexpected request error: {}", error),
    }
}
