//! Per-request configuration: method, headers, body, and cancellation.

use std::collections::BTreeMap;

use tokio_util::sync::CancellationToken;

/// HTTP methods supported by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A handle the caller keeps to abort an in-flight request.
///
/// Cloneable and shareable across tasks; cancelling after the request has
/// completed is a no-op. The executor derives a per-call child token from
/// this handle, so one handle can be attached to several requests.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation of every request this handle is attached to.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub(crate) fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

/// Configuration for a single request. Built fresh per call and consumed by
/// [`crate::RequestExecutor::execute`].
#[derive(Debug, Default, Clone)]
pub struct RequestConfig {
    pub(crate) method: Option<Method>,
    pub(crate) headers: BTreeMap<String, String>,
    pub(crate) body: Option<Vec<u8>>,
    pub(crate) cancel: Option<CancelHandle>,
}

impl RequestConfig {
    pub fn new(method: Method) -> Self {
        Self {
            method: Some(method),
            ..Self::default()
        }
    }

    /// Sets a request header. Later values win over earlier ones for the
    /// same name; header names are matched case-insensitively.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets an opaque request body. The caller is responsible for setting a
    /// matching `content-type`; the verb shims do this for JSON.
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches a cancellation handle the caller can trigger while the
    /// request is in flight.
    pub fn with_cancel(mut self, cancel: CancelHandle) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub(crate) fn method(&self) -> Method {
        self.method.unwrap_or(Method::Get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_lowercased_and_last_write_wins() {
        let config = RequestConfig::new(Method::Get)
            .with_header("Accept", "text/plain")
            .with_header("ACCEPT", "application/json");
        assert_eq!(
            config.headers.get("accept").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(config.headers.len(), 1);
    }

    #[test]
    fn method_defaults_to_get() {
        assert_eq!(RequestConfig::default().method(), Method::Get);
    }

    #[test]
    fn cancel_handle_is_sticky() {
        let handle = CancelHandle::new();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
        // Cancelling again is a no-op.
        handle.cancel();
        assert!(handle.is_cancelled());
    }
}
