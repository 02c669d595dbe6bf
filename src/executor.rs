//! The request executor: one classified, validated HTTP round trip per call.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::{Method, RequestConfig};
use crate::dispatch::dispatch;
use crate::errors::Error;
use crate::validate::ResponseValidator;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Executes single HTTP requests with timeout, status classification, and
/// response validation.
///
/// Each call is independent: a fresh `reqwest::Client` and a fresh
/// cancellation token are created per request, and no state is shared
/// between calls. The executor is cheap to construct and can be used from
/// multiple tasks concurrently.
pub struct RequestExecutor {
    timeout: Duration,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestExecutor {
    /// Creates an executor with the default 30-second timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates an executor with a custom timeout. The timeout cancels the
    /// in-flight call and surfaces as [`crate::ErrorKind::Abort`].
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Performs one request and validates the decoded JSON response.
    ///
    /// Failure classification:
    /// - transport failure (DNS, connection, TLS) → [`Error::Network`]
    /// - status 400..=499 → [`Error::Client`]
    /// - status >= 500 → [`Error::Server`]
    /// - timeout or caller cancellation → [`Error::Abort`]
    /// - decoded body rejected by the validator → [`Error::Validation`]
    /// - anything else (non-JSON body, 1xx status) → [`Error::Unexpected`]
    ///
    /// Every error is routed through the logging dispatch before being
    /// returned; the returned error is always the original one.
    pub async fn execute<V: ResponseValidator>(
        &self,
        address: &str,
        config: RequestConfig,
        validator: &V,
    ) -> Result<V::Output, Error> {
        let token = match &config.cancel {
            Some(handle) => handle.child_token(),
            None => CancellationToken::new(),
        };
        let result = with_cancellation(token, self.timeout, async {
            let value = self.round_trip(address, &config).await?;
            validator.parse(value).map_err(Error::from)
        })
        .await;
        if let Err(err) = &result {
            dispatch(err);
        }
        result
    }

    /// GET `address` and validate the response.
    pub async fn get<V: ResponseValidator>(
        &self,
        address: &str,
        validator: &V,
    ) -> Result<V::Output, Error> {
        self.execute(address, RequestConfig::new(Method::Get), validator)
            .await
    }

    /// DELETE `address` and validate the response.
    pub async fn delete<V: ResponseValidator>(
        &self,
        address: &str,
        validator: &V,
    ) -> Result<V::Output, Error> {
        self.execute(address, RequestConfig::new(Method::Delete), validator)
            .await
    }

    /// POST `body` as JSON to `address` and validate the response.
    pub async fn post<B, V>(&self, address: &str, body: &B, validator: &V) -> Result<V::Output, Error>
    where
        B: Serialize + ?Sized,
        V: ResponseValidator,
    {
        self.send_json(Method::Post, address, body, validator).await
    }

    /// PUT `body` as JSON to `address` and validate the response.
    pub async fn put<B, V>(&self, address: &str, body: &B, validator: &V) -> Result<V::Output, Error>
    where
        B: Serialize + ?Sized,
        V: ResponseValidator,
    {
        self.send_json(Method::Put, address, body, validator).await
    }

    /// PATCH `body` as JSON to `address` and validate the response.
    pub async fn patch<B, V>(&self, address: &str, body: &B, validator: &V) -> Result<V::Output, Error>
    where
        B: Serialize + ?Sized,
        V: ResponseValidator,
    {
        self.send_json(Method::Patch, address, body, validator).await
    }

    async fn send_json<B, V>(
        &self,
        method: Method,
        address: &str,
        body: &B,
        validator: &V,
    ) -> Result<V::Output, Error>
    where
        B: Serialize + ?Sized,
        V: ResponseValidator,
    {
        let config = json_config(method, body).inspect_err(dispatch)?;
        self.execute(address, config, validator).await
    }

    async fn round_trip(
        &self,
        address: &str,
        config: &RequestConfig,
    ) -> Result<serde_json::Value, Error> {
        let url = Url::parse(address).map_err(|e| {
            tracing::error!("Invalid address '{}': {}", address, e);
            Error::Unexpected(format!("invalid address '{}': {}", address, e))
        })?;

        let client = reqwest::Client::builder().build().map_err(|e| {
            tracing::error!("Failed to build HTTP client: {}", e);
            Error::Unexpected(format!("failed to build HTTP client: {}", e))
        })?;

        let mut request = client.request(config.method().into(), url);
        // Caching is always disabled unless the caller explicitly overrides.
        if !config.headers.contains_key("cache-control") {
            request = request.header("cache-control", "no-store");
        }
        for (name, value) in &config.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &config.body {
            request = request.body(body.clone());
        }

        let resp = request.send().await.map_err(|e| {
            tracing::error!("Transport failure for {}: {}", address, e);
            Error::Network(e.to_string())
        })?;

        let status = resp.status();
        let status_text = status.canonical_reason().unwrap_or("").to_string();
        match status.as_u16() {
            400..=499 => {
                return Err(Error::Client {
                    status: status.as_u16(),
                    status_text,
                })
            }
            500..=u16::MAX => {
                return Err(Error::Server {
                    status: status.as_u16(),
                    status_text,
                })
            }
            // Redirects are followed by the transport; anything still in
            // the 3xx range at this point carries the final body.
            200..=399 => {}
            other => {
                return Err(Error::Unexpected(format!(
                    "unexpected status {}: {}",
                    other, status_text
                )))
            }
        }

        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::Network(format!("failed to read response body: {}", e))
        })?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Response body is not valid JSON: {}", e);
            Error::Unexpected(format!("response body is not valid JSON: {}", e))
        })
    }
}

fn json_config<B: Serialize + ?Sized>(method: Method, body: &B) -> Result<RequestConfig, Error> {
    let bytes = serde_json::to_vec(body).map_err(|e| {
        tracing::error!("Failed to serialize request body: {}", e);
        Error::Unexpected(format!("failed to serialize request body: {}", e))
    })?;
    Ok(RequestConfig::new(method)
        .with_header("content-type", "application/json")
        .with_body(bytes))
}

/// Runs `fut` under a per-call cancellation scope.
///
/// The token is released (cancelled) by the drop guard on every exit path,
/// exactly once per call. `biased` makes an already-cancelled token win over
/// a ready response, so caller cancellation is deterministic.
async fn with_cancellation<T>(
    token: CancellationToken,
    timeout: Duration,
    fut: impl Future<Output = Result<T, Error>>,
) -> Result<T, Error> {
    let _guard = token.clone().drop_guard();
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(Error::Abort("request cancelled".to_string())),
        _ = tokio::time::sleep(timeout) => Err(Error::Abort(format!(
            "timed out after {}ms",
            timeout.as_millis()
        ))),
        result = fut => result,
    }
}
