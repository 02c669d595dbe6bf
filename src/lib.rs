//! Typed HTTP request helper.
//!
//! One [`RequestExecutor::execute`] call performs one HTTP round trip, bound
//! to a per-call cancellation token with a timeout, classifies failures by
//! status code into [`ErrorKind`], validates the decoded JSON body through a
//! caller-supplied [`ResponseValidator`], and logs every failure through a
//! kind-routed dispatch before returning it.

mod config;
mod dispatch;
mod errors;
mod executor;
mod validate;

pub use self::config::{CancelHandle, Method, RequestConfig};
pub use self::errors::{Error, ErrorKind};
pub use self::executor::RequestExecutor;
pub use self::validate::{ResponseValidator, Schema, ValidationError};
