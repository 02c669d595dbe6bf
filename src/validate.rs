//! Schema validation of decoded JSON bodies.
//!
//! The executor only ever sees the [`ResponseValidator`] contract: given a
//! decoded [`serde_json::Value`], produce a typed value or fail. The
//! serde-backed [`Schema`] covers the common case; closures cover ad-hoc
//! checks that serde derives cannot express.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

/// A decoded body did not match the expected shape.
#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

/// Capability to coerce an untyped decoded value into a typed one.
///
/// Supplied by the caller and only invoked by the executor; the executor
/// never inspects the value itself.
pub trait ResponseValidator {
    type Output;

    fn parse(&self, value: serde_json::Value) -> Result<Self::Output, ValidationError>;
}

impl<T, F> ResponseValidator for F
where
    F: Fn(serde_json::Value) -> Result<T, ValidationError>,
{
    type Output = T;

    fn parse(&self, value: serde_json::Value) -> Result<T, ValidationError> {
        self(value)
    }
}

/// Validator backed by a `Deserialize` implementation: the schema is the
/// target type itself.
pub struct Schema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Schema<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> ResponseValidator for Schema<T> {
    type Output = T;

    fn parse(&self, value: serde_json::Value) -> Result<T, ValidationError> {
        serde_json::from_value(value).map_err(ValidationError::from)
    }
}
