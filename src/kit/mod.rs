//! Structured HTTP errors
//!
//! A structured error carries an HTTP status code and the inputs it was built
//! from. The inputs are what a configured formatter sees when it shapes the
//! response body. Any other error is treated as unclassified.

use serde::Serialize;
use serde_json::{Value, json};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

pub mod general;
pub mod http;

pub use general::GeneralError;
pub use http::HttpError;

/// A thrown error, shared so the same object can be sent back as a body.
pub type ThrownError = Arc<dyn Error + Send + Sync + 'static>;

/// The values a structured error was constructed from
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInputs {
    pub status_code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Capability shared by every structured HTTP error.
///
/// A status code of `0` means the error carries no usable status.
pub trait StructuredError: Error + Send + Sync + 'static {
    /// HTTP status code of this error
    fn status_code(&self) -> u16;

    /// Inputs handed to a formatter, if the error exposes them
    fn inputs(&self) -> Option<ErrorInputs>;

    /// JSON body used when the error itself is sent as the response
    fn to_json(&self) -> Value {
        json!({
            "statusCode": self.status_code(),
            "message": self.to_string(),
        })
    }
}

/// Any [`StructuredError`] implementor, carried as a thrown error.
///
/// Built-in variants are recognised directly; custom implementors are
/// recognised through this wrapper (see `Thrown::structured`).
#[derive(Clone)]
pub struct SharedStructured(Arc<dyn StructuredError>);

impl SharedStructured {
    pub fn new(error: impl StructuredError) -> Self {
        Self(Arc::new(error))
    }

    pub fn inner(&self) -> &dyn StructuredError {
        self.0.as_ref()
    }
}

impl fmt::Debug for SharedStructured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for SharedStructured {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.0, f)
    }
}

impl Error for SharedStructured {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

/// Result of inspecting a thrown error once at handler entry
pub enum Classified<'a> {
    Structured(&'a dyn StructuredError),
    Unclassified,
}

impl Classified<'_> {
    pub fn is_structured(&self) -> bool {
        matches!(self, Classified::Structured(_))
    }
}

/// Classify a thrown error by its structured-error capability.
pub fn classify<'a>(error: &'a (dyn Error + Send + Sync + 'static)) -> Classified<'a> {
    if let Some(shared) = error.downcast_ref::<SharedStructured>() {
        return Classified::Structured(shared.inner());
    }
    if let Some(http) = error.downcast_ref::<HttpError>() {
        return Classified::Structured(http);
    }
    if let Some(general) = error.downcast_ref::<GeneralError>() {
        return Classified::Structured(general);
    }
    Classified::Unclassified
}
