use super::{ErrorInputs, StructuredError};
use axum::http::StatusCode;
use serde_json::{Value, json};

/// Base structured HTTP error
///
/// Renders as `{"statusCode", "error", "message"}` where `error` is the
/// canonical reason phrase of the status.
///
/// # Example
/// ```
/// use http_error_kit_axum::kit::{HttpError, StructuredError};
///
/// let error = HttpError::not_found("User not found");
/// assert_eq!(error.status_code(), 404);
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    status_code: u16,
    message: String,
    details: Option<Value>,
    expose_inputs: bool,
}

impl HttpError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            details: None,
            expose_inputs: true,
        }
    }

    /// Attach additional context rendered under `details`
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Hide the construction inputs from formatters
    pub fn without_inputs(mut self) -> Self {
        self.expose_inputs = false;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST.as_u16(), message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED.as_u16(), message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN.as_u16(), message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND.as_u16(), message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT.as_u16(), message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR.as_u16(), message)
    }
}

impl StructuredError for HttpError {
    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn inputs(&self) -> Option<ErrorInputs> {
        self.expose_inputs.then(|| ErrorInputs {
            status_code: self.status_code,
            message: self.message.clone(),
            details: self.details.clone(),
        })
    }

    fn to_json(&self) -> Value {
        let reason = StatusCode::from_u16(self.status_code)
            .ok()
            .and_then(|status| status.canonical_reason())
            .unwrap_or("Unknown Error");

        let mut body = json!({
            "statusCode": self.status_code,
            "error": reason,
            "message": self.message,
        });
        if let (Some(details), Some(map)) = (&self.details, body.as_object_mut()) {
            map.insert("details".to_string(), details.clone());
        }
        body
    }
}
