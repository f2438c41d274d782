//! Reply channels
//!
//! The error handler writes through the [`Reply`] trait so it never depends
//! on how a response is assembled. [`ResponseReply`] is the axum-backed
//! channel used by the middleware.

use crate::error::ReplyError;
use crate::kit::{Classified, ThrownError, classify};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use std::error::Error;
use std::sync::Arc;

/// Body handed to [`Reply::send`]
#[derive(Debug, Clone)]
pub enum ReplyBody {
    /// The error object itself
    Error(ThrownError),
    /// A payload produced by a formatter
    Formatted(Value),
}

impl ReplyBody {
    pub fn error(error: impl Error + Send + Sync + 'static) -> Self {
        Self::Error(Arc::new(error))
    }

    /// The thrown error, when the body is one
    pub fn as_error(&self) -> Option<&ThrownError> {
        match self {
            ReplyBody::Error(error) => Some(error),
            ReplyBody::Formatted(_) => None,
        }
    }

    /// Render the body as JSON.
    ///
    /// Structured errors render themselves. Anything else gets the host's
    /// default error shape.
    pub fn to_json(&self) -> Value {
        match self {
            ReplyBody::Formatted(payload) => payload.clone(),
            ReplyBody::Error(error) => match classify(error.as_ref()) {
                Classified::Structured(structured) => structured.to_json(),
                Classified::Unclassified => json!({
                    "statusCode": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    "error": "Internal Server Error",
                    "message": error.to_string(),
                    "timestamp": chrono::Utc::now().to_rfc3339(),
                }),
            },
        }
    }

    fn default_status(&self) -> StatusCode {
        match self {
            ReplyBody::Error(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ReplyBody::Formatted(_) => StatusCode::OK,
        }
    }
}

/// Response-writing capability of the host, one per request
pub trait Reply: Send {
    /// Set the status code of the response
    fn status(&mut self, code: u16) -> Result<(), ReplyError>;

    /// Write the response body
    fn send(&mut self, body: ReplyBody) -> Result<(), ReplyError>;
}

/// Reply channel assembling an axum [`Response`]
#[derive(Debug, Default)]
pub struct ResponseReply {
    status: Option<StatusCode>,
    response: Option<Response>,
}

impl ResponseReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_sent(&self) -> bool {
        self.response.is_some()
    }

    /// The written response, or `None` if nothing was sent
    pub fn into_response(self) -> Option<Response> {
        self.response
    }
}

impl Reply for ResponseReply {
    fn status(&mut self, code: u16) -> Result<(), ReplyError> {
        if self.is_sent() {
            return Err(ReplyError::AlreadySent);
        }
        let status = StatusCode::from_u16(code).map_err(|_| ReplyError::InvalidStatus(code))?;
        self.status = Some(status);
        Ok(())
    }

    fn send(&mut self, body: ReplyBody) -> Result<(), ReplyError> {
        if self.is_sent() {
            return Err(ReplyError::AlreadySent);
        }
        let status = self.status.unwrap_or_else(|| body.default_status());
        self.response = Some((status, Json(body.to_json())).into_response());
        Ok(())
    }
}
