use crate::config::FormatterConfig;
use crate::error::ReplyError;
use crate::exception::ExceptionFilter;
use crate::kit::{Classified, StructuredError, ThrownError, classify};
use crate::reply::{Reply, ReplyBody};
use crate::request::RequestContext;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Status used when nothing else resolves to a usable code
pub const DEFAULT_STATUS: u16 = 500;

/// Exception filter answering structured HTTP errors
///
/// Structured errors get an explicit status and either the formatter's
/// payload or the error itself as body. Other errors are sent as-is and keep
/// the host's default status. If writing fails, the failure is logged and
/// sent once with status 500.
#[derive(Debug, Clone, Default)]
pub struct KitExceptionFilter {
    config: FormatterConfig,
}

impl KitExceptionFilter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    fn respond(&self, error: &ThrownError, reply: &mut dyn Reply) -> Result<(), ReplyError> {
        match classify(error.as_ref()) {
            Classified::Structured(structured) => {
                let (status, body) = self.resolve(structured, error)?;
                reply.status(status)?;
                reply.send(body)
            }
            Classified::Unclassified => reply.send(ReplyBody::Error(Arc::clone(error))),
        }
    }

    /// Status code and body for a structured error
    fn resolve(
        &self,
        structured: &dyn StructuredError,
        error: &ThrownError,
    ) -> Result<(u16, ReplyBody), ReplyError> {
        let payload = match structured.inputs() {
            Some(inputs) => self.config.format(&inputs).map_err(ReplyError::Formatter)?,
            None => None,
        };

        let status = payload
            .as_ref()
            .and_then(payload_status)
            .into_iter()
            .chain([structured.status_code()])
            .find(|code| *code != 0)
            .unwrap_or(DEFAULT_STATUS);

        let body = match payload {
            Some(payload) => ReplyBody::Formatted(payload),
            None => ReplyBody::Error(Arc::clone(error)),
        };
        Ok((status, body))
    }
}

/// `statusCode` of a formatter payload.
///
/// Only non-negative integers count. Strings, floats and negative numbers are
/// ignored, so the error's own status applies. Values past `u16` saturate so
/// the reply channel rejects them.
fn payload_status(payload: &Value) -> Option<u16> {
    payload
        .get("statusCode")
        .and_then(Value::as_u64)
        .map(|code| u16::try_from(code).unwrap_or(u16::MAX))
}

#[async_trait]
impl ExceptionFilter for KitExceptionFilter {
    async fn catch(
        &self,
        error: ThrownError,
        request: &RequestContext,
        reply: &mut dyn Reply,
    ) -> Result<(), ReplyError> {
        let failure = match self.respond(&error, reply) {
            Ok(()) => return Ok(()),
            Err(failure) => failure,
        };

        request.log_error(&failure);

        if let Err(status_failure) = reply.status(DEFAULT_STATUS) {
            tracing::warn!(error = %status_failure, "Fallback status was rejected");
        }
        reply.send(ReplyBody::error(failure))
    }
}
