use axum::http::{Method, Request, Uri};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Header carrying a caller-supplied request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request logging capability used by the error handler
pub trait RequestLog: Send + Sync {
    fn error(&self, failure: &(dyn Error + 'static));
}

/// The parts of a request the error handler needs
#[derive(Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    request_id: Option<String>,
    log: Option<Arc<dyn RequestLog>>,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            request_id: None,
            log: None,
        }
    }

    pub fn from_request<B>(request: &Request<B>) -> Self {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            request_id,
            ..Self::new(request.method().clone(), request.uri().clone())
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Route this request's error logs somewhere other than `tracing`
    pub fn with_log(mut self, log: Arc<dyn RequestLog>) -> Self {
        self.log = Some(log);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn log_error(&self, failure: &(dyn Error + 'static)) {
        match &self.log {
            Some(log) => log.error(failure),
            None => tracing::error!(
                method = %self.method,
                uri = %self.uri,
                request_id = self.request_id.as_deref().unwrap_or("-"),
                error = %failure,
                "Failed to write error response"
            ),
        }
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("request_id", &self.request_id)
            .finish()
    }
}
