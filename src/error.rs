use crate::kit::{SharedStructured, StructuredError, ThrownError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::error::Error;
use std::sync::Arc;

pub type Result<T> = std::result::Result<T, KitError>;

/// Boxed error accepted from reply channels and inner services
pub type BoxError = Box<dyn Error + Send + Sync>;

/// Failures raised by a reply channel while writing a response
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error("Invalid status code: {0}")]
    InvalidStatus(u16),

    #[error("Reply already sent")]
    AlreadySent,

    #[error("Formatter failed: {0}")]
    Formatter(#[source] BoxError),

    #[error(transparent)]
    Other(BoxError),
}

impl ReplyError {
    pub fn other(error: impl Into<BoxError>) -> Self {
        Self::Other(error.into())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KitError {
    #[error("Error response could not be written: {0}")]
    Reply(#[from] ReplyError),

    #[error("Error handler produced no response")]
    NothingSent,
}

impl IntoResponse for KitError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Error type for axum handlers.
///
/// Any error converts into `Thrown` through `?`. Custom [`StructuredError`]
/// implementors go through [`Thrown::structured`] so their status survives.
/// The response it produces is a
/// placeholder: [`ExceptionMiddleware`](crate::exception::layer::ExceptionMiddleware)
/// replaces it with whatever the installed error handler writes.
///
/// # Example
/// ```
/// use http_error_kit_axum::{Thrown, kit::HttpError};
///
/// async fn find_user(id: u32) -> Result<String, Thrown> {
///     if id == 0 {
///         return Err(HttpError::not_found("User not found").into());
///     }
///     Ok("ferris".to_string())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Thrown(ThrownError);

impl Thrown {
    pub fn new(error: impl Error + Send + Sync + 'static) -> Self {
        Self(Arc::new(error))
    }

    /// Throw a custom structured error, keeping its capability visible
    pub fn structured(error: impl StructuredError) -> Self {
        Self::new(SharedStructured::new(error))
    }

    pub fn from_shared(error: ThrownError) -> Self {
        Self(error)
    }

    pub fn error(&self) -> &ThrownError {
        &self.0
    }

    pub fn into_inner(self) -> ThrownError {
        self.0
    }
}

impl<E> From<E> for Thrown
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

/// Response extension carrying a thrown error to the middleware
#[derive(Clone)]
pub(crate) struct ThrownExtension(pub(crate) ThrownError);

impl IntoResponse for Thrown {
    fn into_response(self) -> Response {
        let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        response.extensions_mut().insert(ThrownExtension(self.0));
        response
    }
}
