//! # http-error-kit-axum
//!
//! Centralized structured HTTP error responses for axum applications.
//!
//! Handlers return [`Thrown`] errors. An [`ExceptionLayer`] with the
//! structured error handler installed turns them into responses:
//!
//! - **Structured errors** ([`HttpError`], [`GeneralError`], or any
//!   [`StructuredError`] thrown with [`Thrown::structured`]) are answered with
//!   their own status code and either the error itself or the payload of a
//!   configured formatter as body.
//! - **Other errors** are sent as-is with the default 500 status.
//! - If writing the response fails, the failure is logged and sent once as a
//!   500 response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use http_error_kit_axum::prelude::*;
//! use serde_json::json;
//!
//! async fn get_user() -> Result<String, Thrown> {
//!     Err(HttpError::not_found("User not found").into())
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = FormatterConfig::new().configure_formatter(|inputs| {
//!         Some(json!({
//!             "statusCode": inputs.status_code,
//!             "error": { "message": inputs.message },
//!         }))
//!     });
//!
//!     let mut errors = ExceptionLayer::new();
//!     install(&mut errors, config);
//!
//!     let app = Router::new().route("/users/{id}", get(get_user)).layer(errors);
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod exception;
pub mod kit;
pub mod reply;
pub mod request;

// Re-export core types
pub use config::FormatterConfig;
pub use error::{KitError, ReplyError, Result, Thrown};
pub use exception::{ExceptionFilter, ExceptionLayer, KitExceptionFilter, install};
pub use kit::{GeneralError, HttpError, SharedStructured, StructuredError};

pub use async_trait::async_trait;
pub use axum;

/// Prelude module for convenient imports
///
/// ```
/// use http_error_kit_axum::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::FormatterConfig;
    pub use crate::error::{ReplyError, Thrown};
    pub use crate::exception::{
        ErrorHandlerHost, ExceptionFilter, ExceptionLayer, KitExceptionFilter, install,
    };
    pub use crate::kit::{
        ErrorInputs, GeneralError, HttpError, SharedStructured, StructuredError, ThrownError,
    };
    pub use crate::reply::{Reply, ReplyBody};
    pub use crate::request::{RequestContext, RequestLog};
    pub use async_trait::async_trait;
}
