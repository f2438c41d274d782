use crate::config::FormatterConfig;
use crate::error::ReplyError;
use crate::kit::ThrownError;
use crate::reply::Reply;
use crate::request::RequestContext;
use async_trait::async_trait;
use std::sync::Arc;

pub mod http;
pub mod layer;

pub use http::KitExceptionFilter;
pub use layer::{ExceptionLayer, ExceptionMiddleware};

/// The ExceptionFilter trait
///
/// Filters handle errors thrown during request processing and write the
/// response through the reply channel. An `Err` means the filter could not
/// write anything and the host has to answer on its own.
#[async_trait]
pub trait ExceptionFilter: Send + Sync + 'static {
    async fn catch(
        &self,
        error: ThrownError,
        request: &RequestContext,
        reply: &mut dyn Reply,
    ) -> Result<(), ReplyError>;
}

/// A framework instance with a single error-handler slot
pub trait ErrorHandlerHost {
    /// Register the error handler, replacing any previous one
    fn set_error_handler(&mut self, handler: Arc<dyn ExceptionFilter>);
}

/// Register the structured error handler on `host`.
///
/// # Example
/// ```
/// use http_error_kit_axum::{config::FormatterConfig, exception::{install, ExceptionLayer}};
///
/// let mut layer = ExceptionLayer::new();
/// install(&mut layer, FormatterConfig::new());
/// assert!(layer.has_error_handler());
/// ```
pub fn install<H>(host: &mut H, config: FormatterConfig)
where
    H: ErrorHandlerHost + ?Sized,
{
    tracing::debug!(formatter = config.is_configured(), "Installing error handler");
    host.set_error_handler(Arc::new(KitExceptionFilter::new(config)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHost {
        registrations: usize,
        handler: Option<Arc<dyn ExceptionFilter>>,
    }

    impl ErrorHandlerHost for CountingHost {
        fn set_error_handler(&mut self, handler: Arc<dyn ExceptionFilter>) {
            self.registrations += 1;
            self.handler = Some(handler);
        }
    }

    #[test]
    fn test_install_registers_once() {
        let mut host = CountingHost::default();
        install(&mut host, FormatterConfig::new());
        assert_eq!(host.registrations, 1);
        assert!(host.handler.is_some());
    }

    #[test]
    fn test_install_through_trait_object() {
        let mut host = CountingHost::default();
        let dyn_host: &mut dyn ErrorHandlerHost = &mut host;
        install(dyn_host, FormatterConfig::new());
        assert_eq!(host.registrations, 1);
    }
}
