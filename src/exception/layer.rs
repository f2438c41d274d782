use crate::config::FormatterConfig;
use crate::error::{BoxError, KitError, ThrownExtension};
use crate::exception::{ErrorHandlerHost, ExceptionFilter, install};
use crate::kit::ThrownError;
use crate::reply::{Reply, ReplyBody, ResponseReply};
use crate::request::RequestContext;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer routing thrown errors through the installed error handler
///
/// The layer is the framework instance [`install`] registers on. Without a
/// handler, thrown errors are answered with the default 500 error body.
///
/// # Example
/// ```
/// use axum::{Router, routing::get};
/// use http_error_kit_axum::{Thrown, config::FormatterConfig, exception::ExceptionLayer, kit::HttpError};
///
/// async fn handler() -> Result<&'static str, Thrown> {
///     Err(HttpError::bad_request("Bad Request").into())
/// }
///
/// let app: Router = Router::new()
///     .route("/", get(handler))
///     .layer(ExceptionLayer::with_config(FormatterConfig::new()));
/// ```
#[derive(Clone, Default)]
pub struct ExceptionLayer {
    handler: Option<Arc<dyn ExceptionFilter>>,
}

impl ExceptionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A layer with the structured error handler already installed
    pub fn with_config(config: FormatterConfig) -> Self {
        let mut layer = Self::new();
        install(&mut layer, config);
        layer
    }

    pub fn has_error_handler(&self) -> bool {
        self.handler.is_some()
    }
}

impl ErrorHandlerHost for ExceptionLayer {
    fn set_error_handler(&mut self, handler: Arc<dyn ExceptionFilter>) {
        self.handler = Some(handler);
    }
}

impl<S> Layer<S> for ExceptionLayer {
    type Service = ExceptionMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ExceptionMiddleware {
            inner,
            handler: self.handler.clone(),
            ready_error: None,
        }
    }
}

#[derive(Clone)]
pub struct ExceptionMiddleware<S> {
    inner: S,
    handler: Option<Arc<dyn ExceptionFilter>>,
    // inner readiness failure, answered on the next call
    ready_error: Option<ThrownError>,
}

impl<S> Service<Request<Body>> for ExceptionMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Into<BoxError> + Send,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        if self.ready_error.is_some() {
            return Poll::Ready(Ok(()));
        }
        match self.inner.poll_ready(cx) {
            Poll::Ready(Err(e)) => {
                self.ready_error = Some(share(e.into()));
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Ok(())) => Poll::Ready(Ok(())),
            Poll::Pending => Poll::Pending,
        }
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let context = RequestContext::from_request(&request);
        let handler = self.handler.clone();

        if let Some(error) = self.ready_error.take() {
            return Box::pin(async move { Ok(render(handler, error, &context).await) });
        }

        // Take the service that was driven to readiness, leave a fresh clone
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let error = match inner.call(request).await {
                Ok(mut response) => match response.extensions_mut().remove::<ThrownExtension>() {
                    Some(ThrownExtension(error)) => error,
                    None => return Ok(response),
                },
                Err(e) => share(e.into()),
            };
            Ok(render(handler, error, &context).await)
        })
    }
}

fn share(error: BoxError) -> ThrownError {
    Arc::from(error)
}

/// Run the handler over a fresh reply and turn the outcome into a response
async fn render(
    handler: Option<Arc<dyn ExceptionFilter>>,
    error: ThrownError,
    request: &RequestContext,
) -> Response {
    tracing::debug!(
        method = %request.method(),
        uri = %request.uri(),
        error = %error,
        "Handling thrown error"
    );

    let mut reply = ResponseReply::new();
    let outcome = match handler {
        Some(handler) => handler.catch(error, request, &mut reply).await,
        None => reply.send(ReplyBody::Error(error)),
    };

    match outcome {
        Ok(()) => reply
            .into_response()
            .unwrap_or_else(|| KitError::NothingSent.into_response()),
        Err(e) => {
            tracing::error!(
                method = %request.method(),
                uri = %request.uri(),
                error = %e,
                "Error handler fallback failed"
            );
            KitError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReplyError;
    use crate::kit::HttpError;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use tower::ServiceExt;
    use tower::service_fn;

    struct SilentFilter;

    #[async_trait]
    impl ExceptionFilter for SilentFilter {
        async fn catch(
            &self,
            _error: ThrownError,
            _request: &RequestContext,
            _reply: &mut dyn Reply,
        ) -> Result<(), ReplyError> {
            Ok(())
        }
    }

    fn request() -> Request<Body> {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_inner_service_error_is_handled() {
        let inner = service_fn(|_req: Request<Body>| async {
            Err::<Response, BoxError>(Box::new(HttpError::not_found("User not found")))
        });
        let service = ExceptionLayer::with_config(FormatterConfig::new()).layer(inner);

        let response = service.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_without_handler_uses_default_status() {
        let inner = service_fn(|_req: Request<Body>| async {
            Err::<Response, BoxError>(Box::new(HttpError::not_found("User not found")))
        });
        let service = ExceptionLayer::new().layer(inner);

        let response = service.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_filter_writing_nothing_yields_500() {
        let inner = service_fn(|_req: Request<Body>| async {
            Err::<Response, BoxError>("boom".into())
        });
        let mut layer = ExceptionLayer::new();
        layer.set_error_handler(Arc::new(SilentFilter));
        let service = layer.layer(inner);

        let response = service.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_successful_response_passes_through() {
        let inner = service_fn(|_req: Request<Body>| async {
            Ok::<Response, BoxError>((StatusCode::CREATED, "created").into_response())
        });
        let service = ExceptionLayer::with_config(FormatterConfig::new()).layer(inner);

        let response = service.oneshot(request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
