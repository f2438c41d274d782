use crate::error::BoxError;
use crate::kit::ErrorInputs;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// A function shaping an error's inputs into a custom response payload.
///
/// A payload object carrying a numeric `statusCode` overrides the status of
/// the error it was produced from.
pub type Formatter = Arc<dyn Fn(&ErrorInputs) -> Result<Option<Value>, BoxError> + Send + Sync>;

/// Formatter configuration injected into the error handler at install time
///
/// Unset by default. The configuration is cloned into the handler and only
/// read while handling requests.
///
/// # Example
/// ```
/// use http_error_kit_axum::config::FormatterConfig;
/// use serde_json::json;
///
/// let config = FormatterConfig::new().configure_formatter(|inputs| {
///     Some(json!({ "statusCode": inputs.status_code, "reason": inputs.message }))
/// });
/// assert!(config.is_configured());
/// ```
#[derive(Clone, Default)]
pub struct FormatterConfig {
    formatter: Option<Formatter>,
}

impl FormatterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the formatter, replacing any previous one
    pub fn configure_formatter<F>(self, formatter: F) -> Self
    where
        F: Fn(&ErrorInputs) -> Option<Value> + Send + Sync + 'static,
    {
        self.try_configure_formatter(move |inputs| Ok(formatter(inputs)))
    }

    /// Set a formatter that can fail. Its error is answered like any other
    /// failure to write the error response.
    pub fn try_configure_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(&ErrorInputs) -> Result<Option<Value>, BoxError> + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn is_configured(&self) -> bool {
        self.formatter.is_some()
    }

    /// Run the formatter, if any, over the given inputs.
    ///
    /// A panicking formatter is reported as an error.
    pub fn format(&self, inputs: &ErrorInputs) -> Result<Option<Value>, BoxError> {
        let Some(formatter) = &self.formatter else {
            return Ok(None);
        };
        catch_unwind(AssertUnwindSafe(|| formatter(inputs)))
            .unwrap_or_else(|payload| Err(panic_message(payload).into()))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        format!("formatter panicked: {}", s)
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        format!("formatter panicked: {}", s)
    } else {
        "formatter panicked".to_string()
    }
}

impl fmt::Debug for FormatterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatterConfig")
            .field("configured", &self.is_configured())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn inputs() -> ErrorInputs {
        ErrorInputs {
            status_code: 400,
            message: "Bad Request".to_string(),
            details: None,
        }
    }

    #[test]
    fn test_unset_formats_nothing() {
        let config = FormatterConfig::new();
        assert!(!config.is_configured());
        assert!(config.format(&inputs()).unwrap().is_none());
    }

    #[test]
    fn test_configured_formatter_runs() {
        let config = FormatterConfig::new()
            .configure_formatter(|inputs| Some(json!({ "code": inputs.status_code })));
        assert_eq!(config.format(&inputs()).unwrap(), Some(json!({ "code": 400 })));
    }

    #[test]
    fn test_reconfigure_replaces_formatter() {
        let config = FormatterConfig::new()
            .configure_formatter(|_| Some(json!("first")))
            .configure_formatter(|_| None);
        assert!(config.is_configured());
        assert!(config.format(&inputs()).unwrap().is_none());
    }

    #[test]
    fn test_fallible_formatter_error() {
        let config = FormatterConfig::new().try_configure_formatter(|_| Err("no template".into()));
        let error = config.format(&inputs()).unwrap_err();
        assert_eq!(error.to_string(), "no template");
    }

    #[test]
    fn test_panicking_formatter_is_contained() {
        let config = FormatterConfig::new().configure_formatter(|_| panic!("formatter blew up"));
        let error = config.format(&inputs()).unwrap_err();
        assert_eq!(error.to_string(), "formatter panicked: formatter blew up");
    }
}
