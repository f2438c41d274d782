use super::{ErrorInputs, StructuredError};
use serde_json::{Value, json};

/// General-purpose structured error
///
/// Same capability as [`HttpError`](super::HttpError) but renders a plain
/// `{"statusCode", "message"}` body.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct GeneralError {
    status_code: u16,
    message: String,
    details: Option<Value>,
    expose_inputs: bool,
}

impl GeneralError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            details: None,
            expose_inputs: true,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn without_inputs(mut self) -> Self {
        self.expose_inputs = false;
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl StructuredError for GeneralError {
    fn status_code(&self) -> u16 {
        self.status_code
    }

    fn inputs(&self) -> Option<ErrorInputs> {
        if !self.expose_inputs {
            return None;
        }
        Some(ErrorInputs {
            status_code: self.status_code,
            message: self.message.clone(),
            details: self.details.clone(),
        })
    }

    fn to_json(&self) -> Value {
        match &self.details {
            Some(details) => json!({
                "statusCode": self.status_code,
                "message": self.message,
                "details": details,
            }),
            None => json!({
                "statusCode": self.status_code,
                "message": self.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_mirror_construction() {
        let error = GeneralError::new(422, "Invalid").with_details(json!(["name"]));
        let inputs = error.inputs().unwrap();
        assert_eq!(inputs.status_code, 422);
        assert_eq!(inputs.message, "Invalid");
        assert_eq!(inputs.details, Some(json!(["name"])));
    }
}
