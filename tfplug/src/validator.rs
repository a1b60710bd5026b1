//! Built-in attribute validators
//!
//! Validators run from [`crate::schema::Schema::validate_config`] against the
//! configured value of a single attribute. Null and unknown values never reach
//! them.

use crate::schema::{Validator, ValidatorRequest, ValidatorResponse};
use crate::types::{Diagnostic, Dynamic};

/// Restricts a string attribute to a closed set of values
pub struct StringInSlice {
    values: Vec<String>,
}

impl StringInSlice {
    pub fn create(values: &[&str]) -> Box<dyn Validator> {
        Box::new(Self {
            values: values.iter().map(|v| v.to_string()).collect(),
        })
    }

    pub fn from_values(values: Vec<String>) -> Box<dyn Validator> {
        Box::new(Self { values })
    }
}

impl Validator for StringInSlice {
    fn description(&self) -> String {
        format!("value must be one of {:?}", self.values)
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = Vec::new();

        if let Dynamic::String(value) = &request.config_value.value {
            if !self.values.iter().any(|allowed| allowed == value) {
                diagnostics.push(
                    Diagnostic::error(
                        "Invalid attribute value",
                        format!(
                            "expected {} to be one of {:?}, got {}",
                            request.path, self.values, value
                        ),
                    )
                    .with_attribute(request.path),
                );
            }
        }

        ValidatorResponse { diagnostics }
    }
}

/// Rejects lists containing null entries
pub struct NoNullElements;

impl NoNullElements {
    pub fn create() -> Box<dyn Validator> {
        Box::new(Self)
    }
}

impl Validator for NoNullElements {
    fn description(&self) -> String {
        "list elements must not be null".to_string()
    }

    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse {
        let mut diagnostics = Vec::new();

        if let Dynamic::List(items) = &request.config_value.value {
            if let Some(idx) = items.iter().position(Dynamic::is_null) {
                diagnostics.push(
                    Diagnostic::error("Invalid list element", "null value")
                        .with_attribute(request.path.index(idx as i64)),
                );
            }
        }

        ValidatorResponse { diagnostics }
    }
}
