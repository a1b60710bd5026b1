//! Default value providers for attributes
//!
//! Defaults are applied by [`crate::schema::Schema::apply_defaults`] to every
//! attribute that is absent or null in the configuration.
//!
//! ```no_run
//! use tfplug::schema::{AttributeBuilder, AttributeType};
//! use tfplug::defaults::StaticDefault;
//!
//! let adom = AttributeBuilder::new("adom", AttributeType::String)
//!     .optional()
//!     .default(StaticDefault::string("root"))
//!     .build();
//! ```

use crate::schema::{Default, DefaultRequest, DefaultResponse};
use crate::types::{Dynamic, DynamicValue};

/// StaticDefault provides a static default value
pub struct StaticDefault {
    value: Dynamic,
}

impl StaticDefault {
    pub fn create(value: Dynamic) -> Box<dyn Default> {
        Box::new(Self { value })
    }

    pub fn string(value: &str) -> Box<dyn Default> {
        Self::create(Dynamic::String(value.to_string()))
    }

    pub fn bool(value: bool) -> Box<dyn Default> {
        Self::create(Dynamic::Bool(value))
    }
}

impl Default for StaticDefault {
    fn description(&self) -> String {
        format!("static default value: {:?}", self.value)
    }

    fn default_value(&self, _request: DefaultRequest) -> DefaultResponse {
        DefaultResponse {
            value: DynamicValue::new(self.value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributePath;

    #[test]
    fn static_string_default() {
        let default = StaticDefault::string("Created by Terraform Provider for FortiOS");
        let response = default.default_value(DefaultRequest {
            path: AttributePath::new("comment"),
        });

        assert_eq!(
            response.value.value,
            Dynamic::String("Created by Terraform Provider for FortiOS".to_string())
        );
        assert!(default.description().contains("static default"));
    }

    #[test]
    fn static_bool_default() {
        let default = StaticDefault::bool(false);
        let response = default.default_value(DefaultRequest {
            path: AttributePath::new("insecure"),
        });

        assert_eq!(response.value.value, Dynamic::Bool(false));
    }
}
