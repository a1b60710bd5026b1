//! Schema types and builders for tfplug
//!
//! A schema describes the flat attribute set of a provider or resource
//! block. Besides describing attributes to Terraform it is used by the
//! framework to fill defaults and to validate configuration before any
//! remote call is attempted.

use crate::types::{AttributePath, Diagnostic, Dynamic, DynamicValue};

/// AttributeType defines the type system for Terraform attributes
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    /// Always f64
    Number,
    Bool,
    /// Ordered, allows duplicates
    List(Box<AttributeType>),
}

impl AttributeType {
    fn accepts(&self, value: &Dynamic) -> bool {
        match (self, value) {
            (_, Dynamic::Null) | (_, Dynamic::Unknown) => true,
            (AttributeType::String, Dynamic::String(_))
            | (AttributeType::Number, Dynamic::Number(_))
            | (AttributeType::Bool, Dynamic::Bool(_)) => true,
            (AttributeType::List(element), Dynamic::List(items)) => {
                items.iter().all(|item| element.accepts(item))
            }
            _ => false,
        }
    }
}

/// Schema is returned by providers and resources
/// Version is used for state migration
#[derive(Debug)]
pub struct Schema {
    pub version: i64,
    pub block: Block,
}

/// Block represents a configuration block
#[derive(Debug)]
pub struct Block {
    pub attributes: Vec<Attribute>,
    pub description: String,
}

/// Attribute represents a single configuration attribute
pub struct Attribute {
    pub name: String,
    pub r#type: AttributeType,
    pub description: String,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub validators: Vec<Box<dyn Validator>>,
    pub default: Option<Box<dyn Default>>,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name)
            .field("type", &self.r#type)
            .field("required", &self.required)
            .field("optional", &self.optional)
            .field("computed", &self.computed)
            .field("sensitive", &self.sensitive)
            .field("validators", &self.validators.len())
            .field("default", &self.default.is_some())
            .finish()
    }
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.block.attributes.iter().find(|attr| attr.name == name)
    }

    /// Fills every unset attribute that declares a default.
    /// Attributes already present in the configuration are left untouched.
    pub fn apply_defaults(&self, config: &DynamicValue) -> DynamicValue {
        let mut result = if config.is_null() || config.is_unknown() {
            DynamicValue::object()
        } else {
            config.clone()
        };

        for attr in &self.block.attributes {
            let Some(default) = &attr.default else {
                continue;
            };
            let path = AttributePath::new(&attr.name);
            if !result.is_unset(&path) {
                continue;
            }
            let response = default.default_value(DefaultRequest { path: path.clone() });
            if let Err(e) = result.set(&path, response.value.value) {
                tracing::warn!("failed to apply default for {}: {}", attr.name, e);
            }
        }

        result
    }

    /// Checks required presence, value types and attribute validators.
    /// Unknown values are skipped since they are only known after apply.
    pub fn validate_config(&self, config: &DynamicValue) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        for attr in &self.block.attributes {
            let path = AttributePath::new(&attr.name);
            let value = config.get(&path).ok();

            if attr.required && config.is_unset(&path) && !matches!(value, Some(Dynamic::Unknown))
            {
                diagnostics.push(
                    Diagnostic::error(
                        "Missing required argument",
                        format!("The argument \"{}\" is required, but no definition was found.", attr.name),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            let Some(value) = value else {
                continue;
            };
            if matches!(value, Dynamic::Null | Dynamic::Unknown) {
                continue;
            }

            if !attr.r#type.accepts(value) {
                diagnostics.push(
                    Diagnostic::error(
                        "Incorrect attribute value type",
                        format!(
                            "Inappropriate value for attribute \"{}\": {} is not a {:?}.",
                            attr.name,
                            value.type_name(),
                            attr.r#type
                        ),
                    )
                    .with_attribute(path),
                );
                continue;
            }

            for validator in &attr.validators {
                let response = validator.validate(ValidatorRequest {
                    config_value: DynamicValue::new(value.clone()),
                    path: path.clone(),
                });
                diagnostics.extend(response.diagnostics);
            }
        }

        diagnostics
    }
}

/// Validator performs validation on attribute values
/// Implement this for custom validation logic
pub trait Validator: Send + Sync {
    /// Human-readable description
    fn description(&self) -> String;
    /// Perform validation
    fn validate(&self, request: ValidatorRequest) -> ValidatorResponse;
}

/// Request for validators
pub struct ValidatorRequest {
    pub config_value: DynamicValue,
    pub path: AttributePath,
}

/// Response from validators
pub struct ValidatorResponse {
    pub diagnostics: Vec<Diagnostic>,
}

/// Default provides default values for optional attributes
/// Called when attribute is not set in configuration
pub trait Default: Send + Sync {
    /// Human-readable description
    fn description(&self) -> String;
    /// Provide default value
    fn default_value(&self, request: DefaultRequest) -> DefaultResponse;
}

/// Request for default values
pub struct DefaultRequest {
    pub path: AttributePath,
}

/// Response with default value
pub struct DefaultResponse {
    pub value: DynamicValue,
}

/// AttributeBuilder provides fluent API for building attributes
/// ALWAYS use this instead of constructing Attribute directly
pub struct AttributeBuilder {
    attribute: Attribute,
}

impl AttributeBuilder {
    pub fn new(name: &str, type_: AttributeType) -> Self {
        Self {
            attribute: Attribute {
                name: name.to_string(),
                r#type: type_,
                description: String::new(),
                required: false,
                optional: false,
                computed: false,
                sensitive: false,
                validators: Vec::new(),
                default: None,
            },
        }
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.attribute.description = desc.to_string();
        self
    }

    pub fn required(mut self) -> Self {
        self.attribute.required = true;
        self.attribute.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.attribute.optional = true;
        self.attribute.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.attribute.computed = true;
        self
    }

    /// Mark as sensitive (hidden)
    pub fn sensitive(mut self) -> Self {
        self.attribute.sensitive = true;
        self
    }

    pub fn validator(mut self, validator: Box<dyn Validator>) -> Self {
        self.attribute.validators.push(validator);
        self
    }

    pub fn default(mut self, default: Box<dyn Default>) -> Self {
        self.attribute.default = Some(default);
        self
    }

    pub fn build(self) -> Attribute {
        self.attribute
    }
}

/// SchemaBuilder provides fluent API for building schemas
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self {
            schema: Schema {
                version: 0,
                block: Block {
                    attributes: Vec::new(),
                    description: String::new(),
                },
            },
        }
    }

    pub fn version(mut self, version: i64) -> Self {
        self.schema.version = version;
        self
    }

    pub fn attribute(mut self, attr: Attribute) -> Self {
        self.schema.block.attributes.push(attr);
        self
    }

    pub fn description(mut self, desc: &str) -> Self {
        self.schema.block.description = desc.to_string();
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

impl std::default::Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}
