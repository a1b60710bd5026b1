//! tfplug - Terraform Plugin Framework for Rust
//!
//! Provider, resource and schema abstractions used to build Terraform
//! providers in Rust. Values cross the framework boundary as [`DynamicValue`]s
//! and failures are reported as [`types::Diagnostic`]s.

// Core modules
pub mod context;
pub mod error;
pub mod schema;
pub mod types;

// Provider API modules
pub mod provider;
pub mod resource;

// Helper modules
pub mod defaults;
pub mod import;
pub mod validator;

// Re-exports for convenience
pub use context::Context;
pub use error::{Result, TfplugError};
pub use import::import_state_passthrough_id;
pub use provider::{Provider, ProviderMetadataRequest, ProviderMetadataResponse};
pub use resource::{Resource, ResourceWithConfigure, ResourceWithImportState};
pub use schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
pub use types::{Config, Diagnostic, Dynamic, DynamicValue, State};
