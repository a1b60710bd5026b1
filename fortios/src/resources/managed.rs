//! The Terraform facing side of a resource kind
//!
//! `ManagedResource<K>` is the one `tfplug::Resource` implementation. It
//! applies schema defaults, validates, decodes the configuration into the
//! kind's typed config and drives a `Reconciler`. Errors become diagnostics.

use async_trait::async_trait;
use std::marker::PhantomData;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::import::import_state_passthrough_id;
use tfplug::resource::{
    ConfigureResourceRequest, ConfigureResourceResponse, CreateResourceRequest,
    CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, ResourceMetadataRequest, ResourceMetadataResponse,
    ResourceSchemaRequest, ResourceSchemaResponse, ResourceWithConfigure,
    ResourceWithImportState, UpdateResourceRequest, UpdateResourceResponse,
    ValidateResourceConfigRequest, ValidateResourceConfigResponse,
};
use tfplug::schema::Schema;
use tfplug::types::{has_errors, AttributePath, Diagnostic, Dynamic, DynamicValue};
use tracing::Instrument;

use super::enums::StringEnum;
use super::reconcile::{Reconciler, RemoteResource, ResourceError, Tracked};
use crate::provider_data::FortiosProviderData;

/// A resource type served by the provider
pub trait ResourceKind: RemoteResource + Sized + 'static {
    const TYPE_NAME: &'static str;

    fn schema() -> Schema;

    /// Decodes a configuration or state. Absent attributes read as empty.
    fn from_config(config: &DynamicValue) -> Result<Self::Config, ResourceError>;

    /// Checks that only apply to a configuration about to be written
    fn check(_config: &Self::Config) -> Result<(), ResourceError> {
        Ok(())
    }

    fn to_state(config: &Self::Config, state: &mut DynamicValue) -> tfplug::Result<()>;

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError>;
}

pub struct ManagedResource<K> {
    provider_data: Option<Arc<FortiosProviderData>>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: ResourceKind> Default for ManagedResource<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ResourceKind> ManagedResource<K> {
    pub fn new() -> Self {
        Self {
            provider_data: None,
            _kind: PhantomData,
        }
    }

    fn reconciler(&self) -> Result<Reconciler<K>, Vec<Diagnostic>> {
        let data = self.provider_data.as_ref().ok_or_else(|| {
            vec![Diagnostic::error(
                "Provider not configured",
                "Provider data was not properly configured",
            )]
        })?;
        K::from_provider_data(data)
            .map(Reconciler::new)
            .map_err(|e| vec![error_diagnostic(&e)])
    }

    /// Defaults, schema validation and decoding of a configuration to be written
    fn decode_planned(config: &DynamicValue) -> Result<(DynamicValue, K::Config), Vec<Diagnostic>> {
        let schema = K::schema();
        let config = schema.apply_defaults(config);
        let diagnostics = schema.validate_config(&config);
        if has_errors(&diagnostics) {
            return Err(diagnostics);
        }

        let typed = K::from_config(&config).map_err(|e| vec![error_diagnostic(&e)])?;
        K::check(&typed).map_err(|e| vec![error_diagnostic(&e)])?;
        Ok((config, typed))
    }

    fn decode_state(state: &DynamicValue) -> Result<(String, K::Config), Vec<Diagnostic>> {
        let id = match state.get_optional_string(&AttributePath::new("id")) {
            Ok(Some(id)) if !id.is_empty() => id,
            _ => {
                return Err(vec![Diagnostic::error(
                    "Missing resource ID",
                    format!("The {} state does not carry an id", K::TYPE_NAME),
                )
                .with_attribute(AttributePath::new("id"))])
            }
        };
        let config = K::from_config(state).map_err(|e| vec![error_diagnostic(&e)])?;
        Ok((id, config))
    }

    /// Writes a tracked object over `base` and sets its id
    fn render(base: &DynamicValue, tracked: &Tracked<K::Config>) -> Result<DynamicValue, Vec<Diagnostic>> {
        let mut state = base.clone();
        K::to_state(&tracked.config, &mut state)
            .and_then(|_| state.set_string(&AttributePath::new("id"), tracked.id.clone()))
            .map_err(|e| {
                vec![Diagnostic::error(
                    "Failed to set state",
                    format!("Could not write {} state: {}", K::TYPE_NAME, e),
                )]
            })?;
        Ok(state)
    }

    fn vanished() -> Vec<Diagnostic> {
        vec![Diagnostic::error(
            format!("{} not found", K::DISPLAY_NAME),
            format!("{} could not be read back after it was written", K::DISPLAY_NAME),
        )]
    }

    async fn create_state(&self, config: &DynamicValue) -> Result<DynamicValue, Vec<Diagnostic>> {
        let (base, planned) = Self::decode_planned(config)?;
        let reconciler = self.reconciler()?;

        match reconciler
            .create(&planned)
            .await
            .map_err(|e| vec![error_diagnostic(&e)])?
        {
            Some(tracked) => Self::render(&base, &tracked),
            None => Err(Self::vanished()),
        }
    }

    async fn read_state(&self, current: &DynamicValue) -> Result<Option<DynamicValue>, Vec<Diagnostic>> {
        let (id, prior) = Self::decode_state(current)?;
        let reconciler = self.reconciler()?;

        match reconciler
            .read(&id, &prior)
            .await
            .map_err(|e| vec![error_diagnostic(&e)])?
        {
            Some(tracked) => Self::render(current, &tracked).map(Some),
            None => Ok(None),
        }
    }

    async fn update_state(
        &self,
        prior_state: &DynamicValue,
        config: &DynamicValue,
    ) -> Result<DynamicValue, Vec<Diagnostic>> {
        let (id, prior) = Self::decode_state(prior_state)?;
        let (base, planned) = Self::decode_planned(config)?;
        let reconciler = self.reconciler()?;

        match reconciler
            .update(&id, &prior, &planned)
            .await
            .map_err(|e| vec![error_diagnostic(&e)])?
        {
            Some(tracked) => Self::render(&base, &tracked),
            None => Err(Self::vanished()),
        }
    }

    async fn delete_state(&self, prior_state: &DynamicValue) -> Result<(), Vec<Diagnostic>> {
        let (id, prior) = Self::decode_state(prior_state)?;
        let reconciler = self.reconciler()?;

        reconciler
            .delete(&id, &prior)
            .await
            .map_err(|e| vec![error_diagnostic(&e)])
    }
}

#[async_trait]
impl<K: ResourceKind> Resource for ManagedResource<K> {
    fn type_name(&self) -> &str {
        K::TYPE_NAME
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ResourceMetadataRequest,
    ) -> ResourceMetadataResponse {
        ResourceMetadataResponse {
            type_name: K::TYPE_NAME.to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ResourceSchemaRequest) -> ResourceSchemaResponse {
        ResourceSchemaResponse {
            schema: K::schema(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateResourceConfigRequest,
    ) -> ValidateResourceConfigResponse {
        let schema = K::schema();
        let config = schema.apply_defaults(&request.config);
        let mut diagnostics = schema.validate_config(&config);

        if !has_errors(&diagnostics) {
            if let Err(e) = K::from_config(&config) {
                diagnostics.push(error_diagnostic(&e));
            }
        }

        ValidateResourceConfigResponse { diagnostics }
    }

    async fn create(&self, ctx: Context, request: CreateResourceRequest) -> CreateResourceResponse {
        let span = ctx.span("create", K::TYPE_NAME);
        match self.create_state(&request.config).instrument(span).await {
            Ok(new_state) => CreateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diagnostics) => CreateResourceResponse {
                new_state: DynamicValue::null(),
                diagnostics,
            },
        }
    }

    async fn read(&self, ctx: Context, request: ReadResourceRequest) -> ReadResourceResponse {
        let span = ctx.span("read", K::TYPE_NAME);
        match self.read_state(&request.current_state).instrument(span).await {
            Ok(new_state) => ReadResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diagnostics) => ReadResourceResponse {
                new_state: Some(request.current_state),
                diagnostics,
            },
        }
    }

    async fn update(&self, ctx: Context, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let span = ctx.span("update", K::TYPE_NAME);
        match self
            .update_state(&request.prior_state, &request.config)
            .instrument(span)
            .await
        {
            Ok(new_state) => UpdateResourceResponse {
                new_state,
                diagnostics: vec![],
            },
            Err(diagnostics) => UpdateResourceResponse {
                new_state: request.prior_state,
                diagnostics,
            },
        }
    }

    async fn delete(&self, ctx: Context, request: DeleteResourceRequest) -> DeleteResourceResponse {
        let span = ctx.span("delete", K::TYPE_NAME);
        DeleteResourceResponse {
            diagnostics: self
                .delete_state(&request.prior_state)
                .instrument(span)
                .await
                .err()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl<K: ResourceKind> ResourceWithConfigure for ManagedResource<K> {
    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureResourceRequest,
    ) -> ConfigureResourceResponse {
        let mut diagnostics = vec![];

        match request.provider_data {
            Some(data) => match data.downcast::<FortiosProviderData>() {
                Ok(provider_data) => self.provider_data = Some(provider_data),
                Err(_) => diagnostics.push(Diagnostic::error(
                    "Invalid provider data",
                    "Failed to extract FortiosProviderData from provider data",
                )),
            },
            None => diagnostics.push(Diagnostic::error(
                "No provider data",
                "No provider data was provided to the resource",
            )),
        }

        ConfigureResourceResponse { diagnostics }
    }
}

#[async_trait]
impl<K: ResourceKind> ResourceWithImportState for ManagedResource<K> {
    async fn import_state(
        &self,
        ctx: Context,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        let mut response = ImportResourceStateResponse {
            imported_resources: vec![],
            diagnostics: vec![],
        };
        import_state_passthrough_id(&ctx, AttributePath::new("id"), &request, &mut response);
        response
    }
}

pub fn error_diagnostic(err: &ResourceError) -> Diagnostic {
    let summary = match err {
        ResourceError::Validation(_) => "Invalid configuration",
        ResourceError::ImmutableField { .. } => "Immutable attribute",
        ResourceError::Remote { .. } => "Remote operation failed",
        ResourceError::NotConfigured { .. } => "Provider not configured",
    };
    let diagnostic = Diagnostic::error(summary, err.to_string());
    match err.attribute() {
        Some(field) => diagnostic.with_attribute(AttributePath::new(field)),
        None => diagnostic,
    }
}

// Decoding helpers. Unset, null and unknown attributes all read as empty.

pub fn string_attr(config: &DynamicValue, name: &str) -> Result<String, ResourceError> {
    let path = AttributePath::new(name);
    if config.is_unset(&path) {
        return Ok(String::new());
    }
    config
        .get_string(&path)
        .map_err(|e| ResourceError::validation(format!("{}: {}", name, e)))
}

/// List of strings. A null entry is rejected with `null value`.
pub fn string_list(config: &DynamicValue, name: &str) -> Result<Vec<String>, ResourceError> {
    let path = AttributePath::new(name);
    if config.is_unset(&path) {
        return Ok(vec![]);
    }
    config
        .get_list(&path)
        .map_err(|e| ResourceError::validation(format!("{}: {}", name, e)))?
        .into_iter()
        .map(|item| match item {
            Dynamic::String(s) => Ok(s),
            Dynamic::Null => Err(ResourceError::validation("null value")),
            other => Err(ResourceError::validation(format!(
                "{}: expected string elements, got {}",
                name,
                other.type_name()
            ))),
        })
        .collect()
}

/// Like [`string_list`], but an unset attribute reads as `None` and an empty list as `Some`
pub fn optional_list(config: &DynamicValue, name: &str) -> Result<Option<Vec<String>>, ResourceError> {
    if config.is_unset(&AttributePath::new(name)) {
        return Ok(None);
    }
    string_list(config, name).map(Some)
}

/// Optional closed set value. Anything outside the set is rejected.
pub fn enum_attr<T: StringEnum>(config: &DynamicValue, name: &str) -> Result<Option<T>, ResourceError> {
    let value = string_attr(config, name)?;
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<T>().map(Some).map_err(|_| {
        ResourceError::validation(format!(
            "expected {} to be one of {:?}, got {}",
            name,
            T::VALUES,
            value
        ))
    })
}

// State writers. Empty values leave attributes that were never set alone.

pub fn put_string(state: &mut DynamicValue, name: &str, value: &str) -> tfplug::Result<()> {
    let path = AttributePath::new(name);
    if value.is_empty() && state.is_unset(&path) {
        return state.set_null(&path);
    }
    state.set_string(&path, value.to_string())
}

/// Optional+computed attributes take whatever the device reports, empty included
pub fn put_computed(state: &mut DynamicValue, name: &str, value: &str) -> tfplug::Result<()> {
    state.set_string(&AttributePath::new(name), value.to_string())
}

pub fn put_list(state: &mut DynamicValue, name: &str, values: &[String]) -> tfplug::Result<()> {
    let path = AttributePath::new(name);
    if values.is_empty() && state.is_unset(&path) {
        return state.set_null(&path);
    }
    state.set_string_list(&path, values)
}

pub fn put_enum<T: StringEnum>(state: &mut DynamicValue, name: &str, value: Option<T>) -> tfplug::Result<()> {
    put_string(state, name, value.map(|v| v.as_str()).unwrap_or_default())
}
