//! Drives a `ManagedResource` the way the framework does

use serde_json::Value;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::resource::{
    ConfigureResourceRequest, CreateResourceRequest, CreateResourceResponse,
    DeleteResourceRequest, DeleteResourceResponse, ReadResourceRequest, ReadResourceResponse,
    Resource, ResourceWithConfigure, UpdateResourceRequest, UpdateResourceResponse,
};
use tfplug::types::{AttributePath, DynamicValue};

use super::{ManagedResource, ResourceKind};
use crate::api::test_helpers::{create_test_client, create_test_manager};
use crate::provider_data::FortiosProviderData;

pub async fn fortios_resource<K: ResourceKind>(url: &str) -> ManagedResource<K> {
    configured(FortiosProviderData::new(Some(create_test_client(url)), None)).await
}

pub async fn manager_resource<K: ResourceKind>(url: &str) -> ManagedResource<K> {
    configured(FortiosProviderData::new(None, Some(create_test_manager(url)))).await
}

pub async fn configured<K: ResourceKind>(data: FortiosProviderData) -> ManagedResource<K> {
    let mut resource = ManagedResource::<K>::new();
    let response = resource
        .configure(
            Context::new(),
            ConfigureResourceRequest {
                provider_data: Some(Arc::new(data)),
            },
        )
        .await;
    assert!(response.diagnostics.is_empty());
    resource
}

pub fn value(json: Value) -> DynamicValue {
    DynamicValue::from_json(json)
}

pub fn string(state: &DynamicValue, name: &str) -> String {
    state.get_string(&AttributePath::new(name)).unwrap()
}

pub fn is_unset(state: &DynamicValue, name: &str) -> bool {
    state.is_unset(&AttributePath::new(name))
}

pub async fn create<K: ResourceKind>(resource: &ManagedResource<K>, config: Value) -> CreateResourceResponse {
    let config = value(config);
    resource
        .create(
            Context::new(),
            CreateResourceRequest {
                type_name: K::TYPE_NAME.to_string(),
                planned_state: config.clone(),
                config,
            },
        )
        .await
}

pub async fn read<K: ResourceKind>(resource: &ManagedResource<K>, state: DynamicValue) -> ReadResourceResponse {
    resource
        .read(
            Context::new(),
            ReadResourceRequest {
                type_name: K::TYPE_NAME.to_string(),
                current_state: state,
            },
        )
        .await
}

pub async fn update<K: ResourceKind>(
    resource: &ManagedResource<K>,
    prior_state: DynamicValue,
    config: Value,
) -> UpdateResourceResponse {
    let config = value(config);
    resource
        .update(
            Context::new(),
            UpdateResourceRequest {
                type_name: K::TYPE_NAME.to_string(),
                prior_state,
                planned_state: config.clone(),
                config,
            },
        )
        .await
}

pub async fn delete<K: ResourceKind>(resource: &ManagedResource<K>, prior_state: DynamicValue) -> DeleteResourceResponse {
    resource
        .delete(
            Context::new(),
            DeleteResourceRequest {
                type_name: K::TYPE_NAME.to_string(),
                prior_state,
            },
        )
        .await
}
