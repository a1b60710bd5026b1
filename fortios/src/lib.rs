pub mod api;
pub mod provider_data;
pub mod resources;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tfplug::context::Context;
use tfplug::provider::{
    ConfigureProviderRequest, ConfigureProviderResponse, Provider, ProviderMetadataRequest,
    ProviderMetadataResponse, ProviderSchemaRequest, ProviderSchemaResponse, ResourceFactory,
    ValidateProviderConfigRequest, ValidateProviderConfigResponse,
};
use tfplug::resource::ResourceWithConfigure;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::{AttributePath, Diagnostic, DynamicValue};

use crate::api::{Client, ManagerClient, RetryConfig};
use crate::provider_data::FortiosProviderData;
use crate::resources::firewall::FirewallObjectVip;
use crate::resources::manager::{
    FmgDevicemanagerScript, FmgFirewallObjectAddress, FmgFirewallObjectIppool, FmgSystemDns,
    FmgSystemGlobal,
};
use crate::resources::system::{NetworkingInterfacePort, SystemSettingGlobal, SystemSettingNtp};
use crate::resources::{ManagedResource, ResourceKind};

/// Connection settings of one device family
#[derive(Debug, Clone, PartialEq)]
struct Connection {
    hostname: String,
    token: String,
    insecure: bool,
}

pub struct FortiosProvider {
    provider_data: Option<Arc<FortiosProviderData>>,
}

impl Default for FortiosProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FortiosProvider {
    pub fn new() -> Self {
        Self {
            provider_data: None,
        }
    }

    pub fn provider_data(&self) -> Option<&Arc<FortiosProviderData>> {
        self.provider_data.as_ref()
    }

    fn schema_static() -> Schema {
        let text = |name: &str, description: &str| {
            AttributeBuilder::new(name, AttributeType::String)
                .optional()
                .description(description)
        };
        let flag = |name: &str, description: &str| {
            AttributeBuilder::new(name, AttributeType::Bool)
                .optional()
                .description(description)
                .build()
        };

        SchemaBuilder::new()
            .version(0)
            .description("FortiOS and FortiManager")
            .attribute(text("hostname", "FortiOS address. Falls back to FORTIOS_ACCESS_HOSTNAME.").build())
            .attribute(
                text("token", "FortiOS REST API token. Falls back to FORTIOS_ACCESS_TOKEN.")
                    .sensitive()
                    .build(),
            )
            .attribute(flag("insecure", "Skip TLS verification for FortiOS"))
            .attribute(text("vdom", "VDOM to operate in. Falls back to FORTIOS_VDOM.").build())
            .attribute(text("fmg_hostname", "FortiManager address. Falls back to FORTIOS_FMG_HOSTNAME.").build())
            .attribute(
                text("fmg_token", "FortiManager API key. Falls back to FORTIOS_FMG_TOKEN.")
                    .sensitive()
                    .build(),
            )
            .attribute(flag("fmg_insecure", "Skip TLS verification for FortiManager"))
            .build()
    }
}

fn setting(config: &DynamicValue, name: &str, env: &str) -> Option<String> {
    config
        .get_optional_string(&AttributePath::new(name))
        .ok()
        .flatten()
        .or_else(|| std::env::var(env).ok())
        .filter(|value| !value.is_empty())
}

fn flag(config: &DynamicValue, name: &str, env: &str) -> bool {
    config
        .get_bool(&AttributePath::new(name))
        .ok()
        .or_else(|| std::env::var(env).ok().and_then(|v| v.parse::<bool>().ok()))
        .unwrap_or(false)
}

/// A hostname without its token is an error. Neither means the family is unused.
fn connection(
    config: &DynamicValue,
    device: &str,
    names: [(&str, &str); 3],
) -> Result<Option<Connection>, Diagnostic> {
    let [(host_attr, host_env), (token_attr, token_env), (insecure_attr, insecure_env)] = names;

    match (
        setting(config, host_attr, host_env),
        setting(config, token_attr, token_env),
    ) {
        (Some(hostname), Some(token)) => Ok(Some(Connection {
            hostname,
            token,
            insecure: flag(config, insecure_attr, insecure_env),
        })),
        (Some(_), None) => Err(Diagnostic::error(
            format!("{} token is required", device),
            format!(
                "{} is set but {} is not (set in provider config or {} env var)",
                host_attr, token_attr, token_env
            ),
        )
        .with_attribute(AttributePath::new(token_attr))),
        (None, Some(_)) => Err(Diagnostic::error(
            format!("{} hostname is required", device),
            format!(
                "{} is set but {} is not (set in provider config or {} env var)",
                token_attr, host_attr, host_env
            ),
        )
        .with_attribute(AttributePath::new(host_attr))),
        (None, None) => Ok(None),
    }
}

fn factory<K: ResourceKind>() -> (String, ResourceFactory) {
    (
        K::TYPE_NAME.to_string(),
        Box::new(|| Box::new(ManagedResource::<K>::new()) as Box<dyn ResourceWithConfigure>),
    )
}

#[async_trait]
impl Provider for FortiosProvider {
    fn type_name(&self) -> &str {
        "fortios"
    }

    async fn metadata(
        &self,
        _ctx: Context,
        _request: ProviderMetadataRequest,
    ) -> ProviderMetadataResponse {
        ProviderMetadataResponse {
            type_name: "fortios".to_string(),
        }
    }

    async fn schema(&self, _ctx: Context, _request: ProviderSchemaRequest) -> ProviderSchemaResponse {
        ProviderSchemaResponse {
            schema: Self::schema_static(),
            diagnostics: vec![],
        }
    }

    async fn validate(
        &self,
        _ctx: Context,
        request: ValidateProviderConfigRequest,
    ) -> ValidateProviderConfigResponse {
        ValidateProviderConfigResponse {
            diagnostics: Self::schema_static().validate_config(&request.config),
        }
    }

    async fn configure(
        &mut self,
        _ctx: Context,
        request: ConfigureProviderRequest,
    ) -> ConfigureProviderResponse {
        let config = &request.config;
        let mut diagnostics = vec![];

        let fortios = connection(
            config,
            "FortiOS",
            [
                ("hostname", "FORTIOS_ACCESS_HOSTNAME"),
                ("token", "FORTIOS_ACCESS_TOKEN"),
                ("insecure", "FORTIOS_INSECURE"),
            ],
        )
        .map_err(|d| diagnostics.push(d))
        .ok()
        .flatten();
        let fortimanager = connection(
            config,
            "FortiManager",
            [
                ("fmg_hostname", "FORTIOS_FMG_HOSTNAME"),
                ("fmg_token", "FORTIOS_FMG_TOKEN"),
                ("fmg_insecure", "FORTIOS_FMG_INSECURE"),
            ],
        )
        .map_err(|d| diagnostics.push(d))
        .ok()
        .flatten();

        if diagnostics.is_empty() && fortios.is_none() && fortimanager.is_none() {
            diagnostics.push(Diagnostic::error(
                "hostname is required",
                "Configure FortiOS (hostname/token or FORTIOS_ACCESS_HOSTNAME/FORTIOS_ACCESS_TOKEN) \
                 or FortiManager (fmg_hostname/fmg_token or FORTIOS_FMG_HOSTNAME/FORTIOS_FMG_TOKEN)",
            ));
        }

        let vdom = setting(config, "vdom", "FORTIOS_VDOM");
        let fortios_client = fortios.and_then(|conn| {
            Client::with_config(
                &conn.hostname,
                &conn.token,
                conn.insecure,
                vdom,
                RetryConfig::default(),
            )
            .map_err(|e| {
                diagnostics.push(Diagnostic::error(
                    "Failed to create FortiOS client",
                    e.to_string(),
                ))
            })
            .ok()
        });
        let manager_client = fortimanager.and_then(|conn| {
            ManagerClient::new(&conn.hostname, &conn.token, conn.insecure)
                .map_err(|e| {
                    diagnostics.push(Diagnostic::error(
                        "Failed to create FortiManager client",
                        e.to_string(),
                    ))
                })
                .ok()
        });

        if !diagnostics.is_empty() {
            return ConfigureProviderResponse {
                diagnostics,
                provider_data: None,
            };
        }

        tracing::info!(
            fortios = fortios_client.as_ref().map(|c| c.base_url()),
            fortimanager = manager_client.as_ref().map(|c| c.endpoint()),
            "provider configured"
        );

        let data = Arc::new(FortiosProviderData::new(fortios_client, manager_client));
        self.provider_data = Some(data.clone());

        ConfigureProviderResponse {
            diagnostics,
            provider_data: Some(data),
        }
    }

    fn resources(&self) -> HashMap<String, ResourceFactory> {
        HashMap::from([
            factory::<FirewallObjectVip>(),
            factory::<NetworkingInterfacePort>(),
            factory::<SystemSettingGlobal>(),
            factory::<SystemSettingNtp>(),
            factory::<FmgFirewallObjectAddress>(),
            factory::<FmgFirewallObjectIppool>(),
            factory::<FmgDevicemanagerScript>(),
            factory::<FmgSystemDns>(),
            factory::<FmgSystemGlobal>(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;
    use tfplug::resource::Resource;

    const ENV_VARS: [&str; 7] = [
        "FORTIOS_ACCESS_HOSTNAME",
        "FORTIOS_ACCESS_TOKEN",
        "FORTIOS_INSECURE",
        "FORTIOS_VDOM",
        "FORTIOS_FMG_HOSTNAME",
        "FORTIOS_FMG_TOKEN",
        "FORTIOS_FMG_INSECURE",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            std::env::remove_var(var);
        }
    }

    async fn configure(provider: &mut FortiosProvider, config: serde_json::Value) -> ConfigureProviderResponse {
        provider
            .configure(
                Context::new(),
                ConfigureProviderRequest {
                    terraform_version: "1.9.0".to_string(),
                    config: DynamicValue::from_json(config),
                },
            )
            .await
    }

    #[tokio::test]
    #[serial]
    async fn configures_fortios_from_env_vars() {
        clear_env();
        std::env::set_var("FORTIOS_ACCESS_HOSTNAME", "192.168.1.99");
        std::env::set_var("FORTIOS_ACCESS_TOKEN", "secret");
        std::env::set_var("FORTIOS_INSECURE", "true");

        let mut provider = FortiosProvider::new();
        let response = configure(&mut provider, json!({})).await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert!(response.provider_data.is_some());
        let data = provider.provider_data().unwrap();
        assert_eq!(data.fortios.as_ref().unwrap().base_url(), "https://192.168.1.99");
        assert!(data.fortimanager.is_none());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn block_values_win_over_env_vars() {
        clear_env();
        std::env::set_var("FORTIOS_FMG_HOSTNAME", "ignored.example");
        std::env::set_var("FORTIOS_FMG_TOKEN", "env-key");

        let mut provider = FortiosProvider::new();
        let response = configure(
            &mut provider,
            json!({"fmg_hostname": "fmg.example:8443", "fmg_insecure": true}),
        )
        .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let data = provider.provider_data().unwrap();
        assert_eq!(
            data.fortimanager.as_ref().unwrap().endpoint(),
            "https://fmg.example:8443/jsonrpc"
        );
        assert!(data.fortios.is_none());

        clear_env();
    }

    #[tokio::test]
    #[serial]
    async fn requires_one_device_family() {
        clear_env();

        let mut provider = FortiosProvider::new();
        let response = configure(&mut provider, json!({})).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].summary.contains("hostname is required"));
        assert!(response.provider_data.is_none());
    }

    #[tokio::test]
    #[serial]
    async fn hostname_without_token_is_rejected() {
        clear_env();

        let mut provider = FortiosProvider::new();
        let response = configure(&mut provider, json!({"hostname": "fw.example"})).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].summary, "FortiOS token is required");
        assert_eq!(
            response.diagnostics[0].attribute,
            Some(AttributePath::new("token"))
        );
        assert!(provider.provider_data().is_none());
    }

    #[test]
    fn registers_every_resource_type() {
        let provider = FortiosProvider::new();
        let resources = provider.resources();

        let mut names: Vec<&str> = resources.keys().map(String::as_str).collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "fortios_firewall_object_vip",
                "fortios_fmg_devicemanager_script",
                "fortios_fmg_firewall_object_address",
                "fortios_fmg_firewall_object_ippool",
                "fortios_fmg_system_dns",
                "fortios_fmg_system_global",
                "fortios_networking_interface_port",
                "fortios_system_setting_global",
                "fortios_system_setting_ntp",
            ]
        );

        for (name, factory) in &resources {
            assert_eq!(factory().type_name(), name);
        }
    }
}
