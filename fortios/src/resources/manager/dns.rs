//! `fortios_fmg_system_dns`

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use super::refreshed_text;
use crate::api::manager::system::DnsSetting;
use crate::api::{ApiError, ManagerClient};
use crate::provider_data::FortiosProviderData;
use crate::resources::managed::{put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError};

pub const FMG_DNS_ID: &str = "fortimanager-sys-dns";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnsConfig {
    pub primary: String,
    pub secondary: String,
}

pub struct FmgSystemDns {
    client: Arc<ManagerClient>,
}

#[async_trait]
impl RemoteResource for FmgSystemDns {
    type Config = DnsConfig;
    const DISPLAY_NAME: &'static str = "FortiManager System DNS";

    fn presence(&self, _config: &DnsConfig) -> Presence {
        Presence::Singleton { key: FMG_DNS_ID }
    }

    async fn create(&self, config: &DnsConfig) -> Result<String, ApiError> {
        self.update(FMG_DNS_ID, config).await?;
        Ok(FMG_DNS_ID.to_string())
    }

    async fn read(&self, _id: &str, prior: &DnsConfig) -> Result<Option<DnsConfig>, ApiError> {
        Ok(self.client.system().get_dns().await?.map(|dns| DnsConfig {
            primary: refreshed_text(&prior.primary, dns.primary),
            secondary: refreshed_text(&prior.secondary, dns.secondary),
        }))
    }

    async fn update(&self, _id: &str, config: &DnsConfig) -> Result<(), ApiError> {
        let dns = DnsSetting {
            primary: config.primary.clone(),
            secondary: config.secondary.clone(),
        };
        self.client.system().set_dns(&dns).await
    }

    async fn delete(&self, _id: &str, _config: &DnsConfig) -> Result<(), ApiError> {
        Ok(())
    }
}

impl ResourceKind for FmgSystemDns {
    const TYPE_NAME: &'static str = "fortios_fmg_system_dns";

    fn schema() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("DNS servers FortiManager itself uses")
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("primary", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("secondary", AttributeType::String)
                    .optional()
                    .build(),
            )
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<DnsConfig, ResourceError> {
        Ok(DnsConfig {
            primary: string_attr(config, "primary")?,
            secondary: string_attr(config, "secondary")?,
        })
    }

    fn to_state(config: &DnsConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "primary", &config.primary)?;
        put_string(state, "secondary", &config.secondary)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.manager_client()?,
        })
    }
}
