//! `fortios_system_setting_global`

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use crate::api::system::global::SystemGlobal;
use crate::api::{ApiError, Client};
use crate::provider_data::FortiosProviderData;
use crate::resources::managed::{put_computed, put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError};

pub const SYSTEM_GLOBAL_ID: &str = "fortios-system-setting-global";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalConfig {
    pub hostname: String,
    pub admintimeout: String,
    pub timezone: String,
    pub admin_sport: String,
    pub admin_ssh_port: String,
    pub admin_scp: String,
}

impl From<SystemGlobal> for GlobalConfig {
    fn from(global: SystemGlobal) -> Self {
        Self {
            hostname: global.hostname,
            admintimeout: global.admintimeout,
            timezone: global.timezone,
            admin_sport: global.admin_sport,
            admin_ssh_port: global.admin_ssh_port,
            admin_scp: global.admin_scp,
        }
    }
}

impl From<&GlobalConfig> for SystemGlobal {
    fn from(config: &GlobalConfig) -> Self {
        Self {
            hostname: config.hostname.clone(),
            admintimeout: config.admintimeout.clone(),
            timezone: config.timezone.clone(),
            admin_sport: config.admin_sport.clone(),
            admin_ssh_port: config.admin_ssh_port.clone(),
            admin_scp: config.admin_scp.clone(),
        }
    }
}

pub struct SystemSettingGlobal {
    client: Arc<Client>,
}

#[async_trait]
impl RemoteResource for SystemSettingGlobal {
    type Config = GlobalConfig;
    const DISPLAY_NAME: &'static str = "System Setting Global";

    fn presence(&self, _config: &GlobalConfig) -> Presence {
        Presence::Singleton {
            key: SYSTEM_GLOBAL_ID,
        }
    }

    async fn create(&self, config: &GlobalConfig) -> Result<String, ApiError> {
        self.update(SYSTEM_GLOBAL_ID, config).await?;
        Ok(SYSTEM_GLOBAL_ID.to_string())
    }

    async fn read(&self, _id: &str, _prior: &GlobalConfig) -> Result<Option<GlobalConfig>, ApiError> {
        Ok(self.client.system().global().get().await?.map(GlobalConfig::from))
    }

    async fn update(&self, _id: &str, config: &GlobalConfig) -> Result<(), ApiError> {
        self.client.system().global().update(&config.into()).await
    }

    async fn delete(&self, _id: &str, _config: &GlobalConfig) -> Result<(), ApiError> {
        Ok(())
    }
}

impl ResourceKind for SystemSettingGlobal {
    const TYPE_NAME: &'static str = "fortios_system_setting_global";

    fn schema() -> Schema {
        ["admintimeout", "timezone", "admin_sport", "admin_ssh_port", "admin_scp"]
            .iter()
            .fold(
                SchemaBuilder::new()
                    .version(0)
                    .description("Global settings of a FortiOS device")
                    .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
                    .attribute(
                        AttributeBuilder::new("hostname", AttributeType::String)
                            .required()
                            .build(),
                    ),
                |builder, name| {
                    builder.attribute(
                        AttributeBuilder::new(name, AttributeType::String)
                            .optional()
                            .computed()
                            .build(),
                    )
                },
            )
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<GlobalConfig, ResourceError> {
        Ok(GlobalConfig {
            hostname: string_attr(config, "hostname")?,
            admintimeout: string_attr(config, "admintimeout")?,
            timezone: string_attr(config, "timezone")?,
            admin_sport: string_attr(config, "admin_sport")?,
            admin_ssh_port: string_attr(config, "admin_ssh_port")?,
            admin_scp: string_attr(config, "admin_scp")?,
        })
    }

    fn to_state(config: &GlobalConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "hostname", &config.hostname)?;
        put_computed(state, "admintimeout", &config.admintimeout)?;
        put_computed(state, "timezone", &config.timezone)?;
        put_computed(state, "admin_sport", &config.admin_sport)?;
        put_computed(state, "admin_ssh_port", &config.admin_ssh_port)?;
        put_computed(state, "admin_scp", &config.admin_scp)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.fortios_client()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::{create, delete, fortios_resource, read, string};
    use mockito::{Matcher, Server};
    use serde_json::json;

    const GLOBAL_BODY: &str = r#"{"status":"success","results":{"hostname":"fw01","admintimeout":15,"timezone":"04","admin-sport":8443,"admin-ssh-port":22,"admin-scp":"disable"}}"#;

    #[tokio::test]
    async fn create_writes_the_singleton_under_a_fixed_id() {
        let mut server = Server::new_async().await;
        let put = server
            .mock("PUT", "/api/v2/cmdb/system/global")
            .match_body(Matcher::PartialJson(json!({"hostname": "fw01", "admin-sport": "8443"})))
            .with_body(r#"{"status":"success"}"#)
            .create_async()
            .await;
        let _get = server
            .mock("GET", "/api/v2/cmdb/system/global")
            .with_body(GLOBAL_BODY)
            .create_async()
            .await;

        let resource = fortios_resource::<SystemSettingGlobal>(&server.url()).await;
        let response = create(&resource, json!({"hostname": "fw01", "admin_sport": "8443"})).await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.new_state;
        assert_eq!(string(&state, "id"), SYSTEM_GLOBAL_ID);
        assert_eq!(string(&state, "admintimeout"), "15");
        assert_eq!(string(&state, "admin_ssh_port"), "22");
        put.assert_async().await;
    }

    #[tokio::test]
    async fn delete_leaves_settings_readable() {
        let mut server = Server::new_async().await;
        let del = server
            .mock("DELETE", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let _get = server
            .mock("GET", "/api/v2/cmdb/system/global")
            .with_body(GLOBAL_BODY)
            .create_async()
            .await;

        let resource = fortios_resource::<SystemSettingGlobal>(&server.url()).await;
        let state = crate::resources::test_support::value(json!({
            "id": SYSTEM_GLOBAL_ID,
            "hostname": "fw01"
        }));

        assert!(delete(&resource, state.clone()).await.diagnostics.is_empty());
        let after = read(&resource, state).await.new_state.unwrap();

        assert_eq!(string(&after, "hostname"), "fw01");
        del.assert_async().await;
    }
}
