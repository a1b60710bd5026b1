//! `fortios_fmg_system_global`

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::StringInSlice;

use super::{refreshed_enum, refreshed_text};
use crate::api::manager::system::GlobalSetting;
use crate::api::{ApiError, ManagerClient};
use crate::provider_data::FortiosProviderData;
use crate::resources::enums::{string_enum, StringEnum, Toggle};
use crate::resources::managed::{enum_attr, put_enum, put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError};

pub const FMG_GLOBAL_ID: &str = "fortimanager-global-setting";

string_enum! {
    pub enum AdomMode {
        Normal => "normal",
        Advanced => "advanced",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagerGlobalConfig {
    pub fortianalyzer_status: Option<Toggle>,
    pub adom_status: Option<Toggle>,
    pub adom_mode: Option<AdomMode>,
    pub hostname: String,
    pub timezone: String,
}

/// Timezone codes FortiManager accepts, `00` to `89`
pub fn timezone_codes() -> Vec<String> {
    (0..90).map(|code| format!("{:02}", code)).collect()
}

fn enum_value<T: StringEnum>(value: Option<T>) -> String {
    value.map(|v| v.as_str()).unwrap_or_default().to_string()
}

/// Timezones may come back as numbers
fn timezone_code(value: String) -> String {
    match value.parse::<u8>() {
        Ok(code) => format!("{:02}", code),
        Err(_) => value,
    }
}

pub struct FmgSystemGlobal {
    client: Arc<ManagerClient>,
}

#[async_trait]
impl RemoteResource for FmgSystemGlobal {
    type Config = ManagerGlobalConfig;
    const DISPLAY_NAME: &'static str = "FortiManager System Global";

    fn presence(&self, _config: &ManagerGlobalConfig) -> Presence {
        Presence::Singleton { key: FMG_GLOBAL_ID }
    }

    async fn create(&self, config: &ManagerGlobalConfig) -> Result<String, ApiError> {
        self.update(FMG_GLOBAL_ID, config).await?;
        Ok(FMG_GLOBAL_ID.to_string())
    }

    async fn read(
        &self,
        _id: &str,
        prior: &ManagerGlobalConfig,
    ) -> Result<Option<ManagerGlobalConfig>, ApiError> {
        let global = match self.client.system().get_global().await? {
            Some(global) => global,
            None => return Ok(None),
        };

        Ok(Some(ManagerGlobalConfig {
            fortianalyzer_status: refreshed_enum(
                &prior.fortianalyzer_status,
                "faz-status",
                &global.faz_status,
            )?,
            adom_status: refreshed_enum(&prior.adom_status, "adom-status", &global.adom_status)?,
            adom_mode: refreshed_enum(&prior.adom_mode, "adom-mode", &global.adom_mode)?,
            hostname: refreshed_text(&prior.hostname, global.hostname),
            timezone: refreshed_text(&prior.timezone, timezone_code(global.timezone)),
        }))
    }

    async fn update(&self, _id: &str, config: &ManagerGlobalConfig) -> Result<(), ApiError> {
        let global = GlobalSetting {
            faz_status: enum_value(config.fortianalyzer_status),
            adom_status: enum_value(config.adom_status),
            adom_mode: enum_value(config.adom_mode),
            hostname: config.hostname.clone(),
            timezone: config.timezone.clone(),
        };
        self.client.system().set_global(&global).await
    }

    async fn delete(&self, _id: &str, _config: &ManagerGlobalConfig) -> Result<(), ApiError> {
        Ok(())
    }
}

impl ResourceKind for FmgSystemGlobal {
    const TYPE_NAME: &'static str = "fortios_fmg_system_global";

    fn schema() -> Schema {
        let toggle = |name: &str| {
            AttributeBuilder::new(name, AttributeType::String)
                .optional()
                .validator(StringInSlice::create(Toggle::VALUES))
                .build()
        };

        SchemaBuilder::new()
            .version(0)
            .description("Global settings of FortiManager")
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(toggle("fortianalyzer_status"))
            .attribute(toggle("adom_status"))
            .attribute(
                AttributeBuilder::new("adom_mode", AttributeType::String)
                    .optional()
                    .validator(StringInSlice::create(AdomMode::VALUES))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("hostname", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("timezone", AttributeType::String)
                    .optional()
                    .description("Two digit timezone code")
                    .validator(StringInSlice::from_values(timezone_codes()))
                    .build(),
            )
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<ManagerGlobalConfig, ResourceError> {
        Ok(ManagerGlobalConfig {
            fortianalyzer_status: enum_attr(config, "fortianalyzer_status")?,
            adom_status: enum_attr(config, "adom_status")?,
            adom_mode: enum_attr(config, "adom_mode")?,
            hostname: string_attr(config, "hostname")?,
            timezone: string_attr(config, "timezone")?,
        })
    }

    fn to_state(config: &ManagerGlobalConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_enum(state, "fortianalyzer_status", config.fortianalyzer_status)?;
        put_enum(state, "adom_status", config.adom_status)?;
        put_enum(state, "adom_mode", config.adom_mode)?;
        put_string(state, "hostname", &config.hostname)?;
        put_string(state, "timezone", &config.timezone)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.manager_client()?,
        })
    }
}
