//! `fortios_fmg_devicemanager_script`

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::StringInSlice;

use super::{adom_or_default, check_name, object_key, DEFAULT_ADOM};
use crate::api::manager::script::{FmgScript, SCRIPT_TYPE};
use crate::api::{ApiError, ManagerClient};
use crate::provider_data::FortiosProviderData;
use crate::resources::enums::{string_enum, StringEnum};
use crate::resources::managed::{enum_attr, put_enum, put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError};

string_enum! {
    /// Where a script runs
    pub enum ScriptTarget {
        DeviceDatabase => "device_database",
        RemoteDevice => "remote_device",
        AdomDatabase => "adom_database",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptConfig {
    pub name: String,
    pub content: String,
    pub description: String,
    pub target: ScriptTarget,
    pub adom: String,
}

impl ScriptConfig {
    fn to_api(&self) -> FmgScript {
        FmgScript {
            name: self.name.clone(),
            content: self.content.clone(),
            desc: self.description.clone(),
            target: self.target.as_str().to_string(),
            script_type: SCRIPT_TYPE.to_string(),
        }
    }
}

pub struct FmgDevicemanagerScript {
    client: Arc<ManagerClient>,
}

#[async_trait]
impl RemoteResource for FmgDevicemanagerScript {
    type Config = ScriptConfig;
    const DISPLAY_NAME: &'static str = "FortiManager Devicemanager Script";

    fn presence(&self, _config: &ScriptConfig) -> Presence {
        Presence::Managed
    }

    fn check_immutable(&self, prior: &ScriptConfig, planned: &ScriptConfig) -> Result<(), ResourceError> {
        check_name(&prior.name, &planned.name)
    }

    async fn create(&self, config: &ScriptConfig) -> Result<String, ApiError> {
        self.client
            .scripts(adom_or_default(&config.adom))
            .create(&config.to_api())
            .await?;
        Ok(config.name.clone())
    }

    async fn read(&self, id: &str, prior: &ScriptConfig) -> Result<Option<ScriptConfig>, ApiError> {
        let adom = adom_or_default(&prior.adom);
        let script = match self.client.scripts(adom).get(object_key(id, &prior.name)).await? {
            Some(script) => script,
            None => return Ok(None),
        };
        let target = script
            .target
            .parse()
            .map_err(|other| ApiError::ParseError(format!("unsupported script target {:?}", other)))?;
        Ok(Some(ScriptConfig {
            name: script.name,
            content: script.content,
            description: script.desc,
            target,
            adom: adom.to_string(),
        }))
    }

    async fn update(&self, _id: &str, config: &ScriptConfig) -> Result<(), ApiError> {
        self.client
            .scripts(adom_or_default(&config.adom))
            .update(&config.to_api())
            .await
    }

    async fn delete(&self, id: &str, config: &ScriptConfig) -> Result<(), ApiError> {
        self.client
            .scripts(adom_or_default(&config.adom))
            .delete(object_key(id, &config.name))
            .await
    }
}

impl ResourceKind for FmgDevicemanagerScript {
    const TYPE_NAME: &'static str = "fortios_fmg_devicemanager_script";

    fn schema() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("CLI script stored in FortiManager's device manager")
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("content", AttributeType::String)
                    .required()
                    .description("CLI commands")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("target", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(ScriptTarget::DeviceDatabase.as_str()))
                    .validator(StringInSlice::create(ScriptTarget::VALUES))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("adom", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(DEFAULT_ADOM))
                    .build(),
            )
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<ScriptConfig, ResourceError> {
        Ok(ScriptConfig {
            name: string_attr(config, "name")?,
            content: string_attr(config, "content")?,
            description: string_attr(config, "description")?,
            target: enum_attr(config, "target")?.unwrap_or(ScriptTarget::DeviceDatabase),
            adom: string_attr(config, "adom")?,
        })
    }

    fn to_state(config: &ScriptConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "name", &config.name)?;
        put_string(state, "content", &config.content)?;
        put_string(state, "description", &config.description)?;
        put_enum(state, "target", Some(config.target))?;
        put_string(state, "adom", &config.adom)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.manager_client()?,
        })
    }
}
