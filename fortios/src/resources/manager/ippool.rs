//! `fortios_fmg_firewall_object_ippool`

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::StringInSlice;

use super::{adom_or_default, check_name, object_key, DEFAULT_ADOM};
use crate::api::manager::ippool::FmgIppool;
use crate::api::{ApiError, ManagerClient};
use crate::provider_data::FortiosProviderData;
use crate::resources::enums::{string_enum, StringEnum, Toggle};
use crate::resources::managed::{enum_attr, put_enum, put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError};

string_enum! {
    pub enum IppoolType {
        Overload => "overload",
        OneToOne => "one-to-one",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IppoolConfig {
    pub name: String,
    pub startip: String,
    pub endip: String,
    pub pool_type: IppoolType,
    pub comment: String,
    pub arp_reply: Toggle,
    pub arp_intf: String,
    pub associated_intf: String,
    pub adom: String,
}

impl IppoolConfig {
    fn to_api(&self) -> FmgIppool {
        FmgIppool {
            name: self.name.clone(),
            startip: self.startip.clone(),
            endip: self.endip.clone(),
            pool_type: self.pool_type.as_str().to_string(),
            comments: self.comment.clone(),
            arp_intf: self.arp_intf.clone(),
            arp_reply: self.arp_reply.as_str().to_string(),
            associated_interface: self.associated_intf.clone(),
        }
    }

    fn from_api(pool: FmgIppool, adom: &str) -> Result<Self, ApiError> {
        let pool_type = pool
            .pool_type
            .parse()
            .map_err(|other| ApiError::ParseError(format!("unsupported ippool type {:?}", other)))?;
        Ok(Self {
            name: pool.name,
            startip: pool.startip,
            endip: pool.endip,
            pool_type,
            comment: pool.comments,
            arp_reply: pool.arp_reply.parse().unwrap_or(Toggle::Enable),
            arp_intf: pool.arp_intf,
            associated_intf: pool.associated_interface,
            adom: adom.to_string(),
        })
    }
}

/// Source NAT pool in a FortiManager ADOM. The name cannot change.
pub struct FmgFirewallObjectIppool {
    client: Arc<ManagerClient>,
}

#[async_trait]
impl RemoteResource for FmgFirewallObjectIppool {
    type Config = IppoolConfig;
    const DISPLAY_NAME: &'static str = "FortiManager Firewall Object IP Pool";

    fn presence(&self, _config: &IppoolConfig) -> Presence {
        Presence::Managed
    }

    fn check_immutable(&self, prior: &IppoolConfig, planned: &IppoolConfig) -> Result<(), ResourceError> {
        check_name(&prior.name, &planned.name)
    }

    async fn create(&self, config: &IppoolConfig) -> Result<String, ApiError> {
        self.client
            .firewall(adom_or_default(&config.adom))
            .ippools()
            .create(&config.to_api())
            .await?;
        Ok(config.name.clone())
    }

    async fn read(&self, id: &str, prior: &IppoolConfig) -> Result<Option<IppoolConfig>, ApiError> {
        let adom = adom_or_default(&prior.adom);
        self.client
            .firewall(adom)
            .ippools()
            .get(object_key(id, &prior.name))
            .await?
            .map(|pool| IppoolConfig::from_api(pool, adom))
            .transpose()
    }

    async fn update(&self, _id: &str, config: &IppoolConfig) -> Result<(), ApiError> {
        self.client
            .firewall(adom_or_default(&config.adom))
            .ippools()
            .update(&config.to_api())
            .await
    }

    async fn delete(&self, id: &str, config: &IppoolConfig) -> Result<(), ApiError> {
        self.client
            .firewall(adom_or_default(&config.adom))
            .ippools()
            .delete(object_key(id, &config.name))
            .await
    }
}

impl ResourceKind for FmgFirewallObjectIppool {
    const TYPE_NAME: &'static str = "fortios_fmg_firewall_object_ippool";

    fn schema() -> Schema {
        let mut builder = SchemaBuilder::new()
            .version(0)
            .description("Firewall IP pool managed through FortiManager")
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build());
        for name in ["name", "startip", "endip"] {
            builder = builder.attribute(AttributeBuilder::new(name, AttributeType::String).required().build());
        }
        for name in ["comment", "arp_intf", "associated_intf"] {
            builder = builder.attribute(AttributeBuilder::new(name, AttributeType::String).optional().build());
        }
        builder
            .attribute(
                AttributeBuilder::new("type", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(IppoolType::Overload.as_str()))
                    .validator(StringInSlice::create(IppoolType::VALUES))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("arp_reply", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(Toggle::Enable.as_str()))
                    .validator(StringInSlice::create(Toggle::VALUES))
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

    fn from_config(config: &DynamicValue) -> Result<IppoolConfig, ResourceError> {
        Ok(IppoolConfig {
            name: string_attr(config, "name")?,
            startip: string_attr(config, "startip")?,
            endip: string_attr(config, "endip")?,
            pool_type: enum_attr(config, "type")?.unwrap_or(IppoolType::Overload),
            comment: string_attr(config, "comment")?,
            arp_reply: enum_attr(config, "arp_reply")?.unwrap_or(Toggle::Enable),
            arp_intf: string_attr(config, "arp_intf")?,
            associated_intf: string_attr(config, "associated_intf")?,
            adom: string_attr(config, "adom")?,
        })
    }

    fn to_state(config: &IppoolConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "name", &config.name)?;
        put_string(state, "startip", &config.startip)?;
        put_string(state, "endip", &config.endip)?;
        put_enum(state, "type", Some(config.pool_type))?;
        put_string(state, "comment", &config.comment)?;
        put_enum(state, "arp_reply", Some(config.arp_reply))?;
        put_string(state, "arp_intf", &config.arp_intf)?;
        put_string(state, "associated_intf", &config.associated_intf)?;
        put_string(state, "adom", &config.adom)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.manager_client()?,
        })
    }
}
