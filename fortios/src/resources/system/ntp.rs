//! `fortios_system_setting_ntp`
//!
//! The NTP server list is written but never read back. FortiOS does not
//! return it in a form that round-trips, so the configured list is kept.

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::NoNullElements;

use crate::api::system::ntp::{NtpServer, SystemNtp};
use crate::api::{ApiError, Client};
use crate::provider_data::FortiosProviderData;
use crate::resources::managed::{optional_list, put_computed, put_list, put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError};

pub const SYSTEM_NTP_ID: &str = "fortios-system-setting-ntp";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NtpConfig {
    pub ntp_type: String,
    pub ntpserver: Option<Vec<String>>,
    pub ntpsync: String,
}

pub struct SystemSettingNtp {
    client: Arc<Client>,
}

#[async_trait]
impl RemoteResource for SystemSettingNtp {
    type Config = NtpConfig;
    const DISPLAY_NAME: &'static str = "System Setting NTP";

    fn presence(&self, _config: &NtpConfig) -> Presence {
        Presence::Singleton { key: SYSTEM_NTP_ID }
    }

    async fn create(&self, config: &NtpConfig) -> Result<String, ApiError> {
        self.update(SYSTEM_NTP_ID, config).await?;
        Ok(SYSTEM_NTP_ID.to_string())
    }

    async fn read(&self, _id: &str, prior: &NtpConfig) -> Result<Option<NtpConfig>, ApiError> {
        Ok(self.client.system().ntp().get().await?.map(|ntp| NtpConfig {
            ntp_type: ntp.ntp_type,
            ntpserver: prior.ntpserver.clone(),
            ntpsync: ntp.ntpsync,
        }))
    }

    async fn update(&self, _id: &str, config: &NtpConfig) -> Result<(), ApiError> {
        let ntp = SystemNtp {
            ntp_type: config.ntp_type.clone(),
            ntpserver: config.ntpserver.as_ref().map(|servers| {
                servers
                    .iter()
                    .map(|server| NtpServer {
                        server: server.clone(),
                    })
                    .collect()
            }),
            ntpsync: config.ntpsync.clone(),
        };
        self.client.system().ntp().update(&ntp).await
    }

    async fn delete(&self, _id: &str, _config: &NtpConfig) -> Result<(), ApiError> {
        Ok(())
    }
}

impl ResourceKind for SystemSettingNtp {
    const TYPE_NAME: &'static str = "fortios_system_setting_ntp";

    fn schema() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("NTP settings of a FortiOS device")
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("type", AttributeType::String)
                    .required()
                    .description("fortiguard or custom")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("ntpserver", AttributeType::List(Box::new(AttributeType::String)))
                    .optional()
                    .computed()
                    .validator(NoNullElements::create())
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("ntpsync", AttributeType::String)
                    .optional()
                    .computed()
                    .build(),
            )
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<NtpConfig, ResourceError> {
        Ok(NtpConfig {
            ntp_type: string_attr(config, "type")?,
            ntpserver: optional_list(config, "ntpserver")?,
            ntpsync: string_attr(config, "ntpsync")?,
        })
    }

    fn to_state(config: &NtpConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "type", &config.ntp_type)?;
        put_list(state, "ntpserver", config.ntpserver.as_deref().unwrap_or_default())?;
        put_computed(state, "ntpsync", &config.ntpsync)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.fortios_client()?,
        })
    }
}
