//! `system/global` singleton

use serde::{Deserialize, Serialize};

use crate::api::common::string_or_number;
use crate::api::error::ApiError;
use crate::api::Client;

const PATH: &str = "system/global";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemGlobal {
    #[serde(default)]
    pub hostname: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub admintimeout: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub timezone: String,
    #[serde(
        rename = "admin-sport",
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub admin_sport: String,
    #[serde(
        rename = "admin-ssh-port",
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub admin_ssh_port: String,
    #[serde(rename = "admin-scp", default, skip_serializing_if = "String::is_empty")]
    pub admin_scp: String,
}

pub struct GlobalApi<'a> {
    client: &'a Client,
}

impl<'a> GlobalApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Option<SystemGlobal>, ApiError> {
        self.client.get(PATH).await
    }

    pub async fn update(&self, global: &SystemGlobal) -> Result<(), ApiError> {
        self.client.put(PATH, global).await
    }
}
