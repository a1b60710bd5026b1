//! Network interfaces (`system/interface`)

use serde::{Deserialize, Serialize};

use crate::api::common::{path_key, string_or_number};
use crate::api::error::ApiError;
use crate::api::Client;

const TABLE: &str = "system/interface";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInterface {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub port_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ip: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub alias: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(
        rename = "device-identification",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub device_identification: String,
    #[serde(
        rename = "tcp-mss",
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub tcp_mss: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub speed: String,
    #[serde(rename = "mtu-override", default, skip_serializing_if = "String::is_empty")]
    pub mtu_override: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub mtu: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub allowaccess: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mode: String,
    #[serde(
        rename = "dns-server-override",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub dns_server_override: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub defaultgw: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub distance: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interface: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub vdom: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub vlanid: String,
}

pub struct InterfacesApi<'a> {
    client: &'a Client,
}

impl<'a> InterfacesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, name: &str) -> Result<Option<SystemInterface>, ApiError> {
        self.client
            .get(&format!("{}/{}", TABLE, path_key(name)))
            .await
    }

    pub async fn create(&self, interface: &SystemInterface) -> Result<String, ApiError> {
        self.client.post(TABLE, interface).await
    }

    pub async fn update(&self, mkey: &str, interface: &SystemInterface) -> Result<(), ApiError> {
        self.client
            .put(&format!("{}/{}", TABLE, path_key(mkey)), interface)
            .await
    }

    pub async fn delete(&self, mkey: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", TABLE, path_key(mkey)))
            .await
    }
}
