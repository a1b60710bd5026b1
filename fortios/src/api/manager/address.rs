//! Firewall address objects (`/pm/config/adom/<adom>/obj/firewall/address`)

use serde::{Deserialize, Serialize};

use super::{object_url, ManagerClient};
use crate::api::common::string_or_list;
use crate::api::error::ApiError;

/// Address object as FortiManager stores it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FmgAddress {
    pub name: String,
    #[serde(rename = "type", default)]
    pub address_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub fqdn: String,
    #[serde(
        rename = "associated-interface",
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "String::is_empty"
    )]
    pub associated_interface: String,
    #[serde(
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "String::is_empty"
    )]
    pub subnet: String,
    #[serde(rename = "start-ip", default, skip_serializing_if = "String::is_empty")]
    pub start_ip: String,
    #[serde(rename = "end-ip", default, skip_serializing_if = "String::is_empty")]
    pub end_ip: String,
    #[serde(rename = "allow-routing", default, skip_serializing_if = "String::is_empty")]
    pub allow_routing: String,
}

pub struct AddressesApi<'a> {
    client: &'a ManagerClient,
    adom: &'a str,
}

impl<'a> AddressesApi<'a> {
    pub fn new(client: &'a ManagerClient, adom: &'a str) -> Self {
        Self { client, adom }
    }

    fn table(&self) -> String {
        format!("/pm/config/adom/{}/obj/firewall/address", self.adom)
    }

    pub async fn get(&self, name: &str) -> Result<Option<FmgAddress>, ApiError> {
        self.client.get(&object_url(&self.table(), name)).await
    }

    pub async fn create(&self, address: &FmgAddress) -> Result<(), ApiError> {
        self.client.add(&self.table(), address).await
    }

    pub async fn update(&self, address: &FmgAddress) -> Result<(), ApiError> {
        self.client
            .update(&object_url(&self.table(), &address.name), address)
            .await
    }

    pub async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.client.delete(&object_url(&self.table(), name)).await
    }
}
