//! Virtual IPs (`firewall/vip`)

use serde::{Deserialize, Serialize};

use crate::api::common::{path_key, string_or_number};
use crate::api::error::ApiError;
use crate::api::Client;

const TABLE: &str = "firewall/vip";

/// One mapped address or range, `10.0.0.1` or `10.0.0.1-10.0.0.9`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VipRange {
    pub range: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirewallVip {
    pub name: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub extip: String,
    #[serde(default)]
    pub mappedip: Vec<VipRange>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extintf: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub portforward: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub protocol: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub extport: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub mappedport: String,
}

impl FirewallVip {
    pub fn mapped_ranges(&self) -> Vec<String> {
        self.mappedip.iter().map(|m| m.range.clone()).collect()
    }
}

pub struct VipsApi<'a> {
    client: &'a Client,
}

impl<'a> VipsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET firewall/vip/{name}
    pub async fn get(&self, name: &str) -> Result<Option<FirewallVip>, ApiError> {
        self.client
            .get(&format!("{}/{}", TABLE, path_key(name)))
            .await
    }

    /// POST firewall/vip, returns the mkey
    pub async fn create(&self, vip: &FirewallVip) -> Result<String, ApiError> {
        self.client.post(TABLE, vip).await
    }

    /// PUT firewall/vip/{mkey}
    pub async fn update(&self, mkey: &str, vip: &FirewallVip) -> Result<(), ApiError> {
        self.client
            .put(&format!("{}/{}", TABLE, path_key(mkey)), vip)
            .await
    }

    /// DELETE firewall/vip/{mkey}
    pub async fn delete(&self, mkey: &str) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", TABLE, path_key(mkey)))
            .await
    }
}
