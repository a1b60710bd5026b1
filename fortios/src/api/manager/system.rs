//! Global system settings (`/cli/global/system/...`)
//!
//! Both tables are singletons. They are written with `set` and never deleted.

use serde::{Deserialize, Serialize};

use super::ManagerClient;
use crate::api::common::string_or_number;
use crate::api::error::ApiError;

pub const DNS_URL: &str = "/cli/global/system/dns";
pub const GLOBAL_URL: &str = "/cli/global/system/global";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsSetting {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub primary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secondary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSetting {
    #[serde(rename = "faz-status", default, skip_serializing_if = "String::is_empty")]
    pub faz_status: String,
    #[serde(rename = "adom-status", default, skip_serializing_if = "String::is_empty")]
    pub adom_status: String,
    #[serde(rename = "adom-mode", default, skip_serializing_if = "String::is_empty")]
    pub adom_mode: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hostname: String,
    #[serde(
        default,
        deserialize_with = "string_or_number::deserialize",
        skip_serializing_if = "String::is_empty"
    )]
    pub timezone: String,
}

pub struct ManagerSystemApi<'a> {
    client: &'a ManagerClient,
}

impl<'a> ManagerSystemApi<'a> {
    pub fn new(client: &'a ManagerClient) -> Self {
        Self { client }
    }

    pub async fn get_dns(&self) -> Result<Option<DnsSetting>, ApiError> {
        self.client.get(DNS_URL).await
    }

    pub async fn set_dns(&self, dns: &DnsSetting) -> Result<(), ApiError> {
        self.client.set(DNS_URL, dns).await
    }

    pub async fn get_global(&self) -> Result<Option<GlobalSetting>, ApiError> {
        self.client.get(GLOBAL_URL).await
    }

    pub async fn set_global(&self, global: &GlobalSetting) -> Result<(), ApiError> {
        self.client.set(GLOBAL_URL, global).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_manager, rpc_reply};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn global_timezone_reads_as_two_digits() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(
                GLOBAL_URL,
                0,
                Some(json!({
                    "hostname": "fmg01",
                    "adom-status": "enable",
                    "adom-mode": "normal",
                    "faz-status": "disable",
                    "timezone": "04"
                })),
            ))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let global = client.system().get_global().await.unwrap().unwrap();

        assert_eq!(global.timezone, "04");
        assert_eq!(global.faz_status, "disable");
    }

    #[tokio::test]
    async fn dns_is_written_with_set() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "set",
                "params": [{"url": DNS_URL, "data": {"primary": "9.9.9.9"}}]
            })))
            .with_body(rpc_reply(DNS_URL, 0, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let dns = DnsSetting {
            primary: "9.9.9.9".to_string(),
            ..Default::default()
        };
        client.system().set_dns(&dns).await.unwrap();

        mock.assert_async().await;
    }
}
