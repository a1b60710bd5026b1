//! IP pools (`/pm/config/adom/<adom>/obj/firewall/ippool`)

use serde::{Deserialize, Serialize};

use super::{object_url, ManagerClient};
use crate::api::common::string_or_list;
use crate::api::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FmgIppool {
    pub name: String,
    #[serde(default)]
    pub startip: String,
    #[serde(default)]
    pub endip: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub pool_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comments: String,
    #[serde(
        rename = "arp-intf",
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "String::is_empty"
    )]
    pub arp_intf: String,
    #[serde(rename = "arp-reply", default, skip_serializing_if = "String::is_empty")]
    pub arp_reply: String,
    #[serde(
        rename = "associated-interface",
        default,
        deserialize_with = "string_or_list",
        skip_serializing_if = "String::is_empty"
    )]
    pub associated_interface: String,
}

pub struct IppoolsApi<'a> {
    client: &'a ManagerClient,
    adom: &'a str,
}

impl<'a> IppoolsApi<'a> {
    pub fn new(client: &'a ManagerClient, adom: &'a str) -> Self {
        Self { client, adom }
    }

    fn table(&self) -> String {
        format!("/pm/config/adom/{}/obj/firewall/ippool", self.adom)
    }

    pub async fn get(&self, name: &str) -> Result<Option<FmgIppool>, ApiError> {
        self.client.get(&object_url(&self.table(), name)).await
    }

    pub async fn create(&self, pool: &FmgIppool) -> Result<(), ApiError> {
        self.client.add(&self.table(), pool).await
    }

    pub async fn update(&self, pool: &FmgIppool) -> Result<(), ApiError> {
        self.client
            .update(&object_url(&self.table(), &pool.name), pool)
            .await
    }

    pub async fn delete(&self, name: &str) -> Result<(), ApiError> {
        self.client.delete(&object_url(&self.table(), name)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_manager, rpc_reply};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn update_targets_the_named_pool() {
        let mut server = Server::new_async().await;
        let url = "/pm/config/adom/root/obj/firewall/ippool/nat-pool";
        let mock = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "update",
                "params": [{"url": url, "data": {"type": "one-to-one", "arp-reply": "enable"}}]
            })))
            .with_body(rpc_reply(url, 0, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let pool = FmgIppool {
            name: "nat-pool".to_string(),
            startip: "1.1.1.1".to_string(),
            endip: "1.1.1.10".to_string(),
            pool_type: "one-to-one".to_string(),
            arp_reply: "enable".to_string(),
            ..Default::default()
        };
        client.firewall("root").ippools().update(&pool).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_reads_hyphenated_fields() {
        let mut server = Server::new_async().await;
        let url = "/pm/config/adom/root/obj/firewall/ippool/p1";
        let _mock = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(
                url,
                0,
                Some(json!({
                    "name": "p1",
                    "startip": "1.1.1.1",
                    "endip": "1.1.1.2",
                    "type": "overload",
                    "arp-intf": ["port1"],
                    "arp-reply": "disable",
                    "associated-interface": ["port2"]
                })),
            ))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let pool = client
            .firewall("root")
            .ippools()
            .get("p1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(pool.arp_intf, "port1");
        assert_eq!(pool.arp_reply, "disable");
        assert_eq!(pool.associated_interface, "port2");
    }
}
