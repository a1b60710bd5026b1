//! Device manager CLI scripts (`/dvmdb/adom/<adom>/script`)

use serde::{Deserialize, Serialize};

use super::{object_url, ManagerClient};
use crate::api::error::ApiError;

/// Scripts are always CLI scripts
pub const SCRIPT_TYPE: &str = "cli";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FmgScript {
    pub name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(rename = "type", default)]
    pub script_type: String,
}

pub struct ScriptsApi<'a> {
    client: &'a ManagerClient,
    adom: &'a str,
}

impl<'a> ScriptsApi<'a> {
    pub fn new(client: &'a ManagerClient, adom: &'a str) -> Self {
        Self { client, adom }
    }

    fn table(&self) -> String {
        format!("/dvmdb/adom/{}/script", self.adom)
    }

    pub async fn get(&self, name: &str) -> Result<Option<FmgScript>, ApiError> {
        self.client.get(&object_url(&self.table(), name)).await
    }

    pub async fn create(&self, script: &FmgScript) -> Result<(), ApiError> {
        self.client.add(&self.table(), script).await
    }

    pub async fn update(&self, script: &FmgScript) -> Result<(), ApiError> {
        self.client
            .update(&object_url(&self.table(), &script.name), script)
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
    async fn create_posts_into_the_adom_script_table() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "add",
                "params": [{
                    "url": "/dvmdb/adom/lab/script",
                    "data": {"name": "banner", "type": "cli", "target": "remote_device"}
                }]
            })))
            .with_body(rpc_reply("/dvmdb/adom/lab/script", 0, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let script = FmgScript {
            name: "banner".to_string(),
            content: "config system global\nend".to_string(),
            target: "remote_device".to_string(),
            script_type: SCRIPT_TYPE.to_string(),
            ..Default::default()
        };
        client.scripts("lab").create(&script).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn delete_addresses_the_script_by_name() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "delete",
                "params": [{"url": "/dvmdb/adom/root/script/banner"}]
            })))
            .with_body(rpc_reply("/dvmdb/adom/root/script/banner", 0, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        client.scripts("root").delete("banner").await.unwrap();

        mock.assert_async().await;
    }
}
