//! `system/ntp` singleton

use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::Client;

const PATH: &str = "system/ntp";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NtpServer {
    pub server: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemNtp {
    #[serde(rename = "type", default)]
    pub ntp_type: String,
    /// `None` leaves the device list alone, an empty list clears it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ntpserver: Option<Vec<NtpServer>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ntpsync: String,
}

pub struct NtpApi<'a> {
    client: &'a Client,
}

impl<'a> NtpApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get(&self) -> Result<Option<SystemNtp>, ApiError> {
        self.client.get(PATH).await
    }

    pub async fn update(&self, ntp: &SystemNtp) -> Result<(), ApiError> {
        self.client.put(PATH, ntp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::create_test_client;
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn update_sends_server_objects() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v2/cmdb/system/ntp")
            .match_body(Matcher::Json(json!({
                "type": "custom",
                "ntpserver": [{"server": "1.1.1.1"}, {"server": "2.2.2.2"}],
                "ntpsync": "enable"
            })))
            .with_body(r#"{"status":"success","http_status":200}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let ntp = SystemNtp {
            ntp_type: "custom".to_string(),
            ntpserver: Some(vec![
                NtpServer {
                    server: "1.1.1.1".to_string(),
                },
                NtpServer {
                    server: "2.2.2.2".to_string(),
                },
            ]),
            ntpsync: "enable".to_string(),
        };
        client.system().ntp().update(&ntp).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn empty_server_list_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/v2/cmdb/system/ntp")
            .match_body(Matcher::Json(json!({"type": "custom", "ntpserver": []})))
            .with_body(r#"{"status":"success","http_status":200}"#)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let ntp = SystemNtp {
            ntp_type: "custom".to_string(),
            ntpserver: Some(vec![]),
            ntpsync: String::new(),
        };
        client.system().ntp().update(&ntp).await.unwrap();

        mock.assert_async().await;
    }
}
