//! FortiManager JSON-RPC API
//!
//! Every call is a `POST /jsonrpc` carrying one method and one url. Failures
//! are reported inside a successful HTTP response through `status.code`.

pub mod address;
pub mod ippool;
pub mod script;
pub mod system;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::client::RetryConfig;
use super::common::normalize_endpoint;
use super::error::ApiError;
use super::pool::ConnectionPoolConfig;

/// Status code FortiManager uses for a missing object
pub const OBJECT_NOT_FOUND: i64 = -3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RpcMethod {
    Get,
    Add,
    Update,
    Set,
    Delete,
}

impl RpcMethod {
    fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::Get => "get",
            RpcMethod::Add => "add",
            RpcMethod::Update => "update",
            RpcMethod::Set => "set",
            RpcMethod::Delete => "delete",
        }
    }
}

#[derive(Serialize)]
struct RpcRequest<'a, D: Serialize> {
    id: u64,
    method: RpcMethod,
    params: [RpcParams<'a, D>; 1],
}

#[derive(Serialize)]
struct RpcParams<'a, D: Serialize> {
    url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a D>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verbose: Option<u8>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct RpcResponse<T> {
    #[serde(default)]
    result: Vec<RpcResult<T>>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
struct RpcResult<T> {
    status: RpcStatus,
    #[serde(default)]
    url: String,
    data: Option<T>,
}

#[derive(Deserialize)]
struct RpcStatus {
    code: i64,
    #[serde(default)]
    message: String,
}

/// FortiManager JSON-RPC client
#[derive(Clone)]
pub struct ManagerClient {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    http_client: reqwest::Client,
    endpoint: String,
    auth_header: String,
    retry_config: RetryConfig,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ManagerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerClient")
            .field("endpoint", &self.inner.endpoint)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

impl ManagerClient {
    pub fn new(hostname: &str, api_key: &str, insecure: bool) -> Result<Self, ApiError> {
        Self::with_config(hostname, api_key, insecure, RetryConfig::default())
    }

    pub fn with_config(
        hostname: &str,
        api_key: &str,
        insecure: bool,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let http_client = ConnectionPoolConfig::with_request_timeout(retry_config.timeout_seconds)
            .build_client(insecure)?;

        Ok(Self {
            inner: Arc::new(ManagerInner {
                http_client,
                endpoint: format!("{}/jsonrpc", normalize_endpoint(hostname)?),
                auth_header: format!("Bearer {}", api_key),
                retry_config,
                next_id: AtomicU64::new(1),
            }),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Firewall objects of one ADOM
    pub fn firewall<'a>(&'a self, adom: &'a str) -> FirewallObjectsApi<'a> {
        FirewallObjectsApi::new(self, adom)
    }

    /// Device manager scripts of one ADOM
    pub fn scripts<'a>(&'a self, adom: &'a str) -> script::ScriptsApi<'a> {
        script::ScriptsApi::new(self, adom)
    }

    /// Global system settings
    pub fn system(&self) -> system::ManagerSystemApi<'_> {
        system::ManagerSystemApi::new(self)
    }

    /// `get` with `verbose: 1`. `Ok(None)` means the object does not exist.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ApiError> {
        match self
            .call::<serde_json::Value, T>(RpcMethod::Get, url, None)
            .await
        {
            Ok(result) => Ok(result.data),
            Err(ApiError::JsonRpc { code, .. }) if code == OBJECT_NOT_FOUND => {
                tracing::debug!("{} not found", url);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn add<D: Serialize>(&self, url: &str, data: &D) -> Result<(), ApiError> {
        self.call::<D, serde_json::Value>(RpcMethod::Add, url, Some(data))
            .await
            .map(|_| ())
    }

    pub async fn update<D: Serialize>(&self, url: &str, data: &D) -> Result<(), ApiError> {
        self.call::<D, serde_json::Value>(RpcMethod::Update, url, Some(data))
            .await
            .map(|_| ())
    }

    /// Replaces a singleton table
    pub async fn set<D: Serialize>(&self, url: &str, data: &D) -> Result<(), ApiError> {
        self.call::<D, serde_json::Value>(RpcMethod::Set, url, Some(data))
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, url: &str) -> Result<(), ApiError> {
        self.call::<serde_json::Value, serde_json::Value>(RpcMethod::Delete, url, None)
            .await
            .map(|_| ())
    }

    async fn call<D: Serialize, T: DeserializeOwned>(
        &self,
        method: RpcMethod,
        url: &str,
        data: Option<&D>,
    ) -> Result<RpcResult<T>, ApiError> {
        let request = RpcRequest {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params: [RpcParams {
                url,
                data,
                verbose: (method == RpcMethod::Get).then_some(1),
            }],
        };

        let response = self
            .inner
            .retry_config
            .run(url, || {
                tracing::debug!("JSON-RPC {} {}", method.as_str(), url);
                self.inner
                    .http_client
                    .post(&self.inner.endpoint)
                    .header(AUTHORIZATION, &self.inner.auth_header)
                    .json(&request)
                    .send()
            })
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::AuthError);
        }

        let text = response.text().await?;
        tracing::debug!("JSON-RPC response body: {}", text);

        if !status.is_success() {
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: RpcResponse<T> = serde_json::from_str(&text).map_err(|e| {
            tracing::error!("Failed to deserialize JSON-RPC response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })?;

        let result = body
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::ParseError(format!("{}: empty result", url)))?;

        if result.status.code != 0 {
            return Err(ApiError::JsonRpc {
                code: result.status.code,
                message: result.status.message,
                url: if result.url.is_empty() {
                    url.to_string()
                } else {
                    result.url
                },
            });
        }

        Ok(result)
    }
}

/// Firewall objects under `/pm/config/adom/<adom>/obj/firewall`
pub struct FirewallObjectsApi<'a> {
    client: &'a ManagerClient,
    adom: &'a str,
}

impl<'a> FirewallObjectsApi<'a> {
    pub fn new(client: &'a ManagerClient, adom: &'a str) -> Self {
        Self { client, adom }
    }

    pub fn addresses(&self) -> address::AddressesApi<'a> {
        address::AddressesApi::new(self.client, self.adom)
    }

    pub fn ippools(&self) -> ippool::IppoolsApi<'a> {
        ippool::IppoolsApi::new(self.client, self.adom)
    }
}

/// URL of one object inside an ADOM scoped table
pub(crate) fn object_url(table: &str, name: &str) -> String {
    format!("{}/{}", table, super::common::path_key(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_manager, rpc_reply};
    use mockito::{Matcher, Server};
    use serde_json::json;

    #[tokio::test]
    async fn get_sends_verbose_and_returns_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/jsonrpc")
            .match_header("authorization", "Bearer test-api-key")
            .match_body(Matcher::PartialJson(json!({
                "method": "get",
                "params": [{"url": "/cli/global/system/dns", "verbose": 1}]
            })))
            .with_body(rpc_reply(
                "/cli/global/system/dns",
                0,
                Some(json!({"primary": "8.8.8.8", "secondary": "1.1.1.1"})),
            ))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let dns: Option<serde_json::Value> = client.get("/cli/global/system/dns").await.unwrap();

        assert_eq!(dns.unwrap()["primary"], "8.8.8.8");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn get_decodes_typed_data() {
        #[derive(Debug, Deserialize)]
        struct Dns {
            primary: String,
        }

        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(
                "/cli/global/system/dns",
                0,
                Some(json!({"primary": "9.9.9.9"})),
            ))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let dns: Option<Dns> = client.get("/cli/global/system/dns").await.unwrap();

        assert_eq!(dns.unwrap().primary, "9.9.9.9");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let client = create_test_manager("https://192.0.2.2");
        let printed = format!("{:?}", client);

        assert!(printed.contains("192.0.2.2"));
        assert!(!printed.contains("test-api-key"));
    }

    #[tokio::test]
    async fn missing_object_reads_as_none() {
        let mut server = Server::new_async().await;
        let url = "/pm/config/adom/root/obj/firewall/address/gone";
        let _mock = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(url, OBJECT_NOT_FOUND, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let address: Option<serde_json::Value> = client.get(url).await.unwrap();

        assert!(address.is_none());
    }

    #[tokio::test]
    async fn status_codes_become_errors() {
        let mut server = Server::new_async().await;
        let url = "/pm/config/adom/root/obj/firewall/address";
        let _mock = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({"method": "add"})))
            .with_body(rpc_reply(url, -2, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let err = client
            .add(url, &json!({"name": "dup"}))
            .await
            .unwrap_err();

        match err {
            ApiError::JsonRpc { code, url: failed, .. } => {
                assert_eq!(code, -2);
                assert_eq!(failed, url);
            }
            other => panic!("Expected JsonRpc error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn not_found_is_an_error_outside_get() {
        let mut server = Server::new_async().await;
        let url = "/dvmdb/adom/root/script/gone";
        let _mock = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(url, OBJECT_NOT_FOUND, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let result = client.delete(url).await;

        tokio_test::assert_err!(result);
    }

    #[tokio::test]
    async fn set_sends_data() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "set",
                "params": [{"url": "/cli/global/system/global", "data": {"hostname": "fmg"}}]
            })))
            .with_body(rpc_reply("/cli/global/system/global", 0, None))
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        tokio_test::assert_ok!(
            client
                .set("/cli/global/system/global", &json!({"hostname": "fmg"}))
                .await
        );

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_failures_are_reported() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/jsonrpc")
            .with_status(401)
            .create_async()
            .await;

        let client = create_test_manager(&server.url());
        let err = client.delete("/cli/global/system/dns").await.unwrap_err();

        assert!(matches!(err, ApiError::AuthError));
    }

    #[test]
    fn object_urls_escape_names() {
        assert_eq!(
            object_url("/pm/config/adom/root/obj/firewall/address", "lan net"),
            "/pm/config/adom/root/obj/firewall/address/lan%20net"
        );
    }
}
