use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

use super::common::{normalize_endpoint, ApiQueryParams, CmdbErrorResponse, CmdbResponse, Results};
use super::error::ApiError;
use super::pool::ConnectionPoolConfig;

/// FortiOS REST API client for `/api/v2/cmdb`
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    vdom: Option<String>,
    retry_config: RetryConfig,
}

/// Retry policy fixed when a client is built.
/// Only transport failures are retried and attempts follow each other immediately.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            timeout_seconds: 30,
        }
    }
}

impl RetryConfig {
    fn is_retryable(error: &reqwest::Error) -> bool {
        error.is_timeout() || error.is_connect()
    }

    /// Sends the request built by `request_fn`, again after a transport failure
    /// until `max_retries` extra attempts are used up.
    pub(crate) async fn run<F, Fut>(&self, path: &str, request_fn: F) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        let mut attempt = 0;

        loop {
            match request_fn().await {
                Ok(response) => {
                    tracing::debug!("{} responded with {}", path, response.status());
                    return Ok(response);
                }
                Err(e) if Self::is_retryable(&e) && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!("Retrying request to {} (attempt {}): {}", path, attempt, e);
                }
                Err(e) => return Err(self.exhausted_error(e)),
            }
        }
    }

    fn exhausted_error(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout_seconds)
        } else if error.is_connect() {
            ApiError::ServiceUnavailable
        } else {
            ApiError::RequestError(error)
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.inner.base_url)
            .field("vdom", &self.inner.vdom)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(hostname: &str, token: &str, insecure: bool) -> Result<Self, ApiError> {
        Self::with_config(hostname, token, insecure, None, RetryConfig::default())
    }

    pub fn with_config(
        hostname: &str,
        token: &str,
        insecure: bool,
        vdom: Option<String>,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let http_client = ConnectionPoolConfig::with_request_timeout(retry_config.timeout_seconds)
            .build_client(insecure)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: normalize_endpoint(hostname)?,
                auth_header: format!("Bearer {}", token),
                vdom: vdom.filter(|v| !v.is_empty()),
                retry_config,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    pub fn retry_config(&self) -> &RetryConfig {
        &self.inner.retry_config
    }

    /// Firewall object operations
    pub fn firewall(&self) -> crate::api::firewall::FirewallApi<'_> {
        crate::api::firewall::FirewallApi::new(self)
    }

    /// System and networking operations
    pub fn system(&self) -> crate::api::system::SystemApi<'_> {
        crate::api::system::SystemApi::new(self)
    }

    fn url(&self, path: &str) -> String {
        let query = ApiQueryParams::new()
            .add_optional("vdom", self.inner.vdom.as_deref())
            .to_query_string();
        format!("{}/api/v2/cmdb/{}{}", self.inner.base_url, path, query)
    }

    /// GET a table entry or singleton table. `Ok(None)` means the object does not exist.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let url = self.url(path);
        let response = self
            .execute_with_retry(
                || {
                    tracing::debug!("GET request to: {}", url);
                    self.inner
                        .http_client
                        .get(&url)
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .send()
                },
                path,
            )
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("{} not found", path);
            return Ok(None);
        }

        let envelope: CmdbResponse<T> = self.parse_response(response).await?;
        Ok(envelope.results.and_then(Results::into_first))
    }

    /// POST a new table entry and return the key FortiOS assigned to it
    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<String, ApiError> {
        let url = self.url(path);
        let response = self
            .execute_with_retry(
                || {
                    tracing::debug!("POST request to: {}", url);
                    self.inner
                        .http_client
                        .post(&url)
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .json(body)
                        .send()
                },
                path,
            )
            .await?;

        let envelope: CmdbResponse<serde_json::Value> = self.parse_response(response).await?;
        Ok(envelope.mkey)
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.url(path);
        let response = self
            .execute_with_retry(
                || {
                    tracing::debug!("PUT request to: {}", url);
                    self.inner
                        .http_client
                        .put(&url)
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .json(body)
                        .send()
                },
                path,
            )
            .await?;

        self.parse_response::<CmdbResponse<serde_json::Value>>(response)
            .await
            .map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        let response = self
            .execute_with_retry(
                || {
                    tracing::debug!("DELETE request to: {}", url);
                    self.inner
                        .http_client
                        .delete(&url)
                        .header(AUTHORIZATION, &self.inner.auth_header)
                        .send()
                },
                path,
            )
            .await?;

        self.parse_response::<CmdbResponse<serde_json::Value>>(response)
            .await
            .map(|_| ())
    }

    async fn execute_with_retry<F, Fut>(
        &self,
        request_fn: F,
        path: &str,
    ) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<reqwest::Response, reqwest::Error>>,
    {
        self.inner.retry_config.run(path, request_fn).await
    }

    async fn parse_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::AuthError);
        }

        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        if !status.is_success() {
            let message = serde_json::from_str::<CmdbErrorResponse>(&text)
                .map(|body| body.describe())
                .unwrap_or(text);
            return Err(ApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        if let Ok(body) = serde_json::from_str::<CmdbErrorResponse>(&text) {
            if body.status == "error" {
                return Err(ApiError::ApiError {
                    status: status.as_u16(),
                    message: body.describe(),
                });
            }
        }

        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }
}
