//! HTTP client construction shared by both device families

use std::time::Duration;

pub struct ConnectionPoolConfig {
    pub max_idle_connections: usize,
    pub idle_timeout: Duration,
    pub connection_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_connections: 4,
            idle_timeout: Duration::from_secs(90),
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ConnectionPoolConfig {
    pub fn with_request_timeout(timeout_seconds: u64) -> Self {
        Self {
            request_timeout: Duration::from_secs(timeout_seconds),
            ..Default::default()
        }
    }

    pub fn build_client(&self, insecure: bool) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .danger_accept_invalid_certs(insecure)
            .timeout(self.request_timeout)
            .connect_timeout(self.connection_timeout)
            .pool_idle_timeout(self.idle_timeout)
            .pool_max_idle_per_host(self.max_idle_connections)
            .build()
    }
}
