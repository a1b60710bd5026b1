//! Test helpers for the FortiOS and FortiManager APIs

#[cfg(test)]
pub fn create_test_client(url: &str) -> super::Client {
    super::Client::new(url, "test-token", true).unwrap()
}

#[cfg(test)]
pub fn create_test_manager(url: &str) -> super::ManagerClient {
    super::ManagerClient::new(url, "test-api-key", true).unwrap()
}

/// A FortiManager JSON-RPC reply carrying one result
#[cfg(test)]
pub fn rpc_reply(url: &str, code: i64, data: Option<serde_json::Value>) -> String {
    let message = match code {
        0 => "OK",
        -3 => "Object does not exist",
        _ => "Failed",
    };
    let mut result = serde_json::json!({
        "status": {"code": code, "message": message},
        "url": url,
    });
    if let Some(data) = data {
        result["data"] = data;
    }
    serde_json::json!({"id": 1, "result": [result]}).to_string()
}
