//! Common types and utilities shared by the FortiOS and FortiManager APIs

use serde::{Deserialize, Deserializer};

use super::error::ApiError;

/// Envelope returned by every FortiOS `/api/v2/cmdb` call
#[derive(Debug, Deserialize)]
pub struct CmdbResponse<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub http_status: Option<u16>,
    #[serde(default, deserialize_with = "string_or_number::deserialize")]
    pub mkey: String,
    pub results: Option<Results<T>>,
}

/// FortiOS returns table entries as a list and singleton tables as an object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Results<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Results<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            Results::Many(items) => items.into_iter().next(),
            Results::One(item) => Some(item),
        }
    }
}

/// Error body of a failed FortiOS call
#[derive(Debug, Deserialize)]
pub struct CmdbErrorResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub error: Option<i64>,
    #[serde(default)]
    pub cli_error: Option<String>,
}

impl CmdbErrorResponse {
    pub fn describe(&self) -> String {
        match (&self.cli_error, self.error) {
            (Some(cli), _) if !cli.is_empty() => cli.trim().to_string(),
            (_, Some(code)) => format!("{} (error {})", self.status, code),
            _ => self.status.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn add_optional<K: Into<String>, V: ToString>(mut self, key: K, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.params.push((key.into(), v.to_string()));
        }
        self
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        format!(
            "?{}",
            self.params
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&")
        )
    }
}

/// Escapes an object key for use as a single URL path segment
pub fn path_key(key: &str) -> String {
    urlencoding::encode(key).into_owned()
}

/// Turns an operator supplied host (`192.168.1.99`, `fw:8443`, `https://fw`)
/// into a base URL without trailing slash.
pub fn normalize_endpoint(hostname: &str) -> Result<String, ApiError> {
    let trimmed = hostname.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidEndpoint("hostname is empty".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = url::Url::parse(&candidate)
        .map_err(|e| ApiError::InvalidEndpoint(format!("{}: {}", hostname, e)))?;
    if url.host_str().is_none() {
        return Err(ApiError::InvalidEndpoint(format!("{}: missing host", hostname)));
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Reads numbers, strings and null into a String.
/// Both device families send numeric settings either way depending on version.
pub mod string_or_number {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum StringOrNumber {
            String(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
            Some(StringOrNumber::String(s)) => s,
            Some(StringOrNumber::Int(i)) => i.to_string(),
            Some(StringOrNumber::Float(f)) => f.to_string(),
            None => String::new(),
        })
    }
}

/// Reads a string, a list of strings or null into a space separated String.
/// FortiManager answers `subnet` as `["10.0.0.0", "255.255.255.0"]` and
/// interface references as single element lists.
pub fn string_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        String(String),
        List(Vec<String>),
    }

    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        Some(StringOrList::String(s)) => s,
        Some(StringOrList::List(items)) => items.join(" "),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "string_or_number::deserialize")]
        port: String,
        #[serde(default, deserialize_with = "string_or_list")]
        subnet: String,
    }

    #[test]
    fn numbers_and_strings_read_as_strings() {
        let sample: Sample = serde_json::from_value(json!({"port": 443})).unwrap();
        assert_eq!(sample.port, "443");

        let sample: Sample = serde_json::from_value(json!({"port": "8443"})).unwrap();
        assert_eq!(sample.port, "8443");

        let sample: Sample = serde_json::from_value(json!({"port": null})).unwrap();
        assert_eq!(sample.port, "");
    }

    #[test]
    fn lists_are_joined_with_spaces() {
        let sample: Sample =
            serde_json::from_value(json!({"subnet": ["10.0.0.0", "255.255.255.0"]})).unwrap();
        assert_eq!(sample.subnet, "10.0.0.0 255.255.255.0");

        let sample: Sample =
            serde_json::from_value(json!({"subnet": "10.0.0.0 255.0.0.0"})).unwrap();
        assert_eq!(sample.subnet, "10.0.0.0 255.0.0.0");
    }

    #[test]
    fn results_accept_list_and_object() {
        let many: CmdbResponse<serde_json::Value> =
            serde_json::from_value(json!({"status": "success", "results": [{"name": "a"}]}))
                .unwrap();
        assert_eq!(many.results.unwrap().into_first().unwrap()["name"], "a");

        let one: CmdbResponse<serde_json::Value> =
            serde_json::from_value(json!({"status": "success", "results": {"hostname": "fw"}}))
                .unwrap();
        assert_eq!(one.results.unwrap().into_first().unwrap()["hostname"], "fw");
    }

    #[test]
    fn query_params_are_encoded() {
        let query = ApiQueryParams::new()
            .add("vdom", "root")
            .add_optional("filter", Some("name==a b"))
            .add_optional("skip", None::<String>)
            .to_query_string();

        assert_eq!(query, "?vdom=root&filter=name%3D%3Da%20b");
        assert_eq!(ApiQueryParams::new().to_query_string(), "");
    }

    #[test]
    fn endpoints_are_normalized() {
        assert_eq!(
            normalize_endpoint("192.168.1.99").unwrap(),
            "https://192.168.1.99"
        );
        assert_eq!(
            normalize_endpoint("fw.example.com:8443").unwrap(),
            "https://fw.example.com:8443"
        );
        assert_eq!(
            normalize_endpoint("http://127.0.0.1:1234/").unwrap(),
            "http://127.0.0.1:1234"
        );
        assert!(normalize_endpoint("  ").is_err());
    }

    #[test]
    fn keys_are_escaped_as_one_segment() {
        assert_eq!(path_key("web server/1"), "web%20server%2F1");
    }
}
