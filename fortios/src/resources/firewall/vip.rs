//! `fortios_firewall_object_vip`

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::NoNullElements;

use crate::api::firewall::vip::{FirewallVip, VipRange};
use crate::api::{ApiError, Client};
use crate::provider_data::FortiosProviderData;
use crate::resources::managed::{put_computed, put_list, put_string, string_attr, string_list, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError, DEFAULT_COMMENT};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VipConfig {
    pub name: String,
    pub comment: String,
    pub extip: String,
    pub mappedip: Vec<String>,
    pub extintf: String,
    pub portforward: String,
    pub protocol: String,
    pub extport: String,
    pub mappedport: String,
}

impl VipConfig {
    fn to_api(&self) -> FirewallVip {
        FirewallVip {
            name: self.name.clone(),
            comment: self.comment.clone(),
            extip: self.extip.clone(),
            mappedip: self
                .mappedip
                .iter()
                .map(|range| VipRange {
                    range: range.clone(),
                })
                .collect(),
            extintf: self.extintf.clone(),
            portforward: self.portforward.clone(),
            protocol: self.protocol.clone(),
            extport: self.extport.clone(),
            mappedport: self.mappedport.clone(),
        }
    }

    fn from_api(vip: FirewallVip) -> Self {
        Self {
            mappedip: vip.mapped_ranges(),
            name: vip.name,
            comment: vip.comment,
            extip: vip.extip,
            extintf: vip.extintf,
            portforward: vip.portforward,
            protocol: vip.protocol,
            extport: vip.extport,
            mappedport: vip.mappedport,
        }
    }
}

/// Virtual IP on a FortiOS device. The name may be changed in place.
pub struct FirewallObjectVip {
    client: Arc<Client>,
}

#[async_trait]
impl RemoteResource for FirewallObjectVip {
    type Config = VipConfig;
    const DISPLAY_NAME: &'static str = "Firewall Object VIP";

    fn presence(&self, _config: &VipConfig) -> Presence {
        Presence::Managed
    }

    fn identifier(&self, id: &str, config: &VipConfig) -> String {
        if config.name.is_empty() {
            id.to_string()
        } else {
            config.name.clone()
        }
    }

    async fn create(&self, config: &VipConfig) -> Result<String, ApiError> {
        self.client.firewall().vips().create(&config.to_api()).await
    }

    async fn read(&self, id: &str, prior: &VipConfig) -> Result<Option<VipConfig>, ApiError> {
        let key = if prior.name.is_empty() { id } else { prior.name.as_str() };
        Ok(self
            .client
            .firewall()
            .vips()
            .get(key)
            .await?
            .map(VipConfig::from_api))
    }

    async fn update(&self, id: &str, config: &VipConfig) -> Result<(), ApiError> {
        self.client.firewall().vips().update(id, &config.to_api()).await
    }

    async fn delete(&self, id: &str, _config: &VipConfig) -> Result<(), ApiError> {
        self.client.firewall().vips().delete(id).await
    }
}

impl ResourceKind for FirewallObjectVip {
    const TYPE_NAME: &'static str = "fortios_firewall_object_vip";

    fn schema() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Virtual IP (destination NAT) on a FortiOS device")
            .attribute(
                AttributeBuilder::new("id", AttributeType::String)
                    .computed()
                    .description("VIP name as stored on the device")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("comment", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(DEFAULT_COMMENT))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("extip", AttributeType::String)
                    .required()
                    .description("External IP address or range")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("mappedip", AttributeType::List(Box::new(AttributeType::String)))
                    .required()
                    .description("Internal addresses or ranges the external IP maps to")
                    .validator(NoNullElements::create())
                    .build(),
            )
            .attribute(optional_computed("extintf"))
            .attribute(optional_computed("portforward"))
            .attribute(optional_computed("protocol"))
            .attribute(optional_computed("extport"))
            .attribute(optional_computed("mappedport"))
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<VipConfig, ResourceError> {
        Ok(VipConfig {
            name: string_attr(config, "name")?,
            comment: string_attr(config, "comment")?,
            extip: string_attr(config, "extip")?,
            mappedip: string_list(config, "mappedip")?,
            extintf: string_attr(config, "extintf")?,
            portforward: string_attr(config, "portforward")?,
            protocol: string_attr(config, "protocol")?,
            extport: string_attr(config, "extport")?,
            mappedport: string_attr(config, "mappedport")?,
        })
    }

    fn to_state(config: &VipConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "name", &config.name)?;
        put_string(state, "comment", &config.comment)?;
        put_string(state, "extip", &config.extip)?;
        put_list(state, "mappedip", &config.mappedip)?;
        put_computed(state, "extintf", &config.extintf)?;
        put_computed(state, "portforward", &config.portforward)?;
        put_computed(state, "protocol", &config.protocol)?;
        put_computed(state, "extport", &config.extport)?;
        put_computed(state, "mappedport", &config.mappedport)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.fortios_client()?,
        })
    }
}

fn optional_computed(name: &str) -> tfplug::schema::Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .optional()
        .computed()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::{create, delete, fortios_resource, read, string, update, value};
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn vip_body(name: &str) -> String {
        json!({
            "status": "success",
            "results": [{
                "name": name,
                "comment": DEFAULT_COMMENT,
                "extip": "203.0.113.5",
                "mappedip": [{"range": "10.0.0.5"}],
                "extintf": "any",
                "portforward": "disable",
                "protocol": "tcp",
                "extport": "0-65535",
                "mappedport": "0-65535"
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn create_then_read_returns_the_input() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", "/api/v2/cmdb/firewall/vip")
            .match_body(Matcher::PartialJson(json!({
                "name": "vip1",
                "comment": DEFAULT_COMMENT,
                "extip": "203.0.113.5",
                "mappedip": [{"range": "10.0.0.5"}]
            })))
            .with_body(r#"{"status":"success","mkey":"vip1"}"#)
            .create_async()
            .await;
        let get = server
            .mock("GET", "/api/v2/cmdb/firewall/vip/vip1")
            .with_body(vip_body("vip1"))
            .create_async()
            .await;

        let resource = fortios_resource::<FirewallObjectVip>(&server.url()).await;
        let response = create(
            &resource,
            json!({"name": "vip1", "extip": "203.0.113.5", "mappedip": ["10.0.0.5"]}),
        )
        .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.new_state;
        assert_eq!(string(&state, "id"), "vip1");
        assert_eq!(string(&state, "name"), "vip1");
        assert_eq!(string(&state, "extip"), "203.0.113.5");
        assert_eq!(string(&state, "portforward"), "disable");
        assert_eq!(string_list(&state, "mappedip").unwrap(), vec!["10.0.0.5"]);
        post.assert_async().await;
        get.assert_async().await;
    }

    #[tokio::test]
    async fn empty_device_values_are_kept_for_computed_attributes() {
        let mut server = Server::new_async().await;
        let _post = server
            .mock("POST", "/api/v2/cmdb/firewall/vip")
            .with_body(r#"{"status":"success","mkey":"vip1"}"#)
            .create_async()
            .await;
        let _get = server
            .mock("GET", "/api/v2/cmdb/firewall/vip/vip1")
            .with_body(
                json!({
                    "status": "success",
                    "results": [{
                        "name": "vip1",
                        "extip": "203.0.113.5",
                        "mappedip": [{"range": "10.0.0.5"}],
                        "portforward": ""
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let resource = fortios_resource::<FirewallObjectVip>(&server.url()).await;
        let created = create(
            &resource,
            json!({"name": "vip1", "extip": "203.0.113.5", "mappedip": ["10.0.0.5"]}),
        )
        .await;
        assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
        assert_eq!(string(&created.new_state, "portforward"), "");

        let state = read(&resource, created.new_state).await.new_state.unwrap();
        assert_eq!(string(&state, "name"), "vip1");
        assert_eq!(string(&state, "extip"), "203.0.113.5");
        assert_eq!(string_list(&state, "mappedip").unwrap(), vec!["10.0.0.5"]);
        assert_eq!(string(&state, "portforward"), "");
    }

    #[tokio::test]
    async fn null_mapped_ip_is_rejected_without_remote_calls() {
        let mut server = Server::new_async().await;
        let post = server
            .mock("POST", "/api/v2/cmdb/firewall/vip")
            .expect(0)
            .create_async()
            .await;

        let resource = fortios_resource::<FirewallObjectVip>(&server.url()).await;
        let response = create(
            &resource,
            json!({"name": "vip1", "extip": "203.0.113.5", "mappedip": [null]}),
        )
        .await;

        assert_eq!(response.diagnostics[0].detail, "null value");
        assert!(response.new_state.is_null());
        post.assert_async().await;
    }

    #[tokio::test]
    async fn rename_updates_by_old_key_and_tracks_new_name() {
        let mut server = Server::new_async().await;
        let put = server
            .mock("PUT", "/api/v2/cmdb/firewall/vip/vip1")
            .match_body(Matcher::PartialJson(json!({"name": "vip2"})))
            .with_body(r#"{"status":"success","mkey":"vip2"}"#)
            .create_async()
            .await;
        let _get = server
            .mock("GET", "/api/v2/cmdb/firewall/vip/vip2")
            .with_body(vip_body("vip2"))
            .create_async()
            .await;

        let resource = fortios_resource::<FirewallObjectVip>(&server.url()).await;
        let prior = value(json!({
            "id": "vip1",
            "name": "vip1",
            "extip": "203.0.113.5",
            "mappedip": ["10.0.0.5"]
        }));
        let response = update(
            &resource,
            prior,
            json!({"name": "vip2", "extip": "203.0.113.5", "mappedip": ["10.0.0.5"]}),
        )
        .await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        assert_eq!(string(&response.new_state, "id"), "vip2");
        put.assert_async().await;
    }

    #[tokio::test]
    async fn deleted_vip_reads_as_absent() {
        let mut server = Server::new_async().await;
        let del = server
            .mock("DELETE", "/api/v2/cmdb/firewall/vip/vip1")
            .with_body(r#"{"status":"success"}"#)
            .create_async()
            .await;
        let _get = server
            .mock("GET", "/api/v2/cmdb/firewall/vip/vip1")
            .with_status(404)
            .with_body(r#"{"status":"error","http_status":404}"#)
            .create_async()
            .await;

        let resource = fortios_resource::<FirewallObjectVip>(&server.url()).await;
        let state = value(json!({"id": "vip1", "name": "vip1"}));

        let deleted = delete(&resource, state.clone()).await;
        assert!(deleted.diagnostics.is_empty());
        del.assert_async().await;

        let response = read(&resource, state).await;
        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn imported_vip_is_read_by_id() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("GET", "/api/v2/cmdb/firewall/vip/web")
            .with_body(vip_body("web"))
            .create_async()
            .await;

        let resource = fortios_resource::<FirewallObjectVip>(&server.url()).await;
        let response = read(&resource, value(json!({"id": "web"}))).await;

        let state = response.new_state.unwrap();
        assert_eq!(string(&state, "name"), "web");
        assert_eq!(string(&state, "comment"), DEFAULT_COMMENT);
    }

    #[tokio::test]
    async fn remote_failure_on_update_keeps_prior_state() {
        let mut server = Server::new_async().await;
        let _put = server
            .mock("PUT", "/api/v2/cmdb/firewall/vip/vip1")
            .with_status(500)
            .with_body(r#"{"status":"error","http_status":500,"cli_error":"invalid extip"}"#)
            .create_async()
            .await;

        let resource = fortios_resource::<FirewallObjectVip>(&server.url()).await;
        let prior = value(json!({"id": "vip1", "name": "vip1", "extip": "1.1.1.1", "mappedip": ["10.0.0.5"]}));
        let response = update(
            &resource,
            prior.clone(),
            json!({"name": "vip1", "extip": "bogus", "mappedip": ["10.0.0.5"]}),
        )
        .await;

        assert_eq!(response.new_state, prior);
        assert!(response.diagnostics[0]
            .detail
            .starts_with("Error updating Firewall Object VIP: "));
        assert!(response.diagnostics[0].detail.contains("invalid extip"));
    }
}
