//! `fortios_fmg_firewall_object_address`
//!
//! An address is one of three shapes selected by `type`. Only the fields of
//! the selected shape are sent to FortiManager and refreshed on read.

use async_trait::async_trait;
use std::sync::Arc;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;
use tfplug::validator::StringInSlice;

use super::{adom_or_default, check_name, object_key, DEFAULT_ADOM};
use crate::api::manager::address::FmgAddress;
use crate::api::{ApiError, ManagerClient};
use crate::provider_data::FortiosProviderData;
use crate::resources::enums::{string_enum, StringEnum, Toggle};
use crate::resources::managed::{enum_attr, put_enum, put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError};

const DEFAULT_SUBNET: &str = "0.0.0.0 0.0.0.0";
const DEFAULT_START_IP: &str = "0.0.0.0";
const DEFAULT_END_IP: &str = "255.255.255.255";

string_enum! {
    pub enum AddressType {
        IpMask => "ipmask",
        IpRange => "iprange",
        Fqdn => "fqdn",
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddressKind {
    IpMask { subnet: String, allow_routing: Toggle },
    IpRange { start_ip: String, end_ip: String },
    Fqdn { fqdn: String },
}

impl AddressKind {
    pub fn address_type(&self) -> AddressType {
        match self {
            AddressKind::IpMask { .. } => AddressType::IpMask,
            AddressKind::IpRange { .. } => AddressType::IpRange,
            AddressKind::Fqdn { .. } => AddressType::Fqdn,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddressConfig {
    pub name: String,
    pub comment: String,
    pub associated_intf: String,
    pub adom: String,
    pub kind: AddressKind,
}

impl AddressConfig {
    fn to_api(&self) -> FmgAddress {
        let mut address = FmgAddress {
            name: self.name.clone(),
            address_type: self.kind.address_type().as_str().to_string(),
            comment: self.comment.clone(),
            associated_interface: self.associated_intf.clone(),
            ..Default::default()
        };
        match &self.kind {
            AddressKind::IpMask {
                subnet,
                allow_routing,
            } => {
                address.subnet = subnet.clone();
                address.allow_routing = allow_routing.as_str().to_string();
            }
            AddressKind::IpRange { start_ip, end_ip } => {
                address.start_ip = start_ip.clone();
                address.end_ip = end_ip.clone();
            }
            AddressKind::Fqdn { fqdn } => address.fqdn = fqdn.clone(),
        }
        address
    }

    fn from_api(address: FmgAddress, adom: &str) -> Result<Self, ApiError> {
        let address_type: AddressType = address.address_type.parse().map_err(|other| {
            ApiError::ParseError(format!("unsupported address type {:?}", other))
        })?;
        let kind = match address_type {
            AddressType::IpMask => AddressKind::IpMask {
                subnet: address.subnet,
                allow_routing: allow_routing(&address.allow_routing)?,
            },
            AddressType::IpRange => AddressKind::IpRange {
                start_ip: address.start_ip,
                end_ip: address.end_ip,
            },
            AddressType::Fqdn => AddressKind::Fqdn {
                fqdn: address.fqdn,
            },
        };
        Ok(Self {
            name: address.name,
            comment: address.comment,
            associated_intf: address.associated_interface,
            adom: adom.to_string(),
            kind,
        })
    }
}

/// `allow-routing` as reported by FortiManager. Absent means disabled.
fn allow_routing(value: &str) -> Result<Toggle, ApiError> {
    if value.is_empty() {
        return Ok(Toggle::Disable);
    }
    value
        .parse::<Toggle>()
        .map_err(|_| ApiError::ParseError(format!("unexpected allow-routing {:?}", value)))
}

/// Firewall address in a FortiManager ADOM. The name cannot change.
pub struct FmgFirewallObjectAddress {
    client: Arc<ManagerClient>,
}

#[async_trait]
impl RemoteResource for FmgFirewallObjectAddress {
    type Config = AddressConfig;
    const DISPLAY_NAME: &'static str = "FortiManager Firewall Object Address";

    fn presence(&self, _config: &AddressConfig) -> Presence {
        Presence::Managed
    }

    fn check_immutable(&self, prior: &AddressConfig, planned: &AddressConfig) -> Result<(), ResourceError> {
        check_name(&prior.name, &planned.name)
    }

    async fn create(&self, config: &AddressConfig) -> Result<String, ApiError> {
        self.client
            .firewall(adom_or_default(&config.adom))
            .addresses()
            .create(&config.to_api())
            .await?;
        Ok(config.name.clone())
    }

    async fn read(&self, id: &str, prior: &AddressConfig) -> Result<Option<AddressConfig>, ApiError> {
        let adom = adom_or_default(&prior.adom);
        self.client
            .firewall(adom)
            .addresses()
            .get(object_key(id, &prior.name))
            .await?
            .map(|address| AddressConfig::from_api(address, adom))
            .transpose()
    }

    async fn update(&self, _id: &str, config: &AddressConfig) -> Result<(), ApiError> {
        self.client
            .firewall(adom_or_default(&config.adom))
            .addresses()
            .update(&config.to_api())
            .await
    }

    async fn delete(&self, id: &str, config: &AddressConfig) -> Result<(), ApiError> {
        self.client
            .firewall(adom_or_default(&config.adom))
            .addresses()
            .delete(object_key(id, &config.name))
            .await
    }
}

impl ResourceKind for FmgFirewallObjectAddress {
    const TYPE_NAME: &'static str = "fortios_fmg_firewall_object_address";

    fn schema() -> Schema {
        SchemaBuilder::new()
            .version(0)
            .description("Firewall address object managed through FortiManager")
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .description("Address name. Changing it is rejected.")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("type", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(AddressType::IpMask.as_str()))
                    .validator(StringInSlice::create(AddressType::VALUES))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("comment", AttributeType::String)
                    .optional()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("fqdn", AttributeType::String)
                    .optional()
                    .description("Fully qualified domain name, for type fqdn")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("associated_intf", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string("any"))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("subnet", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(DEFAULT_SUBNET))
                    .description("Address and netmask, for type ipmask")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("start_ip", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(DEFAULT_START_IP))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("end_ip", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(DEFAULT_END_IP))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("allow_routing", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(Toggle::Disable.as_str()))
                    .validator(StringInSlice::create(Toggle::VALUES))
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("adom", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(DEFAULT_ADOM))
                    .build(),
            )
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<AddressConfig, ResourceError> {
        let kind = match enum_attr::<AddressType>(config, "type")?.unwrap_or(AddressType::IpMask) {
            AddressType::IpMask => AddressKind::IpMask {
                subnet: string_attr(config, "subnet")?,
                allow_routing: enum_attr(config, "allow_routing")?.unwrap_or(Toggle::Disable),
            },
            AddressType::IpRange => AddressKind::IpRange {
                start_ip: string_attr(config, "start_ip")?,
                end_ip: string_attr(config, "end_ip")?,
            },
            AddressType::Fqdn => AddressKind::Fqdn {
                fqdn: string_attr(config, "fqdn")?,
            },
        };
        Ok(AddressConfig {
            name: string_attr(config, "name")?,
            comment: string_attr(config, "comment")?,
            associated_intf: string_attr(config, "associated_intf")?,
            adom: string_attr(config, "adom")?,
            kind,
        })
    }

    fn check(config: &AddressConfig) -> Result<(), ResourceError> {
        match &config.kind {
            AddressKind::Fqdn { fqdn } if fqdn.is_empty() => {
                Err(ResourceError::validation("fqdn is required for fqdn addresses"))
            }
            _ => Ok(()),
        }
    }

    fn to_state(config: &AddressConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "name", &config.name)?;
        put_enum(state, "type", Some(config.kind.address_type()))?;
        put_string(state, "comment", &config.comment)?;
        put_string(state, "associated_intf", &config.associated_intf)?;
        put_string(state, "adom", &config.adom)?;
        match &config.kind {
            AddressKind::IpMask {
                subnet,
                allow_routing,
            } => {
                put_string(state, "subnet", subnet)?;
                put_enum(state, "allow_routing", Some(*allow_routing))
            }
            AddressKind::IpRange { start_ip, end_ip } => {
                put_string(state, "start_ip", start_ip)?;
                put_string(state, "end_ip", end_ip)
            }
            AddressKind::Fqdn { fqdn } => put_string(state, "fqdn", fqdn),
        }
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.manager_client()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::rpc_reply;
    use crate::resources::test_support::{
        create, delete, manager_resource, read, string, update, value,
    };
    use mockito::{Matcher, Server};
    use serde_json::json;

    const TABLE: &str = "/pm/config/adom/root/obj/firewall/address";

    #[test]
    fn only_the_selected_shape_is_sent() {
        let config = AddressConfig {
            name: "dns".to_string(),
            comment: String::new(),
            associated_intf: "any".to_string(),
            adom: "root".to_string(),
            kind: AddressKind::IpRange {
                start_ip: "10.0.0.1".to_string(),
                end_ip: "10.0.0.9".to_string(),
            },
        };

        let body = serde_json::to_value(config.to_api()).unwrap();

        assert_eq!(
            body,
            json!({
                "name": "dns",
                "type": "iprange",
                "associated-interface": "any",
                "start-ip": "10.0.0.1",
                "end-ip": "10.0.0.9"
            })
        );
    }

    #[test]
    fn type_selects_the_shape() {
        let config = FmgFirewallObjectAddress::from_config(&value(json!({
            "name": "example",
            "type": "fqdn",
            "fqdn": "example.com",
            "subnet": "10.0.0.0 255.0.0.0"
        })))
        .unwrap();

        assert_eq!(
            config.kind,
            AddressKind::Fqdn {
                fqdn: "example.com".to_string()
            }
        );
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = FmgFirewallObjectAddress::from_config(&value(json!({
            "name": "x",
            "type": "wildcard"
        })))
        .unwrap_err();

        assert!(err.to_string().contains("got wildcard"));
    }

    #[tokio::test]
    async fn create_applies_defaults_and_reads_back() {
        let mut server = Server::new_async().await;
        let add = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "add",
                "params": [{
                    "url": TABLE,
                    "data": {
                        "name": "lan",
                        "type": "ipmask",
                        "subnet": "10.1.0.0 255.255.0.0",
                        "allow-routing": "disable",
                        "associated-interface": "any"
                    }
                }]
            })))
            .with_body(rpc_reply(TABLE, 0, None))
            .create_async()
            .await;
        let _get = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({"method": "get"})))
            .with_body(rpc_reply(
                &format!("{}/lan", TABLE),
                0,
                Some(json!({
                    "name": "lan",
                    "type": "ipmask",
                    "subnet": ["10.1.0.0", "255.255.0.0"],
                    "allow-routing": "disable",
                    "associated-interface": ["any"],
                    "start-ip": "0.0.0.0",
                    "end-ip": "0.0.0.0"
                })),
            ))
            .create_async()
            .await;

        let resource = manager_resource::<FmgFirewallObjectAddress>(&server.url()).await;
        let response = create(&resource, json!({"name": "lan", "subnet": "10.1.0.0 255.255.0.0"})).await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        let state = response.new_state;
        assert_eq!(string(&state, "id"), "lan");
        assert_eq!(string(&state, "subnet"), "10.1.0.0 255.255.0.0");
        assert_eq!(string(&state, "adom"), "root");
        assert_eq!(string(&state, "end_ip"), DEFAULT_END_IP);
        add.assert_async().await;
    }

    #[tokio::test]
    async fn rename_is_rejected_without_remote_calls() {
        let mut server = Server::new_async().await;
        let rpc = server
            .mock("POST", "/jsonrpc")
            .expect(0)
            .create_async()
            .await;

        let resource = manager_resource::<FmgFirewallObjectAddress>(&server.url()).await;
        let prior = value(json!({"id": "web", "name": "web", "type": "fqdn", "fqdn": "a.example"}));
        let response = update(
            &resource,
            prior.clone(),
            json!({"name": "web2", "type": "fqdn", "fqdn": "a.example"}),
        )
        .await;

        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(
            response.diagnostics[0].detail,
            "the name argument is the key and should not be modified here"
        );
        assert_eq!(response.new_state, prior);
        rpc.assert_async().await;
    }

    #[tokio::test]
    async fn missing_address_leaves_state() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(&format!("{}/gone", TABLE), -3, None))
            .create_async()
            .await;

        let resource = manager_resource::<FmgFirewallObjectAddress>(&server.url()).await;
        let response = read(&resource, value(json!({"id": "gone", "name": "gone"}))).await;

        assert!(response.diagnostics.is_empty());
        assert!(response.new_state.is_none());
    }

    #[tokio::test]
    async fn delete_targets_the_configured_adom() {
        let mut server = Server::new_async().await;
        let del = server
            .mock("POST", "/jsonrpc")
            .match_body(Matcher::PartialJson(json!({
                "method": "delete",
                "params": [{"url": "/pm/config/adom/lab/obj/firewall/address/web"}]
            })))
            .with_body(rpc_reply("/pm/config/adom/lab/obj/firewall/address/web", 0, None))
            .create_async()
            .await;

        let resource = manager_resource::<FmgFirewallObjectAddress>(&server.url()).await;
        let response = delete(&resource, value(json!({"id": "web", "name": "web", "adom": "lab"}))).await;

        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        del.assert_async().await;
    }

    /// Prior state with every shape populated, then read back as `kind`
    async fn read_back_as(kind: &str) -> DynamicValue {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(
                &format!("{}/obj", TABLE),
                0,
                Some(json!({
                    "name": "obj",
                    "type": kind,
                    "fqdn": "new.example",
                    "subnet": ["10.2.0.0", "255.255.0.0"],
                    "start-ip": "10.2.0.1",
                    "end-ip": "10.2.0.9",
                    "allow-routing": "disable",
                    "associated-interface": ["any"]
                })),
            ))
            .create_async()
            .await;

        let resource = manager_resource::<FmgFirewallObjectAddress>(&server.url()).await;
        let prior = value(json!({
            "id": "obj",
            "name": "obj",
            "type": kind,
            "fqdn": "old.example",
            "associated_intf": "any",
            "subnet": "10.9.0.0 255.255.0.0",
            "start_ip": "10.9.0.1",
            "end_ip": "10.9.0.9",
            "allow_routing": "enable",
            "adom": "root"
        }));
        let response = read(&resource, prior).await;
        assert!(response.diagnostics.is_empty(), "{:?}", response.diagnostics);
        response.new_state.unwrap()
    }

    #[tokio::test]
    async fn fqdn_read_leaves_other_shapes_alone() {
        let state = read_back_as("fqdn").await;

        assert_eq!(string(&state, "type"), "fqdn");
        assert_eq!(string(&state, "fqdn"), "new.example");
        assert_eq!(string(&state, "subnet"), "10.9.0.0 255.255.0.0");
        assert_eq!(string(&state, "start_ip"), "10.9.0.1");
        assert_eq!(string(&state, "end_ip"), "10.9.0.9");
        assert_eq!(string(&state, "allow_routing"), "enable");
    }

    #[tokio::test]
    async fn ipmask_read_refreshes_subnet_and_routing_only() {
        let state = read_back_as("ipmask").await;

        assert_eq!(string(&state, "type"), "ipmask");
        assert_eq!(string(&state, "subnet"), "10.2.0.0 255.255.0.0");
        assert_eq!(string(&state, "allow_routing"), "disable");
        assert_eq!(string(&state, "fqdn"), "old.example");
        assert_eq!(string(&state, "start_ip"), "10.9.0.1");
        assert_eq!(string(&state, "end_ip"), "10.9.0.9");
    }

    #[tokio::test]
    async fn iprange_read_refreshes_the_range_only() {
        let state = read_back_as("iprange").await;

        assert_eq!(string(&state, "type"), "iprange");
        assert_eq!(string(&state, "start_ip"), "10.2.0.1");
        assert_eq!(string(&state, "end_ip"), "10.2.0.9");
        assert_eq!(string(&state, "fqdn"), "old.example");
        assert_eq!(string(&state, "subnet"), "10.9.0.0 255.255.0.0");
        assert_eq!(string(&state, "allow_routing"), "enable");
    }

    #[tokio::test]
    async fn unknown_allow_routing_fails_the_read() {
        let mut server = Server::new_async().await;
        let _get = server
            .mock("POST", "/jsonrpc")
            .with_body(rpc_reply(
                &format!("{}/lan", TABLE),
                0,
                Some(json!({"name": "lan", "type": "ipmask", "allow-routing": "maybe"})),
            ))
            .create_async()
            .await;

        let resource = manager_resource::<FmgFirewallObjectAddress>(&server.url()).await;
        let response = read(&resource, value(json!({"id": "lan", "name": "lan"}))).await;

        assert_eq!(response.diagnostics.len(), 1);
        assert!(response.diagnostics[0].detail.contains("unexpected allow-routing \"maybe\""));
    }

    #[test]
    fn absent_allow_routing_reads_as_disabled() {
        assert_eq!(allow_routing("").unwrap(), Toggle::Disable);
        assert_eq!(allow_routing("enable").unwrap(), Toggle::Enable);
        assert!(allow_routing("on").is_err());
    }
}
