//! `fortios_networking_interface_port`
//!
//! Physical ports always exist on the device. Creating one only reconfigures
//! it and destroying one leaves it in place.

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tfplug::defaults::StaticDefault;
use tfplug::schema::{Attribute, AttributeBuilder, AttributeType, Schema, SchemaBuilder};
use tfplug::types::DynamicValue;

use crate::api::system::interface::SystemInterface;
use crate::api::{ApiError, Client};
use crate::provider_data::FortiosProviderData;
use crate::resources::managed::{put_computed, put_string, string_attr, ResourceKind};
use crate::resources::{Presence, RemoteResource, ResourceError, DEFAULT_COMMENT};

const DEFAULT_VDOM: &str = "root";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortType {
    Physical,
    Vlan,
    Loopback,
    /// Any other interface type FortiOS knows (aggregate, tunnel, ...)
    Other(String),
}

impl PortType {
    pub fn parse(value: &str) -> Self {
        match value {
            "physical" => PortType::Physical,
            "vlan" => PortType::Vlan,
            "loopback" => PortType::Loopback,
            other => PortType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PortType::Physical => "physical",
            PortType::Vlan => "vlan",
            PortType::Loopback => "loopback",
            PortType::Other(other) => other,
        }
    }
}

impl Default for PortType {
    fn default() -> Self {
        PortType::Other(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceConfig {
    pub name: String,
    pub port_type: PortType,
    pub ip: String,
    pub alias: String,
    pub status: String,
    pub device_identification: String,
    pub tcp_mss: String,
    pub speed: String,
    pub mtu_override: String,
    pub mtu: String,
    pub role: String,
    pub allowaccess: String,
    pub mode: String,
    pub dns_server_override: String,
    pub defaultgw: String,
    pub distance: String,
    pub description: String,
    pub interface: String,
    pub vdom: String,
    pub vlanid: String,
}

impl InterfaceConfig {
    fn to_api(&self) -> SystemInterface {
        SystemInterface {
            name: self.name.clone(),
            port_type: self.port_type.as_str().to_string(),
            ip: self.ip.clone(),
            alias: self.alias.clone(),
            status: self.status.clone(),
            device_identification: self.device_identification.clone(),
            tcp_mss: self.tcp_mss.clone(),
            speed: self.speed.clone(),
            mtu_override: self.mtu_override.clone(),
            mtu: self.mtu.clone(),
            role: self.role.clone(),
            allowaccess: self.allowaccess.clone(),
            mode: self.mode.clone(),
            dns_server_override: self.dns_server_override.clone(),
            defaultgw: self.defaultgw.clone(),
            distance: self.distance.clone(),
            description: self.description.clone(),
            interface: self.interface.clone(),
            vdom: self.vdom.clone(),
            vlanid: self.vlanid.clone(),
        }
    }

    /// `local_ip` decides whether the address is rendered in CIDR notation
    fn from_api(port: SystemInterface, local_ip: &str) -> Self {
        Self {
            ip: match_ip_notation(local_ip, &port.ip),
            port_type: PortType::parse(&port.port_type),
            name: port.name,
            alias: port.alias,
            status: port.status,
            device_identification: port.device_identification,
            tcp_mss: port.tcp_mss,
            speed: port.speed,
            mtu_override: port.mtu_override,
            mtu: port.mtu,
            role: port.role,
            allowaccess: port.allowaccess,
            mode: port.mode,
            dns_server_override: port.dns_server_override,
            defaultgw: port.defaultgw,
            distance: port.distance,
            description: port.description,
            interface: port.interface,
            vdom: port.vdom,
            vlanid: port.vlanid,
        }
    }
}

/// Renders `a.b.c.d m.m.m.m` as `a.b.c.d/len` when the local value uses CIDR.
/// Anything that does not parse is returned as the device sent it.
fn match_ip_notation(local: &str, remote: &str) -> String {
    if !local.contains('/') {
        return remote.to_string();
    }

    let mut parts = remote.split_whitespace();
    match (
        parts.next().map(str::parse::<Ipv4Addr>),
        parts.next().map(str::parse::<Ipv4Addr>),
        parts.next(),
    ) {
        (Some(Ok(addr)), Some(Ok(mask)), None) => {
            format!("{}/{}", addr, u32::from(mask).count_ones())
        }
        _ => remote.to_string(),
    }
}

pub struct NetworkingInterfacePort {
    client: Arc<Client>,
}

#[async_trait]
impl RemoteResource for NetworkingInterfacePort {
    type Config = InterfaceConfig;
    const DISPLAY_NAME: &'static str = "Networking Interface Port";

    fn presence(&self, config: &InterfaceConfig) -> Presence {
        match config.port_type {
            PortType::Physical => Presence::Fixed {
                key: config.name.clone(),
            },
            _ => Presence::Managed,
        }
    }

    fn identifier(&self, id: &str, config: &InterfaceConfig) -> String {
        if config.name.is_empty() {
            id.to_string()
        } else {
            config.name.clone()
        }
    }

    async fn create(&self, config: &InterfaceConfig) -> Result<String, ApiError> {
        self.client
            .system()
            .interfaces()
            .create(&config.to_api())
            .await
    }

    async fn read(&self, id: &str, prior: &InterfaceConfig) -> Result<Option<InterfaceConfig>, ApiError> {
        Ok(self
            .client
            .system()
            .interfaces()
            .get(if prior.name.is_empty() { id } else { prior.name.as_str() })
            .await?
            .map(|port| InterfaceConfig::from_api(port, &prior.ip)))
    }

    async fn update(&self, id: &str, config: &InterfaceConfig) -> Result<(), ApiError> {
        let mut port = config.to_api();
        if config.port_type == PortType::Physical {
            if port.name.is_empty() {
                port.name = id.to_string();
            }
            if port.vdom.is_empty() {
                port.vdom = DEFAULT_VDOM.to_string();
            }
        }
        self.client.system().interfaces().update(id, &port).await
    }

    async fn delete(&self, id: &str, _config: &InterfaceConfig) -> Result<(), ApiError> {
        self.client.system().interfaces().delete(id).await
    }
}

const OPTIONAL_COMPUTED: &[&str] = &[
    "ip",
    "alias",
    "status",
    "device_identification",
    "tcp_mss",
    "speed",
    "mtu_override",
    "mtu",
    "role",
    "allowaccess",
    "mode",
    "dns_server_override",
    "defaultgw",
    "distance",
    "interface",
    "vdom",
    "vlanid",
];

fn optional_computed(name: &str) -> Attribute {
    AttributeBuilder::new(name, AttributeType::String)
        .optional()
        .computed()
        .build()
}

impl ResourceKind for NetworkingInterfacePort {
    const TYPE_NAME: &'static str = "fortios_networking_interface_port";

    fn schema() -> Schema {
        let builder = SchemaBuilder::new()
            .version(0)
            .description("Network interface on a FortiOS device")
            .attribute(AttributeBuilder::new("id", AttributeType::String).computed().build())
            .attribute(
                AttributeBuilder::new("name", AttributeType::String)
                    .required()
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("type", AttributeType::String)
                    .required()
                    .description("physical, vlan, loopback, ...")
                    .build(),
            )
            .attribute(
                AttributeBuilder::new("description", AttributeType::String)
                    .optional()
                    .default(StaticDefault::string(DEFAULT_COMMENT))
                    .build(),
            );

        OPTIONAL_COMPUTED
            .iter()
            .fold(builder, |builder, name| builder.attribute(optional_computed(name)))
            .build()
    }

    fn from_config(config: &DynamicValue) -> Result<InterfaceConfig, ResourceError> {
        Ok(InterfaceConfig {
            name: string_attr(config, "name")?,
            port_type: PortType::parse(&string_attr(config, "type")?),
            ip: string_attr(config, "ip")?,
            alias: string_attr(config, "alias")?,
            status: string_attr(config, "status")?,
            device_identification: string_attr(config, "device_identification")?,
            tcp_mss: string_attr(config, "tcp_mss")?,
            speed: string_attr(config, "speed")?,
            mtu_override: string_attr(config, "mtu_override")?,
            mtu: string_attr(config, "mtu")?,
            role: string_attr(config, "role")?,
            allowaccess: string_attr(config, "allowaccess")?,
            mode: string_attr(config, "mode")?,
            dns_server_override: string_attr(config, "dns_server_override")?,
            defaultgw: string_attr(config, "defaultgw")?,
            distance: string_attr(config, "distance")?,
            description: string_attr(config, "description")?,
            interface: string_attr(config, "interface")?,
            vdom: string_attr(config, "vdom")?,
            vlanid: string_attr(config, "vlanid")?,
        })
    }

    fn check(config: &InterfaceConfig) -> Result<(), ResourceError> {
        if config.port_type == PortType::Vlan {
            if config.vlanid.is_empty() {
                return Err(ResourceError::validation("vlanid is required for vlan interfaces"));
            }
            if config.interface.is_empty() {
                return Err(ResourceError::validation("interface is required for vlan interfaces"));
            }
        }
        Ok(())
    }

    fn to_state(config: &InterfaceConfig, state: &mut DynamicValue) -> tfplug::Result<()> {
        put_string(state, "name", &config.name)?;
        put_string(state, "type", config.port_type.as_str())?;
        put_computed(state, "ip", &config.ip)?;
        put_computed(state, "alias", &config.alias)?;
        put_computed(state, "status", &config.status)?;
        put_computed(state, "device_identification", &config.device_identification)?;
        put_computed(state, "tcp_mss", &config.tcp_mss)?;
        put_computed(state, "speed", &config.speed)?;
        put_computed(state, "mtu_override", &config.mtu_override)?;
        put_computed(state, "mtu", &config.mtu)?;
        put_computed(state, "role", &config.role)?;
        put_computed(state, "allowaccess", &config.allowaccess)?;
        put_computed(state, "mode", &config.mode)?;
        put_computed(state, "dns_server_override", &config.dns_server_override)?;
        put_computed(state, "defaultgw", &config.defaultgw)?;
        put_computed(state, "distance", &config.distance)?;
        put_string(state, "description", &config.description)?;
        put_computed(state, "interface", &config.interface)?;
        put_computed(state, "vdom", &config.vdom)?;
        put_computed(state, "vlanid", &config.vlanid)
    }

    fn from_provider_data(data: &FortiosProviderData) -> Result<Self, ResourceError> {
        Ok(Self {
            client: data.fortios_client()?,
        })
    }
}
