//! Resource kinds backed by FortiManager

pub mod address;
pub mod dns;
pub mod global;
pub mod ippool;
pub mod script;

pub use address::FmgFirewallObjectAddress;
pub use dns::FmgSystemDns;
pub use global::FmgSystemGlobal;
pub use ippool::FmgFirewallObjectIppool;
pub use script::FmgDevicemanagerScript;

use crate::api::ApiError;
use crate::resources::enums::StringEnum;
use crate::resources::ResourceError;

pub const DEFAULT_ADOM: &str = "root";

/// ADOM an object lives in. Imported state carries none.
pub(crate) fn adom_or_default(adom: &str) -> &str {
    if adom.is_empty() {
        DEFAULT_ADOM
    } else {
        adom
    }
}

/// Key an object is read by: its configured name, else the identifier
pub(crate) fn object_key<'a>(id: &'a str, name: &'a str) -> &'a str {
    if name.is_empty() {
        id
    } else {
        name
    }
}

pub(crate) fn check_name(prior: &str, planned: &str) -> Result<(), ResourceError> {
    if prior != planned {
        return Err(ResourceError::ImmutableField { field: "name" });
    }
    Ok(())
}

/// Remote text, kept only where the local configuration has a value
pub(crate) fn refreshed_text(local: &str, remote: String) -> String {
    if local.is_empty() {
        String::new()
    } else {
        remote
    }
}

/// Remote enum value, parsed only where the local configuration has one
pub(crate) fn refreshed_enum<T: StringEnum>(
    local: &Option<T>,
    field: &str,
    remote: &str,
) -> Result<Option<T>, ApiError> {
    if local.is_none() || remote.is_empty() {
        return Ok(None);
    }
    remote
        .parse()
        .map(Some)
        .map_err(|_| ApiError::ParseError(format!("unexpected {} {:?}", field, remote)))
}
