pub mod enums;
pub mod firewall;
pub mod managed;
pub mod manager;
pub mod reconcile;
pub mod system;

#[cfg(test)]
pub(crate) mod test_support;

pub use managed::{ManagedResource, ResourceKind};
pub use reconcile::{Operation, Presence, Reconciler, RemoteResource, ResourceError, Tracked};

/// Default `comment` / `description` of objects created on FortiOS
pub const DEFAULT_COMMENT: &str = "Created by Terraform Provider for FortiOS";
