//! Provider data handed to every resource after the provider is configured

use crate::api::{Client, ManagerClient};
use crate::resources::ResourceError;
use std::sync::Arc;

/// Clients for the device families configured in the provider block.
/// Either one may be missing.
#[derive(Clone, Default)]
pub struct FortiosProviderData {
    pub fortios: Option<Arc<Client>>,
    pub fortimanager: Option<Arc<ManagerClient>>,
}

impl FortiosProviderData {
    pub fn new(fortios: Option<Client>, fortimanager: Option<ManagerClient>) -> Self {
        Self {
            fortios: fortios.map(Arc::new),
            fortimanager: fortimanager.map(Arc::new),
        }
    }

    pub fn fortios_client(&self) -> Result<Arc<Client>, ResourceError> {
        self.fortios
            .clone()
            .ok_or(ResourceError::NotConfigured { device: "FortiOS" })
    }

    pub fn manager_client(&self) -> Result<Arc<ManagerClient>, ResourceError> {
        self.fortimanager
            .clone()
            .ok_or(ResourceError::NotConfigured {
                device: "FortiManager",
            })
    }
}
