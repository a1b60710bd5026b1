pub mod vip;

use crate::api::Client;

/// Firewall object operations on a FortiOS device
pub struct FirewallApi<'a> {
    client: &'a Client,
}

impl<'a> FirewallApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Virtual IP operations
    pub fn vips(&self) -> vip::VipsApi<'a> {
        vip::VipsApi::new(self.client)
    }
}
