pub mod global;
pub mod interface;
pub mod ntp;

use crate::api::Client;

/// System and networking operations on a FortiOS device
pub struct SystemApi<'a> {
    client: &'a Client,
}

impl<'a> SystemApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub fn interfaces(&self) -> interface::InterfacesApi<'a> {
        interface::InterfacesApi::new(self.client)
    }

    /// The `system/global` singleton
    pub fn global(&self) -> global::GlobalApi<'a> {
        global::GlobalApi::new(self.client)
    }

    /// The `system/ntp` singleton
    pub fn ntp(&self) -> ntp::NtpApi<'a> {
        ntp::NtpApi::new(self.client)
    }
}
