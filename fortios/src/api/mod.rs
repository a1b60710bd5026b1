//! Clients for the FortiOS REST API and the FortiManager JSON-RPC API

pub mod client;
pub mod common;
pub mod error;
pub mod firewall;
pub mod manager;
pub mod pool;
pub mod system;
pub mod test_helpers;

pub use client::{Client, RetryConfig};
pub use error::ApiError;
pub use manager::ManagerClient;
