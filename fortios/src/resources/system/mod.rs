pub mod global;
pub mod interface;
pub mod ntp;

pub use global::SystemSettingGlobal;
pub use interface::NetworkingInterfacePort;
pub use ntp::SystemSettingNtp;
