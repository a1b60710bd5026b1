pub mod vip;

pub use vip::FirewallObjectVip;
