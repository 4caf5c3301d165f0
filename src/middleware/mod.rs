//! Middleware module

pub mod ip_allow;

pub use ip_allow::IpAllowLayer;
