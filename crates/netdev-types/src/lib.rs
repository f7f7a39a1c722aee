//! Common types for network device configuration.
//!
//! - [`IpAddress`]: IPv4 and IPv6 addresses as they appear in device CLIs
//! - [`IpPrefix`]: an address paired with a validated prefix length
//! - [`ipcalc`]: mask arithmetic used when rendering address commands

pub mod ipcalc;
mod ip;

pub use ip::{IpAddress, IpPrefix};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),
}
