//! Prefix and mask arithmetic.
//!
//! Cisco IOS takes IPv4 interface addresses as `address mask` while IPv6
//! uses `address/len`, so the renderer needs to turn a prefix length into
//! a dotted mask.

use std::net::{Ipv4Addr, Ipv6Addr};

use crate::{IpAddress, IpPrefix};

/// Returns the netmask of `prefix` in its own address family.
///
/// # Example
///
/// ```
/// use netdev_types::{ipcalc, IpPrefix};
///
/// let prefix = IpPrefix::new("192.168.0.1".parse().unwrap(), 24).unwrap();
/// assert_eq!(ipcalc::prefix_netmask(&prefix).to_string(), "255.255.255.0");
/// ```
pub fn prefix_netmask(prefix: &IpPrefix) -> IpAddress {
    let len = u32::from(prefix.prefix_len());
    match prefix.address() {
        IpAddress::V4(_) => {
            let bits = u32::MAX.checked_shl(32 - len).unwrap_or(0);
            IpAddress::V4(Ipv4Addr::from(bits))
        }
        IpAddress::V6(_) => {
            let bits = u128::MAX.checked_shl(128 - len).unwrap_or(0);
            IpAddress::V6(Ipv6Addr::from(bits))
        }
    }
}
