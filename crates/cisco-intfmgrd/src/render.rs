//! Rendering of property changes into IOS command lines.
//!
//! Rendering is pure: it looks the property up in the
//! [`COMMAND_TABLE`](crate::property::COMMAND_TABLE) and formats the value,
//! it never talks to the device.

use netdev_cfgmgr_common::{CfgMgrError, CfgMgrResult};
use netdev_types::{ipcalc, IpPrefix};

use crate::diff::Change;
use crate::property::{AddressEntry, CommandSyntax, Property, PropertyValue};

/// Token prepended verbatim to negate a command.
pub const NEGATION_PREFIX: &str = "no ";

/// Command lines for one property change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendering {
    /// A single command.
    Single(String),
    /// Equivalent commands for different IOS families; send in order and
    /// stop at the first one the device accepts.
    FirstOf(Vec<String>),
    /// Independent commands that must all be sent.
    Each(Vec<String>),
}

impl Rendering {
    /// All command lines, in send order.
    pub fn commands(&self) -> &[String] {
        match self {
            Rendering::Single(cmd) => std::slice::from_ref(cmd),
            Rendering::FirstOf(cmds) | Rendering::Each(cmds) => cmds,
        }
    }
}

/// Renders a change, negating it when it is a removal.
pub fn render_change(change: &Change) -> CfgMgrResult<Rendering> {
    render(change.property, &change.value, change.removed)
}

/// Renders `property = value`, or its negation when `removed` is set.
pub fn render(property: Property, value: &PropertyValue, removed: bool) -> CfgMgrResult<Rendering> {
    let prefix = if removed { NEGATION_PREFIX } else { "" };
    render_prefixed(property, value, prefix)
}

/// Renders `property = value` with `prefix` prepended to every command.
///
/// # Errors
///
/// Returns [`CfgMgrError::Render`] when the value does not fit the
/// property's syntax (an address list for a keyword property, text for
/// `ipaddress`, an explicit absent marker) and [`CfgMgrError::Address`]
/// when an address entry carries an impossible prefix length.
pub fn render_prefixed(
    property: Property,
    value: &PropertyValue,
    prefix: &str,
) -> CfgMgrResult<Rendering> {
    match (property.spec().syntax, value) {
        (CommandSyntax::Keyword(keyword), PropertyValue::Text(v)) => {
            Ok(Rendering::Single(format!("{}{} {}", prefix, keyword, v)))
        }
        (CommandSyntax::Alternatives(keywords), PropertyValue::Text(v)) => Ok(Rendering::FirstOf(
            keywords
                .iter()
                .map(|keyword| format!("{}{} {}", prefix, keyword, v))
                .collect(),
        )),
        (CommandSyntax::Address, PropertyValue::Addresses(entries)) => {
            if entries.is_empty() {
                return Err(CfgMgrError::render(property.as_str(), "empty address list"));
            }
            let cmds = entries
                .iter()
                .map(|entry| address_command(entry).map(|cmd| format!("{}{}", prefix, cmd)))
                .collect::<CfgMgrResult<Vec<_>>>()?;
            Ok(Rendering::Each(cmds))
        }
        (CommandSyntax::Address, _) => Err(CfgMgrError::render(
            property.as_str(),
            format!("expected an address list, got '{}'", value),
        )),
        (_, _) => Err(CfgMgrError::render(
            property.as_str(),
            format!("expected a plain value, got '{}'", value),
        )),
    }
}

/// `ip address <addr> <mask>` for IPv4, `ipv6 address <addr>/<len>[ <qualifier>]`
/// for IPv6.
pub fn address_command(entry: &AddressEntry) -> CfgMgrResult<String> {
    let prefix = IpPrefix::new(entry.address, entry.prefix_length)?;

    let cmd = if prefix.is_ipv4() {
        format!(
            "ip address {} {}",
            entry.address,
            ipcalc::prefix_netmask(&prefix)
        )
    } else {
        match &entry.qualifier {
            Some(qualifier) => format!("ipv6 address {} {}", prefix, qualifier),
            None => format!("ipv6 address {}", prefix),
        }
    };
    Ok(cmd)
}
