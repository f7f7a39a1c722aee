//! Interface properties and the IOS command table.
//!
//! The table is indexed by [`Property`] and records, for every property,
//! the rank at which it must be applied and the CLI syntax it renders to.
//! IOS accepts some settings only relative to others (duplex depends on the
//! configured speed, trunk settings on the encapsulation), so changes are
//! always applied in ascending rank.

use std::collections::HashMap;
use std::fmt;

use netdev_types::IpAddress;
use serde::{Deserialize, Deserializer, Serialize};

/// A configurable interface property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Description,
    Speed,
    Duplex,
    NativeVlan,
    Encapsulation,
    Mode,
    AllowedTrunkVlans,
    Etherchannel,
    Ipaddress,
}

impl Property {
    /// Every known property, in declaration order (the table index).
    pub const ALL: [Property; 9] = [
        Property::Description,
        Property::Speed,
        Property::Duplex,
        Property::NativeVlan,
        Property::Encapsulation,
        Property::Mode,
        Property::AllowedTrunkVlans,
        Property::Etherchannel,
        Property::Ipaddress,
    ];

    /// Returns the property name as used in property files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Description => "description",
            Property::Speed => "speed",
            Property::Duplex => "duplex",
            Property::NativeVlan => "native_vlan",
            Property::Encapsulation => "encapsulation",
            Property::Mode => "mode",
            Property::AllowedTrunkVlans => "allowed_trunk_vlans",
            Property::Etherchannel => "etherchannel",
            Property::Ipaddress => "ipaddress",
        }
    }

    /// Returns this property's entry in [`COMMAND_TABLE`].
    pub fn spec(self) -> &'static CommandSpec {
        &COMMAND_TABLE[self as usize]
    }

    /// Application rank; lower ranks are configured first.
    pub fn rank(self) -> u8 {
        self.spec().rank
    }

    /// Every known property, sorted by application rank.
    pub fn priority_order() -> Vec<Property> {
        let mut order = Property::ALL.to_vec();
        order.sort_by_key(|p| p.rank());
        order
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a property is expressed on the IOS command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSyntax {
    /// `<keyword> <value>`.
    Keyword(&'static str),
    /// Several keywords with the same effect on different IOS families;
    /// the first one the device accepts wins.
    Alternatives(&'static [&'static str]),
    /// One `ip address` / `ipv6 address` command per address entry.
    Address,
}

/// One row of the command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub property: Property,
    pub rank: u8,
    pub syntax: CommandSyntax,
}

/// Command table, indexed by `Property as usize`.
pub const COMMAND_TABLE: [CommandSpec; 9] = [
    CommandSpec {
        property: Property::Description,
        rank: 1,
        syntax: CommandSyntax::Keyword("description"),
    },
    CommandSpec {
        property: Property::Speed,
        rank: 2,
        syntax: CommandSyntax::Keyword("speed"),
    },
    // auto duplex negotiation depends on the configured speed
    CommandSpec {
        property: Property::Duplex,
        rank: 3,
        syntax: CommandSyntax::Keyword("duplex"),
    },
    CommandSpec {
        property: Property::NativeVlan,
        rank: 4,
        syntax: CommandSyntax::Keyword("switchport access vlan"),
    },
    // trunk mode is refused until the encapsulation is set
    CommandSpec {
        property: Property::Encapsulation,
        rank: 5,
        syntax: CommandSyntax::Keyword("switchport trunk encapsulation"),
    },
    CommandSpec {
        property: Property::Mode,
        rank: 6,
        syntax: CommandSyntax::Keyword("switchport mode"),
    },
    CommandSpec {
        property: Property::AllowedTrunkVlans,
        rank: 7,
        syntax: CommandSyntax::Keyword("switchport trunk allowed vlan"),
    },
    CommandSpec {
        property: Property::Etherchannel,
        rank: 8,
        syntax: CommandSyntax::Alternatives(&["channel-group", "port group"]),
    },
    CommandSpec {
        property: Property::Ipaddress,
        rank: 9,
        syntax: CommandSyntax::Address,
    },
];

/// One interface address: prefix length, address and an optional trailing
/// qualifier such as `link-local` or `eui-64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressEntry {
    pub prefix_length: u8,
    pub address: IpAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifier: Option<String>,
}

impl AddressEntry {
    pub fn new(prefix_length: u8, address: IpAddress) -> Self {
        Self {
            prefix_length,
            address,
            qualifier: None,
        }
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }
}

impl fmt::Display for AddressEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)?;
        if let Some(q) = &self.qualifier {
            write!(f, " {}", q)?;
        }
        Ok(())
    }
}

/// Value of an interface property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// Explicitly absent; in a desired set this requests removal.
    Absent,
    /// Plain value or enumerated symbol (`auto`, `half`, `trunk`, ...).
    Text(String),
    /// Interface addresses.
    Addresses(Vec<AddressEntry>),
}

impl PropertyValue {
    pub fn text(value: impl Into<String>) -> Self {
        PropertyValue::Text(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, PropertyValue::Absent)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Absent => f.write_str("absent"),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Addresses(entries) => {
                let parts: Vec<String> = entries.iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Text(value)
    }
}

impl From<Vec<AddressEntry>> for PropertyValue {
    fn from(entries: Vec<AddressEntry>) -> Self {
        PropertyValue::Addresses(entries)
    }
}

/// Property files write speeds and VLAN ids as bare numbers; any YAML
/// scalar is carried through as its text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Absent,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Addresses(Vec<AddressEntry>),
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Absent => PropertyValue::Absent,
            RawValue::Text(s) => PropertyValue::Text(s),
            RawValue::Integer(n) => PropertyValue::Text(n.to_string()),
            RawValue::Float(n) => PropertyValue::Text(n.to_string()),
            RawValue::Bool(b) => PropertyValue::Text(b.to_string()),
            RawValue::Addresses(entries) => PropertyValue::Addresses(entries),
        })
    }
}

/// Property name → value mapping describing one interface.
pub type PropertySet = HashMap<Property, PropertyValue>;

/// Builds a [`PropertySet`] from property-value pairs.
#[macro_export]
macro_rules! property_set {
    ($($property:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut set = $crate::PropertySet::new();
        $(set.insert($property, $crate::PropertyValue::from($value));)*
        set
    }};
}
