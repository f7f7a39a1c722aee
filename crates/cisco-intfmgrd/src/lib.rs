//! Interface reconciliation for Cisco IOS devices.
//!
//! intfmgrd brings one interface from its observed property set to a
//! desired one by sending IOS configuration commands:
//! - [`diff`](mod@diff): which properties changed, in IOS application order
//! - [`render`](mod@render): the command line(s) for each change, including alternative
//!   syntaxes for different IOS families
//! - [`interface`]: the configuration-mode session that sends them and
//!   detects rejected commands
//!
//! # Example
//!
//! ```ignore
//! use cisco_intfmgrd::{property_set, Interface, Property};
//! use netdev_cfgmgr_common::TracingErrorSink;
//!
//! let current = property_set! { Property::Duplex => "half", Property::Speed => "10" };
//! let desired = property_set! { Property::Duplex => "auto", Property::Speed => "auto" };
//!
//! let mut intf = Interface::new("FastEthernet0/1", &mut channel, &TracingErrorSink);
//! let report = intf.update(&current, &desired).await?;
//! ```

pub mod diff;
pub mod interface;
pub mod property;
pub mod render;
pub mod request;

pub use diff::{diff, Change, ChangeSet};
pub use interface::{ChangeOutcome, Interface, SessionState, UpdateReport};
pub use property::{
    AddressEntry, CommandSpec, CommandSyntax, Property, PropertySet, PropertyValue, COMMAND_TABLE,
};
pub use render::{render, render_prefixed, Rendering, NEGATION_PREFIX};
pub use request::InterfaceRequest;
