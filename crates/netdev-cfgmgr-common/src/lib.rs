//! Common infrastructure for CLI-driven network device configuration.
//!
//! This crate provides shared functionality for configuration managers that
//! drive a device through its command-line interface:
//!
//! - [`channel`]: the [`CommandChannel`] transport capability, the
//!   [`ErrorSink`] reporting capability and rejection-marker detection
//! - [`error`]: Error types for cfgmgr operations
//!
//! # Architecture
//!
//! Configuration managers follow this pattern:
//!
//! 1. Compare the observed and desired property sets of an entity
//! 2. Render each change into one or more CLI lines
//! 3. Send the lines through a [`CommandChannel`], inside the device's
//!    configuration-mode bracket
//! 4. Scan every reply for the device's rejection marker and report
//!    refused commands through an [`ErrorSink`]

pub mod channel;
pub mod error;

// Re-export commonly used items at crate root
pub use channel::{
    is_rejection, CommandChannel, DryRunChannel, ErrorSink, LineCallback, ResponseScan,
    TracingErrorSink,
};
pub use error::{CfgMgrError, CfgMgrResult};
