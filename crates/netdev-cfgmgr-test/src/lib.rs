//! Test infrastructure for CLI-driven configuration managers
//!
//! Provides:
//! - A scripted device channel that records commands and replays canned
//!   responses
//! - An error sink that collects reports for assertions
//! - Common device response fixtures
//! - Transcript verification helpers

pub mod fixtures;
mod verification;

pub use fixtures::{CollectingErrorSink, ScriptedChannel};
pub use verification::*;
