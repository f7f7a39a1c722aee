//! Test fixtures for CLI device interactions
//!
//! Provides a scripted stand-in for a device session and a collecting
//! error sink.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use netdev_cfgmgr_common::{CfgMgrError, CfgMgrResult, CommandChannel, ErrorSink, LineCallback};

/// Common IOS responses
pub mod responses {
    /// Command not known to this IOS family
    pub const INVALID_COMMAND: &str = "% Invalid command";

    /// Parser error with caret marker
    pub const INVALID_INPUT: &str = "% Invalid input detected at '^' marker.";

    /// Command missing arguments
    pub const INCOMPLETE_COMMAND: &str = "% Incomplete command.";

    /// Interface configuration prompt
    pub const INTERFACE_PROMPT: &str = "Switch(config-if)#";
}

/// Commands that make up the configuration-mode bracket
pub fn is_bracket_command(cmd: &str) -> bool {
    cmd == "conf t" || cmd == "exit" || cmd.starts_with("interface ")
}

/// Scripted device channel
///
/// Records every command and answers with the lines scripted for it (no
/// lines by default). Commands registered with [`fail_on`](Self::fail_on)
/// return a transport error instead.
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    replies: HashMap<String, Vec<String>>,
    failures: HashMap<String, String>,
    default_reply: Vec<String>,
    sent: Vec<String>,
}

impl ScriptedChannel {
    /// Create a channel that accepts everything silently
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response lines for a command
    pub fn reply(mut self, command: impl Into<String>, lines: &[&str]) -> Self {
        self.replies.insert(
            command.into(),
            lines.iter().map(|l| l.to_string()).collect(),
        );
        self
    }

    /// Response lines for commands without a scripted reply
    pub fn with_default_reply(mut self, lines: &[&str]) -> Self {
        self.default_reply = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    /// Make a command fail at the transport level
    pub fn fail_on(mut self, command: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(command.into(), message.into());
        self
    }

    /// All commands sent, in order
    pub fn sent(&self) -> &[String] {
        &self.sent
    }

    /// Sent commands without the configuration-mode bracket
    pub fn property_commands(&self) -> Vec<String> {
        self.sent
            .iter()
            .filter(|cmd| !is_bracket_command(cmd))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CommandChannel for ScriptedChannel {
    async fn command(&mut self, text: &str, on_line: &mut LineCallback<'_>) -> CfgMgrResult<()> {
        tracing::trace!(command = %text, "scripted command");
        self.sent.push(text.to_string());

        if let Some(message) = self.failures.get(text) {
            return Err(CfgMgrError::transport(text, message.clone()));
        }

        let lines = self.replies.get(text).unwrap_or(&self.default_reply);
        for line in lines {
            on_line(line);
        }
        Ok(())
    }
}

/// Error sink that keeps every report
#[derive(Debug, Default)]
pub struct CollectingErrorSink {
    reports: Mutex<Vec<String>>,
}

impl CollectingErrorSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports received so far
    pub fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of reports
    pub fn count(&self) -> usize {
        self.reports().len()
    }

    /// True if nothing was reported
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

impl ErrorSink for CollectingErrorSink {
    fn report(&self, message: &str) {
        self.reports
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
    }
}
