//! Command transport capabilities for CLI-driven devices.
//!
//! A [`CommandChannel`] sends one CLI line to the device and streams the
//! device's reply back line by line. Devices in the IOS family signal a
//! rejected command with a reply line starting with `"% "`, which
//! [`ResponseScan`] recognises as soon as it appears.
//!
//! # Example
//!
//! ```ignore
//! use netdev_cfgmgr_common::channel::{CommandChannel, ResponseScan};
//!
//! let mut scan = ResponseScan::new();
//! channel.command("speed auto", &mut |line| scan.observe(line)).await?;
//! if let Some(line) = scan.rejection() {
//!     eprintln!("device refused: {}", line);
//! }
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::CfgMgrResult;

/// Regex for a device rejection line.
/// Matches a `"% "` marker at the start of any line of the payload.
static REJECTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^% ").expect("Invalid regex pattern"));

/// Per-line response callback handed to a [`CommandChannel`].
pub type LineCallback<'a> = dyn FnMut(&str) + Send + 'a;

/// Transport capable of sending one command and streaming its response.
///
/// Implementations must invoke `on_line` for every response line, in
/// order, and must not return until the device has finished responding to
/// `text`. Connection-level failures are returned as
/// [`CfgMgrError::Transport`](crate::CfgMgrError::Transport).
#[async_trait]
pub trait CommandChannel: Send {
    /// Sends `text` and feeds every response line to `on_line`.
    async fn command(&mut self, text: &str, on_line: &mut LineCallback<'_>) -> CfgMgrResult<()>;
}

/// Sink for human-readable failure reports.
pub trait ErrorSink: Send + Sync {
    /// Reports a failure.
    fn report(&self, message: &str);
}

/// [`ErrorSink`] that emits each report as a `tracing` error event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn report(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

/// Returns true if `line` is a device rejection line.
pub fn is_rejection(line: &str) -> bool {
    REJECTION_RE.is_match(line)
}

/// Streaming scan of a command response for the rejection marker.
///
/// The first rejecting line is kept; anything the device prints after it
/// does not change the outcome.
#[derive(Debug, Clone, Default)]
pub struct ResponseScan {
    rejection: Option<String>,
    lines: usize,
}

impl ResponseScan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one callback payload. Payloads carrying several lines are
    /// scanned line by line.
    pub fn observe(&mut self, payload: &str) {
        self.lines += 1;
        if self.rejection.is_some() {
            return;
        }
        if let Some(line) = payload.lines().find(|l| is_rejection(l)) {
            self.rejection = Some(line.to_string());
        }
    }

    /// The first rejecting line, if the device refused the command.
    pub fn rejection(&self) -> Option<&str> {
        self.rejection.as_deref()
    }

    /// True if no rejecting line has been seen.
    pub fn accepted(&self) -> bool {
        self.rejection.is_none()
    }

    /// Number of callback invocations observed.
    pub fn lines_seen(&self) -> usize {
        self.lines
    }
}

/// Channel that logs every command and answers with an empty response.
///
/// Used for dry runs: the device is never contacted, so every command
/// is accepted. The sent commands are kept for inspection.
#[derive(Debug, Default)]
pub struct DryRunChannel {
    sent: Vec<String>,
}

impl DryRunChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands sent so far, in order.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

#[async_trait]
impl CommandChannel for DryRunChannel {
    async fn command(&mut self, text: &str, _on_line: &mut LineCallback<'_>) -> CfgMgrResult<()> {
        tracing::info!(command = %text, "dry-run");
        self.sent.push(text.to_string());
        Ok(())
    }
}
