//! Verification helpers for command transcripts
//!
//! Provides assertion helpers over the commands a manager sent to a device

use thiserror::Error;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Expected command '{expected}' not sent; transcript: {transcript:?}")]
    CommandNotSent {
        expected: String,
        transcript: Vec<String>,
    },

    #[error("Command '{command}' should not have been sent")]
    UnexpectedCommand { command: String },

    #[error("Expected {expected} commands, found {actual}")]
    CommandCountMismatch { expected: usize, actual: usize },

    #[error("Expected '{first}' before '{second}'")]
    OrderMismatch { first: String, second: String },

    #[error("Transcript is not wrapped in the configuration bracket for {interface}: {transcript:?}")]
    MissingBracket {
        interface: String,
        transcript: Vec<String>,
    },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Command transcript verifier
pub struct TranscriptVerifier<'a> {
    sent: &'a [String],
}

impl<'a> TranscriptVerifier<'a> {
    /// Create a verifier over the sent commands
    pub fn new(sent: &'a [String]) -> Self {
        Self { sent }
    }

    fn position(&self, command: &str) -> Option<usize> {
        self.sent.iter().position(|cmd| cmd == command)
    }

    /// Verify that a command was sent verbatim
    pub fn assert_command_sent(&self, expected: &str) -> VerifyResult<()> {
        match self.position(expected) {
            Some(_) => Ok(()),
            None => Err(VerificationError::CommandNotSent {
                expected: expected.to_string(),
                transcript: self.sent.to_vec(),
            }),
        }
    }

    /// Verify that a command was NOT sent
    pub fn assert_command_not_sent(&self, command: &str) -> VerifyResult<()> {
        match self.position(command) {
            Some(_) => Err(VerificationError::UnexpectedCommand {
                command: command.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Verify the number of commands sent
    pub fn assert_command_count(&self, expected: usize) -> VerifyResult<()> {
        let actual = self.sent.len();
        if actual != expected {
            return Err(VerificationError::CommandCountMismatch { expected, actual });
        }
        Ok(())
    }

    /// Verify that `first` was sent before `second`
    pub fn assert_sent_before(&self, first: &str, second: &str) -> VerifyResult<()> {
        self.assert_command_sent(first)?;
        self.assert_command_sent(second)?;
        if self.position(first) > self.position(second) {
            return Err(VerificationError::OrderMismatch {
                first: first.to_string(),
                second: second.to_string(),
            });
        }
        Ok(())
    }

    /// Verify the transcript opens with `conf t`, `interface <name>` and
    /// closes with two `exit`s
    pub fn assert_bracket(&self, interface: &str) -> VerifyResult<()> {
        let enter = format!("interface {}", interface);
        let n = self.sent.len();
        let wrapped = n >= 4
            && self.sent[0] == "conf t"
            && self.sent[1] == enter
            && self.sent[n - 2] == "exit"
            && self.sent[n - 1] == "exit";

        if !wrapped {
            return Err(VerificationError::MissingBracket {
                interface: interface.to_string(),
                transcript: self.sent.to_vec(),
            });
        }
        Ok(())
    }
}
