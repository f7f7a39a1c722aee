//! Error types for cfgmgr operations.
//!
//! All errors implement `std::error::Error` via `thiserror`. A command the
//! device rejects is not an error at this level; it is reported through the
//! [`ErrorSink`](crate::channel::ErrorSink) and surfaces as a failed change.

use netdev_types::ParseError;
use thiserror::Error;

/// Result type alias for cfgmgr operations.
pub type CfgMgrResult<T> = Result<T, CfgMgrError>;

/// Errors that can occur during cfgmgr operations.
#[derive(Debug, Error)]
pub enum CfgMgrError {
    /// The command transport failed (connection lost, timeout, ...).
    #[error("Transport failed while sending '{command}': {message}")]
    Transport {
        /// The command being sent when the transport failed.
        command: String,
        /// Error message from the transport.
        message: String,
    },

    /// A property value could not be turned into a device command.
    #[error("Cannot render {property}: {message}")]
    Render {
        /// The property being rendered.
        property: String,
        /// Error message.
        message: String,
    },

    /// Malformed address or prefix in a property value.
    #[error("Invalid address: {0}")]
    Address(#[from] ParseError),

    /// Configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// Internal error (unexpected state).
    #[error("Internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl CfgMgrError {
    /// Creates a transport error.
    pub fn transport(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates a render error.
    pub fn render(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            property: property.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition
    /// that may succeed on retry.
    ///
    /// Retrying is left to the caller; the engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CfgMgrError::Transport { .. })
    }
}
