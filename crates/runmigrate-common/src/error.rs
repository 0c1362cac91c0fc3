//! Error types for runmigrate
//!
//! Accessor errors carry the kind, operation, and target of the failing
//! cluster call so the operator can see exactly where a run stopped.

use thiserror::Error;

/// Default context value when no specific context is available
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// Main error type for migration operations
#[derive(Debug, Error)]
pub enum Error {
    /// A read or write against the cluster API failed
    #[error("{operation} {kind}/{target} failed: {message}")]
    Accessor {
        /// Resource kind addressed by the call (e.g., "pipelineruns.v1.tekton.dev")
        kind: String,
        /// Operation that failed (list, get, patch-status, apply)
        operation: String,
        /// Object name, or "*" for list calls
        target: String,
        /// Description of what failed
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
    },

    /// Internal/operational error
    #[error("internal error [{context}]: {message}")]
    Internal {
        /// Description of what failed
        message: String,
        /// Context where the error occurred (e.g., "create_client")
        context: String,
    },
}

impl Error {
    /// Create an accessor error for a failed cluster call
    pub fn accessor(
        kind: impl Into<String>,
        operation: impl Into<String>,
        target: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Accessor {
            kind: kind.into(),
            operation: operation.into(),
            target: target.into(),
            message: msg.into(),
        }
    }

    /// Create a serialization error with the given message
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
        }
    }

    /// Create an internal error with the given message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: UNKNOWN_CONTEXT.to_string(),
        }
    }

    /// Create an internal error with context
    pub fn internal_with_context(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: context.into(),
        }
    }

    /// Get the object name if this error is tied to a single cluster object
    pub fn target(&self) -> Option<&str> {
        match self {
            Error::Accessor { target, .. } => Some(target),
            Error::Serialization { .. } => None,
            Error::Internal { .. } => None,
        }
    }
}
