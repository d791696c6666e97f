//! Permission panel errors

use crate::action::PermissionAction;
use quorum_core::{Address, ErrorCategory, QuorumError};

/// Errors raised by the permission panels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PermissionError {
    /// The form is not submittable.
    #[error("Cannot submit: {message}")]
    Validation {
        /// Why the form was refused
        message: String,
    },

    /// The chain changed since the panel was opened.
    #[error("Permission changed since the panel was opened: expected {expected:?}, found {found:?}")]
    StaleState {
        /// Action derived when the panel was opened
        expected: PermissionAction,
        /// Action derived from the fresh read
        found: PermissionAction,
    },

    /// The panel was already closed.
    #[error("Panel is closed")]
    PanelClosed,

    /// No installed app has this proxy address.
    #[error("Unknown app {proxy}")]
    UnknownApp {
        /// Requested proxy
        proxy: Address,
    },

    /// Reading chain state or issuing the call failed.
    #[error(transparent)]
    Chain(#[from] QuorumError),
}

impl PermissionError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Category for frontend routing.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Validation { .. } | Self::StaleState { .. } | Self::PanelClosed => {
                ErrorCategory::Validation
            }
            Self::UnknownApp { .. } => ErrorCategory::Chain,
            Self::Chain(err) => err.category(),
        }
    }
}

/// Result alias for permission operations.
pub type PermissionResult<T> = Result<T, PermissionError>;
