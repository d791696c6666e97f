//! Unified error type and error categories
//!
//! Every Quorum crate defines its own `thiserror` enum and maps it onto an
//! [`ErrorCategory`], so frontends can decide how to present a failure
//! without matching on crate-specific variants.

use crate::address::AddressError;
use std::fmt;

// ============================================================================
// Error Categories
// ============================================================================

/// High-level error categories shared by all Quorum crates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// An address has no local label (silent, falls back to the address)
    ResolutionMiss,
    /// User input failed validation
    Validation,
    /// Wallet refused or failed to sign
    Signing,
    /// No forwarding path could be computed
    PathResolution,
    /// Local persistence failed
    Storage,
    /// Reading chain state failed
    Chain,
    /// Anything else
    Internal,
}

impl ErrorCategory {
    /// Whether failures in this category should be shown to the user.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::ResolutionMiss)
    }

    /// Whether the user can fix the problem by changing their input.
    #[must_use]
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, Self::Validation)
    }

    /// Short label for this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ResolutionMiss => "Unlabelled",
            Self::Validation => "Validation",
            Self::Signing => "Signing",
            Self::PathResolution => "Path",
            Self::Storage => "Storage",
            Self::Chain => "Chain",
            Self::Internal => "Internal",
        }
    }

    /// Hint for the user on how to resolve this category of error.
    #[must_use]
    pub fn resolution_hint(&self) -> &'static str {
        match self {
            Self::ResolutionMiss => "Add a custom label for this address",
            Self::Validation => "Check your input and try again",
            Self::Signing => "Check your wallet and try signing again",
            Self::PathResolution => {
                "You may not have the permissions needed to perform this action"
            }
            Self::Storage => "Check that the label storage location is writable",
            Self::Chain => "Check your connection to the network and retry",
            Self::Internal => "An unexpected error occurred",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// QuorumError
// ============================================================================

/// Unified error type for the core crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuorumError {
    /// Invalid input or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// What was invalid
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// What was not found
        message: String,
    },

    /// Storage operation failed
    #[error("Storage error: {message}")]
    Storage {
        /// Storage failure description
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Serialization failure description
        message: String,
    },

    /// Reading chain state failed
    #[error("Chain error: {message}")]
    Chain {
        /// Chain failure description
        message: String,
    },

    /// Internal error
    #[error("Internal error: {message}")]
    Internal {
        /// Internal failure description
        message: String,
    },
}

impl QuorumError {
    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a chain error
    pub fn chain(message: impl Into<String>) -> Self {
        Self::Chain {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Category for frontend routing.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Invalid { .. } => ErrorCategory::Validation,
            Self::NotFound { .. } => ErrorCategory::ResolutionMiss,
            Self::Storage { .. } | Self::Serialization { .. } => ErrorCategory::Storage,
            Self::Chain { .. } => ErrorCategory::Chain,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

impl From<std::io::Error> for QuorumError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<serde_json::Error> for QuorumError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<AddressError> for QuorumError {
    fn from(err: AddressError) -> Self {
        Self::invalid(err.to_string())
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, QuorumError>;
