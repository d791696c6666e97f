//! Identity directory errors

use quorum_core::{Address, AddressError, ErrorCategory, QuorumError};

/// Errors raised by the identity directory and its file formats.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// The address has no local label.
    #[error("No local label for {address}")]
    ResolutionMiss {
        /// Address that was looked up
        address: Address,
    },

    /// A label file is not a JSON array of labels.
    #[error("Invalid label file: {message}")]
    InvalidFile {
        /// What was wrong
        message: String,
    },

    /// One entry of a label file is invalid; the whole file is rejected.
    #[error("Invalid label at index {index}: {message}")]
    InvalidEntry {
        /// Zero-based position in the array
        index: usize,
        /// What was wrong
        message: String,
    },

    /// A share link could not be decoded.
    #[error("Invalid share link: {message}")]
    InvalidShareLink {
        /// What was wrong
        message: String,
    },

    /// Export, share or save was requested with nothing selected.
    #[error("No labels selected")]
    EmptySelection,

    /// A label name was given for an invalid address.
    #[error("Invalid address: {0}")]
    InvalidAddress(#[from] AddressError),

    /// Persistence failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Storage failure description
        message: String,
    },
}

impl IdentityError {
    /// Create a file-level import error
    pub fn invalid_file(message: impl Into<String>) -> Self {
        Self::InvalidFile {
            message: message.into(),
        }
    }

    /// Create an entry-level import error
    pub fn invalid_entry(index: usize, message: impl Into<String>) -> Self {
        Self::InvalidEntry {
            index,
            message: message.into(),
        }
    }

    /// Create a share link error
    pub fn invalid_share_link(message: impl Into<String>) -> Self {
        Self::InvalidShareLink {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Category for frontend routing.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ResolutionMiss { .. } => ErrorCategory::ResolutionMiss,
            Self::InvalidFile { .. }
            | Self::InvalidEntry { .. }
            | Self::InvalidShareLink { .. }
            | Self::EmptySelection
            | Self::InvalidAddress(_) => ErrorCategory::Validation,
            Self::Storage { .. } => ErrorCategory::Storage,
        }
    }
}

impl From<std::io::Error> for IdentityError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err.to_string())
    }
}

impl From<IdentityError> for QuorumError {
    fn from(err: IdentityError) -> Self {
        match err.category() {
            ErrorCategory::ResolutionMiss => QuorumError::not_found(err.to_string()),
            ErrorCategory::Storage => QuorumError::storage(err.to_string()),
            _ => QuorumError::invalid(err.to_string()),
        }
    }
}

/// Result alias for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;
