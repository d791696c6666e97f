//! Signer errors

use crate::status::SignerStatus;
use quorum_core::{ErrorCategory, QuorumError};

/// Reduce a wallet error to something fit for display.
///
/// Keeps the first line only, then strips a leading `Returned error: ` and
/// after it a leading `Error: `.
pub fn clean_error_message(raw: &str) -> String {
    let first = raw.split('\n').next().unwrap_or_default();
    let first = first.strip_prefix("Returned error: ").unwrap_or(first);
    first.strip_prefix("Error: ").unwrap_or(first).to_string()
}

/// Errors raised while signing an intent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// The wallet refused or failed to sign.
    #[error("{message}")]
    Wallet {
        /// Cleaned wallet message
        message: String,
    },

    /// Signing is disabled, e.g. no account is connected.
    #[error("Signing is disabled")]
    SigningDisabled,

    /// The status machine cannot move this way.
    #[error("Cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status
        from: SignerStatus,
        /// Requested status
        to: SignerStatus,
    },

    /// The intent cannot be performed by the current account.
    #[error("No forwarding path for this action")]
    NoPath,

    /// Computing the forwarding paths failed.
    #[error("Failed to compute a path: {message}")]
    PathResolution {
        /// Resolver message
        message: String,
    },

    /// The selected path does not exist.
    #[error("Path {index} out of range ({len} paths)")]
    PathOutOfRange {
        /// Selected index
        index: usize,
        /// Number of paths
        len: usize,
    },

    /// The panel holds a different kind of request, or none.
    #[error("No {expected} request is open")]
    WrongRequest {
        /// Kind the caller asked for
        expected: &'static str,
    },
}

impl SignerError {
    /// Wallet failure; the message is cleaned.
    pub fn wallet(raw: impl AsRef<str>) -> Self {
        Self::Wallet {
            message: clean_error_message(raw.as_ref()),
        }
    }

    /// Path resolution failure.
    pub fn path_resolution(message: impl Into<String>) -> Self {
        Self::PathResolution {
            message: message.into(),
        }
    }

    /// Category for frontend routing.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NoPath | Self::PathResolution { .. } | Self::PathOutOfRange { .. } => {
                ErrorCategory::PathResolution
            }
            Self::Wallet { .. }
            | Self::SigningDisabled
            | Self::InvalidTransition { .. }
            | Self::WrongRequest { .. } => ErrorCategory::Signing,
        }
    }
}

impl From<SignerError> for QuorumError {
    fn from(err: SignerError) -> Self {
        QuorumError::internal(err.to_string())
    }
}

/// Result alias for signer operations.
pub type SignerResult<T> = Result<T, SignerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_error_message() {
        assert_eq!(
            clean_error_message("Returned error: Error: MetaMask Tx Signature: User denied\n    at foo.js:1"),
            "MetaMask Tx Signature: User denied"
        );
        assert_eq!(clean_error_message("Error: nonce too low"), "nonce too low");
        // Order matters: "Error: " first is stripped, "Returned error: " after it is not.
        assert_eq!(
            clean_error_message("Error: Returned error: x"),
            "Returned error: x"
        );
        assert_eq!(clean_error_message(""), "");
    }

    #[test]
    fn test_categories() {
        assert_eq!(SignerError::NoPath.category(), ErrorCategory::PathResolution);
        assert_eq!(SignerError::wallet("Error: denied").category(), ErrorCategory::Signing);
        assert_eq!(SignerError::wallet("Error: denied").to_string(), "denied");
    }
}
