//! # Signing Status
//!
//! One machine per intent kind: `Idle → Signing → {Signed, Error}`.
//! `Signing` has no timeout; `Signed` and `Error` are terminal until the
//! panel is closed.

use crate::errors::{SignerError, SignerResult};
use serde::{Deserialize, Serialize};

/// Provider name used when the wallet is not known.
pub const DEFAULT_PROVIDER: &str = "your Ethereum provider";

/// What is being signed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    /// An on-chain transaction
    Transaction,
    /// An off-chain message
    Message,
}

impl IntentKind {
    /// Noun used in status texts.
    #[must_use]
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Transaction => "transaction",
            Self::Message => "message",
        }
    }
}

/// Status of one signature request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignerStatus {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting on the wallet
    Signing,
    /// The wallet signed
    Signed,
    /// The wallet refused or failed
    Error,
}

impl SignerStatus {
    /// Whether the request finished either way.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Signed | Self::Error)
    }
}

/// Status machine for a single intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningState {
    kind: IntentKind,
    status: SignerStatus,
    error: Option<String>,
}

impl SigningState {
    /// A fresh machine in `Idle`.
    pub fn new(kind: IntentKind) -> Self {
        Self {
            kind,
            status: SignerStatus::Idle,
            error: None,
        }
    }

    /// Kind of intent this machine tracks.
    pub fn kind(&self) -> IntentKind {
        self.kind
    }

    /// Current status.
    pub fn status(&self) -> SignerStatus {
        self.status
    }

    /// Cleaned wallet error, in `Error` only.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// `Idle → Signing`.
    pub fn begin(&mut self) -> SignerResult<()> {
        self.transition(SignerStatus::Idle, SignerStatus::Signing)
    }

    /// `Signing → Signed`.
    pub fn succeed(&mut self) -> SignerResult<()> {
        self.transition(SignerStatus::Signing, SignerStatus::Signed)
    }

    /// `Signing → Error`, keeping the message for display.
    pub fn fail(&mut self, err: &SignerError) -> SignerResult<()> {
        self.transition(SignerStatus::Signing, SignerStatus::Error)?;
        self.error = Some(err.to_string());
        Ok(())
    }

    fn transition(&mut self, from: SignerStatus, to: SignerStatus) -> SignerResult<()> {
        if self.status != from {
            return Err(SignerError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        tracing::debug!(kind = ?self.kind, ?from, ?to, "Signer status");
        self.status = to;
        Ok(())
    }

    /// Heading for the status screen. `None` while idle.
    pub fn label(&self) -> Option<&'static str> {
        match (self.status, self.kind) {
            (SignerStatus::Idle, _) => None,
            (SignerStatus::Signing, _) => Some("Waiting for signature…"),
            (SignerStatus::Signed, IntentKind::Transaction) => Some("Transaction signed!"),
            (SignerStatus::Signed, IntentKind::Message) => Some("Message signed!"),
            (SignerStatus::Error, IntentKind::Transaction) => Some("Error signing the transaction."),
            (SignerStatus::Error, IntentKind::Message) => Some("Error signing the message."),
        }
    }

    /// Paragraphs of additional information for the status screen.
    pub fn info(&self, provider: Option<&str>) -> Vec<String> {
        let provider = provider.unwrap_or(DEFAULT_PROVIDER);
        let noun = self.kind.noun();
        let mut lines = Vec::new();
        match (self.status, self.kind) {
            (SignerStatus::Idle, _) => {}
            (SignerStatus::Signing, _) => lines.push(format!("Open {provider} to sign your {noun}.")),
            (SignerStatus::Signed, IntentKind::Transaction) => lines.push(
                "Success! Your transaction has been sent to the network for processing.".to_string(),
            ),
            (SignerStatus::Signed, IntentKind::Message) => {
                lines.push("Success! Your message has been signed.".to_string())
            }
            (SignerStatus::Error, IntentKind::Transaction) => {
                lines.push("Your transaction wasn't signed and no tokens were sent.".to_string())
            }
            (SignerStatus::Error, IntentKind::Message) => {
                lines.push("Your message wasn't signed.".to_string())
            }
        }
        if let Some(error) = &self.error {
            lines.push(format!("Error: {error}"));
        }
        lines
    }

    /// Whether the close button is offered.
    pub fn can_close(&self) -> bool {
        self.status.is_completed()
    }
}
