//! Quorum Signer - Transaction Intent Signer
//!
//! Tracks a transaction or message intent from request to signature:
//! forwarding-path choice, optional pre-transaction, signing status, and the
//! explanations shown when an intent cannot be performed.

#![forbid(unsafe_code)]

pub mod errors;
pub mod impossible;
pub mod message;
pub mod panel;
pub mod paths;
pub mod status;

pub use errors::{clean_error_message, SignerError, SignerResult};
pub use impossible::{ActionImpossible, ImpossibleReason};
pub use message::{is_human_readable, MessageIntent};
pub use panel::{MessageSigner, PanelContent, SignerPanel, TransactionSubmitter};
pub use paths::{ForwardingPaths, PathRadioItem, PathSelector, Transaction, TransactionIntent};
pub use status::{IntentKind, SignerStatus, SigningState, DEFAULT_PROVIDER};
