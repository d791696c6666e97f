//! Message signature requests.

use quorum_core::Address;
use serde::{Deserialize, Serialize};

/// An app asking the user to sign an off-chain message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageIntent {
    /// Message to sign
    pub message: String,
    /// App that asked
    pub requesting_app: Address,
}

impl MessageIntent {
    /// Whether the message is shown inline, or collapsed behind a toggle.
    pub fn is_human_readable(&self) -> bool {
        is_human_readable(&self.message)
    }
}

/// Printable ASCII and whitespace only.
pub fn is_human_readable(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_graphic() || c.is_ascii_whitespace())
}
