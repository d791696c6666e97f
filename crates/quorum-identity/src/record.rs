//! # Identity Records

use chrono::{DateTime, Utc};
use quorum_core::Address;
use serde::{Deserialize, Serialize};

/// A locally assigned label for an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    /// Labelled address
    pub address: Address,
    /// Label text, never empty
    pub name: String,
    /// When the label was first assigned on this device
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl IdentityRecord {
    /// New record stamped with the current time.
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
            created_at: Some(Utc::now()),
        }
    }

    /// Directory key: the lower-cased address.
    pub fn key(&self) -> String {
        self.address.to_lower_hex()
    }

    /// Export projection.
    pub fn to_entry(&self) -> LabelEntry {
        LabelEntry {
            address: self.address,
            name: self.name.clone(),
        }
    }
}

/// `{address, name}` pair as it appears in export files and share links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Labelled address
    pub address: Address,
    /// Label text
    pub name: String,
}

impl LabelEntry {
    /// Create an entry
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
        }
    }
}

impl From<&IdentityRecord> for LabelEntry {
    fn from(record: &IdentityRecord) -> Self {
        record.to_entry()
    }
}
