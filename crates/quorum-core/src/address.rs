//! Addresses and EIP-55 checksums
//!
//! An [`Address`] is the raw 20 bytes. Text forms are only a rendering:
//! equality, hashing and ordering all work on the bytes, so two strings that
//! differ only in case name the same address.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;
use std::str::FromStr;

/// Number of bytes in an address.
pub const ADDRESS_LEN: usize = 20;

/// Errors from parsing an address string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The string does not start with `0x`.
    #[error("address must be 0x-prefixed")]
    MissingPrefix,

    /// Wrong number of hex digits after the prefix.
    #[error("address must have 40 hex digits (got {0})")]
    InvalidLength(usize),

    /// A non-hex character was found.
    #[error("address contains non-hex characters")]
    InvalidHex,

    /// Mixed-case input whose casing does not match the EIP-55 checksum.
    #[error("address checksum mismatch")]
    BadChecksum,
}

/// A 20-byte address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address, meaning "unset".
    pub const ZERO: Address = Address([0u8; ADDRESS_LEN]);

    /// The "any account" wildcard grantee.
    pub const ANY_ENTITY: Address = Address([0xffu8; ADDRESS_LEN]);

    /// Default burn address (`0x…01`); `0x…00` is already taken by "unset".
    pub const DEFAULT_BURN: Address = Address([
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
    ]);

    /// Build an address from raw bytes.
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Whether this is the zero ("empty") address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_LEN]
    }

    /// Parse a `0x`-prefixed hex address.
    ///
    /// All-lowercase and all-uppercase digits are accepted as-is. Mixed case
    /// must match the EIP-55 checksum. Surrounding whitespace is rejected;
    /// callers that accept user input trim first.
    pub fn parse(s: &str) -> Result<Self, AddressError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or(AddressError::MissingPrefix)?;

        if digits.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::InvalidLength(digits.len()));
        }

        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| AddressError::InvalidHex)?;
        let address = Self(bytes);

        let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
        let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
        if has_lower && has_upper && address.checksum_digits() != digits {
            return Err(AddressError::BadChecksum);
        }

        Ok(address)
    }

    /// EIP-55 checksummed rendering, e.g. `0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed`.
    pub fn to_checksum(&self) -> String {
        format!("0x{}", self.checksum_digits())
    }

    /// Lower-case rendering; used as the identity directory key.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Shortened form for compact badges: `0x5aAe…eAed`.
    pub fn shorten(&self) -> String {
        let full = self.to_checksum();
        format!("{}…{}", &full[..6], &full[full.len() - 4..])
    }

    fn checksum_digits(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());

        lower
            .char_indices()
            .map(|(i, c)| {
                let byte = hash[i / 2];
                let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
                if c.is_ascii_alphabetic() && nibble >= 8 {
                    c.to_ascii_uppercase()
                } else {
                    c
                }
            })
            .collect()
    }
}

/// Whether `s` is a syntactically valid address.
pub fn is_address(s: &str) -> bool {
    Address::parse(s).is_ok()
}

/// Whether `s` parses to the zero address.
pub fn is_empty_address(s: &str) -> bool {
    Address::parse(s).map(|a| a.is_zero()).unwrap_or(false)
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Address::parse(&raw).map_err(serde::de::Error::custom)
    }
}
