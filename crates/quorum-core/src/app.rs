//! # Installed Application Metadata

use crate::address::Address;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// 32-byte role identifier as declared by the app's contract.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleBytes([u8; 32]);

impl RoleBytes {
    /// Build from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a `0x`-prefixed 64-digit hex string.
    pub fn parse(s: &str) -> Result<Self, crate::QuorumError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| crate::QuorumError::invalid("role bytes must be 0x-prefixed"))?;
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| crate::QuorumError::invalid(format!("invalid role bytes: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for RoleBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for RoleBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RoleBytes({self})")
    }
}

impl FromStr for RoleBytes {
    type Err = crate::QuorumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for RoleBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RoleBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RoleBytes::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// A role (privileged action) declared by an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier
    pub bytes: RoleBytes,
    /// Human-readable name, if the app's metadata declares one
    #[serde(default)]
    pub name: Option<String>,
    /// Short symbolic id such as `TRANSFER_ROLE`
    #[serde(default)]
    pub id: Option<String>,
}

impl Role {
    /// Label for selectors: the name, or `Unknown action (<id>)`.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!(
                "Unknown action ({})",
                self.id.as_deref().unwrap_or("no ID")
            ),
        }
    }
}

/// Icon reference for an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppIcon {
    /// Icon location
    pub src: String,
    /// Declared size, e.g. `64x64`
    #[serde(default)]
    pub sizes: Option<String>,
}

/// An installed application instance, addressed by its proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppInstance {
    /// Proxy contract address
    pub proxy_address: Address,
    /// App name; unnamed apps are not offered in selectors
    #[serde(default)]
    pub name: Option<String>,
    /// Registry app id
    #[serde(default)]
    pub app_id: Option<String>,
    /// Icon set
    #[serde(default)]
    pub icons: Vec<AppIcon>,
    /// Declared roles
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl AppInstance {
    /// Whether the app has a non-empty name.
    pub fn is_named(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
    }

    /// Name, falling back to the checksummed proxy address.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => self.proxy_address.to_checksum(),
        }
    }

    /// Look up a declared role.
    pub fn role(&self, bytes: &RoleBytes) -> Option<&Role> {
        self.roles.iter().find(|r| &r.bytes == bytes)
    }
}

/// Apps that may be offered in selectors (those with a name), in input order.
pub fn named_apps(apps: &[AppInstance]) -> Vec<&AppInstance> {
    apps.iter().filter(|app| app.is_named()).collect()
}
