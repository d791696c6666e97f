//! Configuration
//!
//! [`QuorumConfig`] is loaded from a TOML file (optional), then overridden by
//! `QUORUM_*` environment variables, then validated. Every field has a
//! default so an empty file, or no file at all, is a working setup.

pub mod validation;

pub use validation::{ConfigValidator, ValidationError};

use crate::address::Address;
use crate::{QuorumError, QuorumResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "QUORUM_";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// The organization the console is pointed at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationConfig {
    /// Root address of the organization
    pub address: Option<Address>,
    /// Human name (ENS name or similar); used in export file names
    pub name: Option<String>,
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuorumConfig {
    /// Organization selection
    pub organization: OrganizationConfig,
    /// Address treated as "discarded manager"
    pub burn_address: Address,
    /// Base URL for share links
    pub share_base_url: String,
    /// Directory for persisted identity labels
    pub storage_dir: PathBuf,
    /// Default tracing filter
    pub log_level: String,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            organization: OrganizationConfig::default(),
            burn_address: Address::DEFAULT_BURN,
            share_base_url: "http://localhost:3000".to_string(),
            storage_dir: PathBuf::from(".quorum/labels"),
            log_level: "info".to_string(),
        }
    }
}

impl QuorumConfig {
    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> QuorumResult<Self> {
        toml::from_str(content).map_err(|e| QuorumError::invalid(format!("Invalid TOML: {e}")))
    }

    /// Load from a TOML file.
    pub fn load_from_file(path: &Path) -> QuorumResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuorumError::storage(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn merge_with_env(&mut self) -> QuorumResult<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `QUORUM_*` overrides from an arbitrary key/value source.
    ///
    /// Unknown `QUORUM_*` keys are ignored.
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> QuorumResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            let Some(field) = key.as_ref().strip_prefix(ENV_PREFIX) else {
                continue;
            };
            let value: String = value.into();
            match field {
                "ORGANIZATION_ADDRESS" => {
                    self.organization.address = Some(Address::parse(value.trim())?);
                }
                "ORGANIZATION_NAME" => self.organization.name = Some(value),
                "BURN_ADDRESS" => self.burn_address = Address::parse(value.trim())?,
                "SHARE_BASE_URL" => self.share_base_url = value,
                "STORAGE_DIR" => self.storage_dir = PathBuf::from(value),
                "LOG_LEVEL" => self.log_level = value.to_lowercase(),
                _ => continue,
            }
            tracing::debug!(key = key.as_ref(), "Applied environment override");
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> QuorumResult<()> {
        let mut validator = ConfigValidator::new();
        validator
            .url("share_base_url", &self.share_base_url)
            .non_zero_address("burn_address", &self.burn_address)
            .custom(
                "burn_address",
                &self.burn_address,
                |a| *a != Address::ANY_ENTITY,
                "must not be the any-account address",
            )
            .custom(
                "storage_dir",
                &self.storage_dir,
                |p| !p.as_os_str().is_empty(),
                "must not be empty",
            )
            .custom(
                "log_level",
                &self.log_level.as_str(),
                |l| LOG_LEVELS.contains(l),
                "must be one of trace, debug, info, warn, error",
            );

        let mut org = validator.for_field("organization");
        if let Some(address) = &self.organization.address {
            org.non_zero_address("address", address);
        }
        if let Some(name) = &self.organization.name {
            org.non_empty("name", name);
        }
        validator.merge(org);

        let errors = validator.all_errors();
        if errors.is_empty() {
            return Ok(());
        }
        let message = errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
        Err(QuorumError::invalid(message))
    }

    /// Key under which this organization's labels are stored.
    ///
    /// The lower-case organization address when configured, otherwise the
    /// organization name, otherwise `default`.
    pub fn organization_key(&self) -> String {
        if let Some(address) = &self.organization.address {
            return address.to_lower_hex();
        }
        match &self.organization.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => "default".to_string(),
        }
    }

    /// Name used in export file names.
    pub fn organization_label(&self) -> String {
        match (&self.organization.name, &self.organization.address) {
            (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, Some(address)) => address.to_checksum(),
            _ => "organization".to_string(),
        }
    }
}
