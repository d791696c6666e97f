// Shared helpers for command handlers
//
// Config resolution, address parsing, directory opening and error hints.

use anyhow::{bail, Context, Result};
use quorum_core::{Address, ErrorCategory, QuorumConfig, QuorumError};
use quorum_identity::{
    FileIdentityStorage, IdentityBus, IdentityError, LocalIdentityDirectory, DEFAULT_BUS_CAPACITY,
};
use quorum_permissions::PermissionError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default config location: `<config dir>/quorum/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("quorum").join("config.toml"))
}

/// Load, env-merge and validate the configuration.
///
/// An explicit path must exist. Without one, the default location is used
/// when present and built-in defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<QuorumConfig> {
    let mut config = match explicit {
        Some(path) => QuorumConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => match default_config_path().filter(|p| p.is_file()) {
            Some(path) => QuorumConfig::load_from_file(&path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => QuorumConfig::default(),
        },
    };
    config.merge_with_env()?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Parse a user-typed address.
pub fn parse_address(input: &str) -> Result<Address> {
    Address::parse(input.trim()).with_context(|| format!("not an address: {input:?}"))
}

/// Parse a list of addresses, failing on the first bad one.
pub fn parse_addresses(inputs: &[String]) -> Result<Vec<Address>> {
    inputs.iter().map(|s| parse_address(s)).collect()
}

/// Open the organization's label directory under the configured storage dir.
pub async fn open_directory(config: &QuorumConfig) -> Result<Arc<LocalIdentityDirectory>> {
    let storage = Arc::new(FileIdentityStorage::new(&config.storage_dir));
    let directory = LocalIdentityDirectory::open(
        config.organization_key(),
        storage,
        IdentityBus::new(DEFAULT_BUS_CAPACITY),
    )
    .await
    .context("opening label directory")?;
    Ok(Arc::new(directory))
}

/// Refuse a destructive command unless confirmed.
pub fn require_confirmation(confirmed: bool, what: &str) -> Result<()> {
    if !confirmed {
        bail!("{what} needs --yes");
    }
    Ok(())
}

/// Print the effective configuration.
pub fn print_config(config: &QuorumConfig) {
    println!("Organization:   {}", config.organization_label());
    println!("Storage key:    {}", config.organization_key());
    println!("Burn address:   {}", config.burn_address);
    println!("Share base URL: {}", config.share_base_url);
    println!("Storage dir:    {}", config.storage_dir.display());
    println!("Log level:      {}", config.log_level);
}

/// Category of the first Quorum error found in the cause chain.
pub fn error_category(err: &anyhow::Error) -> Option<ErrorCategory> {
    err.chain().find_map(|cause| {
        if let Some(err) = cause.downcast_ref::<QuorumError>() {
            Some(err.category())
        } else if let Some(err) = cause.downcast_ref::<IdentityError>() {
            Some(err.category())
        } else {
            cause.downcast_ref::<PermissionError>().map(PermissionError::category)
        }
    })
}

/// Print a failed command with a hint for its error category.
pub fn report_error(err: &anyhow::Error) {
    eprintln!("Error: {err:#}");
    if let Some(category) = error_category(err).filter(ErrorCategory::is_user_visible) {
        eprintln!("Hint: {}", category.resolution_hint());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "share_base_url = \"https://client.example.org\"\n[organization]\nname = \"acme\"\n",
        )
        .unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.share_base_url, "https://client.example.org");
        assert_eq!(config.organization_key(), "acme");
    }

    #[test]
    fn test_parse_address_trims() {
        let parsed = parse_address("  0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed ").unwrap();
        assert_eq!(parsed.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(parse_address("0x5aae").is_err());
    }

    #[test]
    fn test_invalid_config_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "share_base_url = \"ftp://x\"\nlog_level = \"loud\"\n").unwrap();
        let err = load_config(Some(&path)).unwrap_err();
        assert_eq!(error_category(&err), Some(ErrorCategory::Validation));
        let message = format!("{err:#}");
        assert!(message.contains("share_base_url"));
        assert!(message.contains("log_level"));
    }

    #[test]
    fn test_error_category_walks_context() {
        let err = anyhow::Error::from(IdentityError::EmptySelection).context("exporting labels");
        assert_eq!(error_category(&err), Some(ErrorCategory::Validation));
        assert_eq!(error_category(&anyhow::anyhow!("plain failure")), None);
    }
}
