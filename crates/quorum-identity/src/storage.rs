//! Label persistence
//!
//! [`IdentityStorage`] stores one snapshot of records per organization.
//! [`MemoryIdentityStorage`] is for tests; [`FileIdentityStorage`] writes one
//! JSON file per organization under a base directory.

use crate::errors::{IdentityError, IdentityResult};
use crate::record::IdentityRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Per-organization record persistence.
#[async_trait]
pub trait IdentityStorage: Send + Sync {
    /// Load the organization's records. A missing snapshot is empty.
    async fn load(&self, org: &str) -> IdentityResult<Vec<IdentityRecord>>;

    /// Replace the organization's snapshot.
    async fn save(&self, org: &str, records: &[IdentityRecord]) -> IdentityResult<()>;

    /// Remove the organization's snapshot.
    async fn clear(&self, org: &str) -> IdentityResult<()>;
}

/// In-memory storage handler for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStorage {
    data: Arc<RwLock<HashMap<String, Vec<IdentityRecord>>>>,
}

impl MemoryIdentityStorage {
    /// Create an empty handler
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot exists for `org`
    pub async fn contains(&self, org: &str) -> bool {
        self.data.read().await.contains_key(org)
    }
}

#[async_trait]
impl IdentityStorage for MemoryIdentityStorage {
    async fn load(&self, org: &str) -> IdentityResult<Vec<IdentityRecord>> {
        Ok(self.data.read().await.get(org).cloned().unwrap_or_default())
    }

    async fn save(&self, org: &str, records: &[IdentityRecord]) -> IdentityResult<()> {
        self.data
            .write()
            .await
            .insert(org.to_string(), records.to_vec());
        Ok(())
    }

    async fn clear(&self, org: &str) -> IdentityResult<()> {
        self.data.write().await.remove(org);
        Ok(())
    }
}

/// Filesystem storage handler: `<base_dir>/<org>.json`.
#[derive(Debug, Clone)]
pub struct FileIdentityStorage {
    base_dir: PathBuf,
}

impl FileIdentityStorage {
    /// Create a handler rooted at `base_dir`. The directory is created on
    /// first save.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Snapshot file for `org`.
    pub fn file_path(&self, org: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", file_stem(org)))
    }
}

/// Reduce `name` to `[A-Za-z0-9._-]`, replacing anything else with `_`.
pub fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[async_trait]
impl IdentityStorage for FileIdentityStorage {
    async fn load(&self, org: &str) -> IdentityResult<Vec<IdentityRecord>> {
        let path = self.file_path(org);
        let content = match tokio::fs::read(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(IdentityError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        serde_json::from_slice(&content).map_err(|e| {
            IdentityError::storage(format!("Corrupt label snapshot {}: {e}", path.display()))
        })
    }

    async fn save(&self, org: &str, records: &[IdentityRecord]) -> IdentityResult<()> {
        tokio::fs::create_dir_all(&self.base_dir).await?;
        let path = self.file_path(org);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_vec_pretty(records)
            .map_err(|e| IdentityError::storage(format!("Failed to encode labels: {e}")))?;
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        tracing::debug!(path = %path.display(), records = records.len(), "Saved label snapshot");
        Ok(())
    }

    async fn clear(&self, org: &str) -> IdentityResult<()> {
        match tokio::fs::remove_file(self.file_path(org)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
