//! Chain state access
//!
//! [`ChainReader`] is the read seam onto the organization's access-control
//! contracts. [`SnapshotChain`] implements it over an in-memory snapshot
//! loaded from JSON; the CLI and the test suites use it in place of a node.

use crate::address::Address;
use crate::app::{AppInstance, RoleBytes};
use crate::{QuorumError, QuorumResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// One `(app, role)` permission as stored on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    /// App proxy the role belongs to
    pub app: Address,
    /// Role identifier
    pub role: RoleBytes,
    /// Current manager (zero when the permission was never created)
    pub manager: Address,
    /// Entities allowed to perform the role
    #[serde(default)]
    pub grantees: Vec<Address>,
}

/// Read access to on-chain permission state.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Installed apps, in installation order.
    async fn apps(&self) -> QuorumResult<Vec<AppInstance>>;

    /// Manager of `(proxy, role)`; zero when the permission does not exist.
    async fn get_manager(&self, proxy: Address, role: RoleBytes) -> QuorumResult<Address>;

    /// Grantees of `(proxy, role)`.
    async fn get_grantees(&self, proxy: Address, role: RoleBytes) -> QuorumResult<Vec<Address>>;

    /// Every existing permission across all declared roles.
    ///
    /// Roles with no manager and no grantees are skipped.
    async fn permissions(&self) -> QuorumResult<Vec<PermissionRecord>> {
        let mut records = Vec::new();
        for app in self.apps().await? {
            for role in &app.roles {
                let manager = self.get_manager(app.proxy_address, role.bytes).await?;
                let grantees = self.get_grantees(app.proxy_address, role.bytes).await?;
                if manager.is_zero() && grantees.is_empty() {
                    continue;
                }
                records.push(PermissionRecord {
                    app: app.proxy_address,
                    role: role.bytes,
                    manager,
                    grantees,
                });
            }
        }
        Ok(records)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    dao: Option<Address>,
    #[serde(default)]
    burn_address: Option<Address>,
    #[serde(default)]
    apps: Vec<AppInstance>,
    #[serde(default)]
    permissions: Vec<PermissionRecord>,
}

#[derive(Debug, Clone, Default)]
struct PermissionState {
    manager: Address,
    grantees: Vec<Address>,
}

#[derive(Debug)]
struct SnapshotState {
    apps: Vec<AppInstance>,
    permissions: BTreeMap<(Address, RoleBytes), PermissionState>,
}

/// In-memory chain snapshot.
///
/// Cloning yields another handle onto the same state, so a panel and a test
/// can observe each other's writes.
#[derive(Debug, Clone)]
pub struct SnapshotChain {
    dao: Option<Address>,
    burn_address: Address,
    state: Arc<RwLock<SnapshotState>>,
}

impl SnapshotChain {
    /// Empty snapshot with the default burn address.
    pub fn new(apps: Vec<AppInstance>) -> Self {
        Self {
            dao: None,
            burn_address: Address::DEFAULT_BURN,
            state: Arc::new(RwLock::new(SnapshotState {
                apps,
                permissions: BTreeMap::new(),
            })),
        }
    }

    /// Set the organization root.
    pub fn with_dao(mut self, dao: Address) -> Self {
        self.dao = Some(dao);
        self
    }

    /// Set the burn address used by [`SnapshotChain::burn_manager`].
    pub fn with_burn_address(mut self, burn_address: Address) -> Self {
        self.burn_address = burn_address;
        self
    }

    /// Parse a JSON snapshot.
    pub fn from_json(json: &str) -> QuorumResult<Self> {
        Self::from_json_with_burn(json, Address::DEFAULT_BURN)
    }

    /// Parse a JSON snapshot, using `fallback_burn` when the snapshot does
    /// not declare a burn address.
    pub fn from_json_with_burn(json: &str, fallback_burn: Address) -> QuorumResult<Self> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        let mut permissions = BTreeMap::new();
        for record in file.permissions {
            permissions.insert(
                (record.app, record.role),
                PermissionState {
                    manager: record.manager,
                    grantees: record.grantees,
                },
            );
        }
        tracing::debug!(
            apps = file.apps.len(),
            permissions = permissions.len(),
            "Loaded chain snapshot"
        );
        Ok(Self {
            dao: file.dao,
            burn_address: file.burn_address.unwrap_or(fallback_burn),
            state: Arc::new(RwLock::new(SnapshotState {
                apps: file.apps,
                permissions,
            })),
        })
    }

    /// Load a JSON snapshot from disk.
    pub fn load(path: &Path) -> QuorumResult<Self> {
        Self::load_with_burn(path, Address::DEFAULT_BURN)
    }

    /// Load a JSON snapshot from disk; see [`SnapshotChain::from_json_with_burn`].
    pub fn load_with_burn(path: &Path, fallback_burn: Address) -> QuorumResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            QuorumError::chain(format!("Failed to read snapshot {}: {e}", path.display()))
        })?;
        Self::from_json_with_burn(&content, fallback_burn)
    }

    /// Serialize the current state back to JSON.
    pub fn to_json(&self) -> QuorumResult<String> {
        let state = self.state.read();
        let file = SnapshotFile {
            dao: self.dao,
            burn_address: Some(self.burn_address),
            apps: state.apps.clone(),
            permissions: state
                .permissions
                .iter()
                .map(|((app, role), p)| PermissionRecord {
                    app: *app,
                    role: *role,
                    manager: p.manager,
                    grantees: p.grantees.clone(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Organization root, if the snapshot declares one.
    pub fn dao(&self) -> Option<Address> {
        self.dao
    }

    /// Burn address in effect for this snapshot.
    pub fn burn_address(&self) -> Address {
        self.burn_address
    }

    /// Create a permission with its first grantee and manager.
    pub fn create(
        &self,
        proxy: Address,
        role: RoleBytes,
        grantee: Address,
        manager: Address,
    ) -> QuorumResult<()> {
        let mut state = self.state.write();
        let entry = state.permissions.entry((proxy, role)).or_default();
        if !entry.manager.is_zero() {
            return Err(QuorumError::chain("permission already exists"));
        }
        entry.manager = manager;
        entry.grantees = vec![grantee];
        tracing::info!(%proxy, %role, %grantee, %manager, "Permission created");
        Ok(())
    }

    /// Re-point the manager of a live permission.
    pub fn set_manager(&self, proxy: Address, role: RoleBytes, manager: Address) -> QuorumResult<()> {
        let mut state = self.state.write();
        let entry = self.live_entry(&mut state, proxy, role)?;
        entry.manager = manager;
        tracing::info!(%proxy, %role, %manager, "Permission manager changed");
        Ok(())
    }

    /// Discard the manager, freezing the permission.
    pub fn burn_manager(&self, proxy: Address, role: RoleBytes) -> QuorumResult<()> {
        let burn = self.burn_address;
        let mut state = self.state.write();
        let entry = self.live_entry(&mut state, proxy, role)?;
        entry.manager = burn;
        tracing::info!(%proxy, %role, "Permission manager removed");
        Ok(())
    }

    /// Add a grantee to a live permission. Granting twice is a no-op.
    pub fn grant(&self, proxy: Address, role: RoleBytes, grantee: Address) -> QuorumResult<()> {
        let mut state = self.state.write();
        let entry = self.live_entry(&mut state, proxy, role)?;
        if !entry.grantees.contains(&grantee) {
            entry.grantees.push(grantee);
        }
        tracing::info!(%proxy, %role, %grantee, "Permission granted");
        Ok(())
    }

    fn live_entry<'a>(
        &self,
        state: &'a mut SnapshotState,
        proxy: Address,
        role: RoleBytes,
    ) -> QuorumResult<&'a mut PermissionState> {
        let entry = state
            .permissions
            .get_mut(&(proxy, role))
            .filter(|p| !p.manager.is_zero())
            .ok_or_else(|| QuorumError::chain("permission does not exist"))?;
        if entry.manager == self.burn_address {
            return Err(QuorumError::chain("permission manager was discarded"));
        }
        Ok(entry)
    }
}

#[async_trait]
impl ChainReader for SnapshotChain {
    async fn apps(&self) -> QuorumResult<Vec<AppInstance>> {
        Ok(self.state.read().apps.clone())
    }

    async fn get_manager(&self, proxy: Address, role: RoleBytes) -> QuorumResult<Address> {
        let state = self.state.read();
        let manager = state
            .permissions
            .get(&(proxy, role))
            .map(|p| p.manager)
            .unwrap_or(Address::ZERO);
        tracing::debug!(%proxy, %role, %manager, "Read permission manager");
        Ok(manager)
    }

    async fn get_grantees(&self, proxy: Address, role: RoleBytes) -> QuorumResult<Vec<Address>> {
        let state = self.state.read();
        Ok(state
            .permissions
            .get(&(proxy, role))
            .map(|p| p.grantees.clone())
            .unwrap_or_default())
    }
}
