//! Permission intents and the call seam that carries them out.

use async_trait::async_trait;
use quorum_core::{Address, QuorumResult, RoleBytes, SnapshotChain};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mutating calls on the access-control contracts.
///
/// Implementations may only enqueue the call (e.g. hand it to a signer);
/// success means "issued", not "mined".
#[async_trait]
pub trait PermissionActions: Send + Sync {
    /// Create a permission with its first grantee and manager.
    async fn create_permission(
        &self,
        grantee: Address,
        proxy: Address,
        role: RoleBytes,
        manager: Address,
    ) -> QuorumResult<()>;

    /// Re-point the manager.
    async fn set_manager(&self, manager: Address, proxy: Address, role: RoleBytes) -> QuorumResult<()>;

    /// Discard the manager.
    async fn remove_manager(&self, proxy: Address, role: RoleBytes) -> QuorumResult<()>;

    /// Grant an existing permission to another entity.
    async fn grant_permission(&self, grantee: Address, proxy: Address, role: RoleBytes) -> QuorumResult<()>;
}

/// One call a panel decided to issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PermissionIntent {
    /// `create_permission(grantee, proxy, role, manager)`
    CreatePermission {
        /// First grantee
        grantee: Address,
        /// App proxy
        proxy: Address,
        /// Role
        role: RoleBytes,
        /// Initial manager
        manager: Address,
    },
    /// `set_manager(manager, proxy, role)`
    SetManager {
        /// New manager
        manager: Address,
        /// App proxy
        proxy: Address,
        /// Role
        role: RoleBytes,
    },
    /// `remove_manager(proxy, role)`
    RemoveManager {
        /// App proxy
        proxy: Address,
        /// Role
        role: RoleBytes,
    },
    /// `grant_permission(grantee, proxy, role)`
    GrantPermission {
        /// New grantee
        grantee: Address,
        /// App proxy
        proxy: Address,
        /// Role
        role: RoleBytes,
    },
}

impl PermissionIntent {
    /// Issue the call. Exactly one method of `actions` is invoked.
    pub async fn dispatch(&self, actions: &dyn PermissionActions) -> QuorumResult<()> {
        tracing::info!(intent = %self, "Issuing permission call");
        match *self {
            Self::CreatePermission {
                grantee,
                proxy,
                role,
                manager,
            } => actions.create_permission(grantee, proxy, role, manager).await,
            Self::SetManager {
                manager,
                proxy,
                role,
            } => actions.set_manager(manager, proxy, role).await,
            Self::RemoveManager { proxy, role } => actions.remove_manager(proxy, role).await,
            Self::GrantPermission {
                grantee,
                proxy,
                role,
            } => actions.grant_permission(grantee, proxy, role).await,
        }
    }

    /// App proxy the intent targets.
    pub fn proxy(&self) -> Address {
        match self {
            Self::CreatePermission { proxy, .. }
            | Self::SetManager { proxy, .. }
            | Self::RemoveManager { proxy, .. }
            | Self::GrantPermission { proxy, .. } => *proxy,
        }
    }

    /// Role the intent targets.
    pub fn role(&self) -> RoleBytes {
        match self {
            Self::CreatePermission { role, .. }
            | Self::SetManager { role, .. }
            | Self::RemoveManager { role, .. }
            | Self::GrantPermission { role, .. } => *role,
        }
    }
}

impl fmt::Display for PermissionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreatePermission { grantee, manager, .. } => {
                write!(f, "create permission for {grantee} managed by {manager}")
            }
            Self::SetManager { manager, .. } => write!(f, "set permission manager to {manager}"),
            Self::RemoveManager { .. } => write!(f, "remove permission manager"),
            Self::GrantPermission { grantee, .. } => write!(f, "grant permission to {grantee}"),
        }
    }
}

#[async_trait]
impl PermissionActions for SnapshotChain {
    async fn create_permission(
        &self,
        grantee: Address,
        proxy: Address,
        role: RoleBytes,
        manager: Address,
    ) -> QuorumResult<()> {
        self.create(proxy, role, grantee, manager)
    }

    async fn set_manager(&self, manager: Address, proxy: Address, role: RoleBytes) -> QuorumResult<()> {
        SnapshotChain::set_manager(self, proxy, role, manager)
    }

    async fn remove_manager(&self, proxy: Address, role: RoleBytes) -> QuorumResult<()> {
        self.burn_manager(proxy, role)
    }

    async fn grant_permission(&self, grantee: Address, proxy: Address, role: RoleBytes) -> QuorumResult<()> {
        self.grant(proxy, role, grantee)
    }
}
