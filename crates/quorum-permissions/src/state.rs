//! # Role Permission State
//!
//! Loads one `(app, role)` permission from a [`ChainReader`] and classifies
//! its manager and grantees. An unset manager with grantees cannot be
//! produced by the contracts, but is reported rather than coerced.

use crate::action::{current_action, PermissionAction, UpdateAction};
use crate::errors::{PermissionError, PermissionResult};
use quorum_core::{
    classify, classify_grantee, Address, AppInstance, ChainReader, ClassifyContext, Entity,
    QuorumConfig, Role, RoleBytes,
};
use quorum_identity::LocalIdentityDirectory;

/// Organization-wide classification inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgContext {
    /// Address meaning "discarded manager"
    pub burn_address: Address,
    /// Organization root
    pub dao_address: Option<Address>,
}

impl Default for OrgContext {
    fn default() -> Self {
        Self {
            burn_address: Address::DEFAULT_BURN,
            dao_address: None,
        }
    }
}

impl OrgContext {
    /// Inputs from configuration.
    pub fn from_config(config: &QuorumConfig) -> Self {
        Self {
            burn_address: config.burn_address,
            dao_address: config.organization.address,
        }
    }

    /// Classification context over `apps`.
    pub fn classify_ctx<'a>(&self, apps: &'a [AppInstance]) -> ClassifyContext<'a> {
        let ctx = ClassifyContext::new(apps).with_burn_address(self.burn_address);
        match self.dao_address {
            Some(dao) => ctx.with_dao(dao),
            None => ctx,
        }
    }
}

/// Whether a permission's manager and grantees agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consistency {
    /// Normal state
    Consistent,
    /// No manager but grantees present
    OrphanGrantees,
}

/// How the manager cell is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerDisplay {
    /// Unset manager
    NoManager,
    /// Discarded manager
    Discarded,
    /// Manager is an installed app
    App(String),
    /// Manager is an address; rendered through its identity badge
    Address(Address),
}

impl ManagerDisplay {
    /// Display for a manager entity.
    pub fn for_entity(manager: &Entity) -> Self {
        match manager {
            Entity::None => Self::NoManager,
            Entity::Burn { .. } => Self::Discarded,
            Entity::App { app, .. } => Self::App(app.display_name()),
            Entity::Account { address } | Entity::Dao { address } => Self::Address(*address),
            Entity::Any => Self::Address(Address::ANY_ENTITY),
        }
    }

    /// Text to render, using a local label for addresses when available.
    pub fn text(&self, directory: Option<&LocalIdentityDirectory>) -> String {
        match self {
            Self::NoManager => "No manager".to_string(),
            Self::Discarded => "Discarded".to_string(),
            Self::App(name) => name.clone(),
            Self::Address(address) => directory
                .and_then(|d| d.resolve(address).ok())
                .map(|record| record.name)
                .unwrap_or_else(|| address.to_checksum()),
        }
    }
}

/// One permission as shown by the manage panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionState {
    /// App the role belongs to
    pub app: AppInstance,
    /// Role metadata (unnamed when the app does not declare it)
    pub role: Role,
    /// Classified manager
    pub manager: Entity,
    /// Classified grantees
    pub grantees: Vec<Entity>,
    /// Manager/grantee agreement
    pub consistency: Consistency,
}

impl RolePermissionState {
    /// Classify raw chain values.
    pub fn from_parts(
        app: AppInstance,
        role: Role,
        manager: Address,
        grantees: &[Address],
        ctx: &ClassifyContext<'_>,
    ) -> Self {
        let manager = classify(manager, ctx);
        let grantees: Vec<Entity> = grantees.iter().map(|g| classify_grantee(*g, ctx)).collect();
        let consistency = if matches!(manager, Entity::None) && !grantees.is_empty() {
            tracing::warn!(
                proxy = %app.proxy_address,
                role = %role.bytes,
                grantees = grantees.len(),
                "Permission has grantees but no manager"
            );
            Consistency::OrphanGrantees
        } else {
            Consistency::Consistent
        };
        Self {
            app,
            role,
            manager,
            grantees,
            consistency,
        }
    }

    /// Action the panel opens with.
    pub fn action(&self, choice: UpdateAction) -> PermissionAction {
        current_action(&self.manager, choice)
    }

    /// Manager cell rendering.
    pub fn manager_display(&self) -> ManagerDisplay {
        ManagerDisplay::for_entity(&self.manager)
    }
}

/// Look up an app by proxy.
pub fn find_app(apps: &[AppInstance], proxy: Address) -> PermissionResult<&AppInstance> {
    apps.iter()
        .find(|app| app.proxy_address == proxy)
        .ok_or(PermissionError::UnknownApp { proxy })
}

/// Role metadata, or an unnamed role when the app does not declare it.
pub fn role_or_unknown(app: &AppInstance, role: RoleBytes) -> Role {
    app.role(&role).cloned().unwrap_or(Role {
        bytes: role,
        name: None,
        id: None,
    })
}

/// Read and classify `(proxy, role)`.
pub async fn load_role_state(
    reader: &dyn ChainReader,
    org: &OrgContext,
    proxy: Address,
    role: RoleBytes,
) -> PermissionResult<RolePermissionState> {
    let apps = reader.apps().await?;
    let app = find_app(&apps, proxy)?.clone();
    let manager = reader.get_manager(proxy, role).await?;
    let grantees = reader.get_grantees(proxy, role).await?;
    tracing::debug!(%proxy, %role, %manager, grantees = grantees.len(), "Loaded role permission");

    let ctx = org.classify_ctx(&apps);
    let role = role_or_unknown(&app, role);
    Ok(RolePermissionState::from_parts(app, role, manager, &grantees, &ctx))
}
