//! Browse views over the permission set.

use crate::action::{current_action, PermissionAction, UpdateAction};
use crate::errors::PermissionResult;
use crate::state::{find_app, role_or_unknown, ManagerDisplay, OrgContext};
use quorum_core::{
    classify, classify_grantee, Address, AppInstance, ChainReader, ClassifyContext, Entity,
    PermissionRecord, Role, RoleBytes,
};

/// Label used for roles without a name.
pub const UNKNOWN_ROLE: &str = "Unknown";

/// A role held by an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRole {
    /// App proxy
    pub proxy: Address,
    /// Role identifier
    pub role_bytes: RoleBytes,
    /// App metadata, if the proxy is an installed app
    pub app: Option<AppInstance>,
    /// Role metadata, if the app declares it
    pub role: Option<Role>,
}

impl EntityRole {
    /// Short label: role name or `Unknown`.
    pub fn label(&self) -> String {
        self.role
            .as_ref()
            .and_then(|r| r.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_ROLE.to_string())
    }

    /// Hover title naming the app the role comes from.
    pub fn title(&self) -> String {
        let name = self.role.as_ref().and_then(|r| r.name.clone());
        match (&self.app, name) {
            (Some(app), name) => format!(
                "{} (from app: {})",
                name.unwrap_or_else(|| self.role_bytes.to_string()),
                app.display_name()
            ),
            (None, Some(name)) => format!("{name} from unknown"),
            (None, None) => "Unknown (from unknown)".to_string(),
        }
    }

    fn is_unknown(&self) -> bool {
        self.label() == UNKNOWN_ROLE
    }
}

/// One row of the browse-by-entity table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRoles {
    /// The grantee
    pub entity: Entity,
    /// Roles held, deduplicated, unknown roles last
    pub roles: Vec<EntityRole>,
}

impl EntityRoles {
    /// "Type" column.
    pub fn type_label(&self) -> &'static str {
        self.entity.kind().type_label()
    }

    /// Role labels in display order.
    pub fn role_labels(&self) -> Vec<String> {
        self.roles.iter().map(EntityRole::label).collect()
    }
}

/// Group grantees across all permissions, in first-seen order.
pub fn roles_by_entity(permissions: &[PermissionRecord], ctx: &ClassifyContext<'_>) -> Vec<EntityRoles> {
    let mut rows: Vec<EntityRoles> = Vec::new();
    for permission in permissions {
        let app = ctx
            .apps
            .iter()
            .find(|a| a.proxy_address == permission.app)
            .cloned();
        let role = app.as_ref().and_then(|a| a.role(&permission.role).cloned());
        for grantee in &permission.grantees {
            let entity = classify_grantee(*grantee, ctx);
            let held = EntityRole {
                proxy: permission.app,
                role_bytes: permission.role,
                app: app.clone(),
                role: role.clone(),
            };
            match rows.iter_mut().find(|row| row.entity.address() == entity.address()) {
                Some(row) => {
                    let duplicate = row
                        .roles
                        .iter()
                        .any(|r| r.proxy == held.proxy && r.role_bytes == held.role_bytes);
                    if !duplicate {
                        row.roles.push(held);
                    }
                }
                None => rows.push(EntityRoles {
                    entity,
                    roles: vec![held],
                }),
            }
        }
    }
    for row in &mut rows {
        row.roles.sort_by_key(EntityRole::is_unknown);
    }
    rows
}

/// One row of an app's "actions available" table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRow {
    /// Declared role
    pub role: Role,
    /// Classified manager
    pub manager: Entity,
}

impl RoleRow {
    /// Action the manage panel would open with.
    pub fn action(&self) -> PermissionAction {
        current_action(&self.manager, UpdateAction::NoUpdate)
    }

    /// Button label: `Initialize`, `View` or `Manage`.
    pub fn button_label(&self) -> &'static str {
        self.action().row_button_label()
    }

    /// "Managed by" column.
    pub fn manager_display(&self) -> ManagerDisplay {
        ManagerDisplay::for_entity(&self.manager)
    }
}

/// Every declared role of an app with its current manager.
pub async fn app_roles(
    reader: &dyn ChainReader,
    org: &OrgContext,
    proxy: Address,
) -> PermissionResult<Vec<RoleRow>> {
    let apps = reader.apps().await?;
    let app = find_app(&apps, proxy)?;
    let ctx = org.classify_ctx(&apps);
    let mut rows = Vec::with_capacity(app.roles.len());
    for role in &app.roles {
        let manager = reader.get_manager(proxy, role.bytes).await?;
        rows.push(RoleRow {
            role: role_or_unknown(app, role.bytes),
            manager: classify(manager, &ctx),
        });
    }
    Ok(rows)
}
