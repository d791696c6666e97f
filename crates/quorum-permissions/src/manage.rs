//! # Manage Role Panel
//!
//! Panel state for one role of one app. The manager entity is captured when
//! the panel opens; the user's dropdown choice and form inputs live in the
//! draft, which [`ManageRolePanel::close`] resets.

use crate::action::{PermissionAction, UpdateAction};
use crate::entity_selector::{EntitySelection, EntitySelector};
use crate::errors::{PermissionError, PermissionResult};
use crate::intent::{PermissionActions, PermissionIntent};
use crate::state::{load_role_state, ManagerDisplay, OrgContext, RolePermissionState};
use crate::validation::filter_non_empty_address;
use quorum_core::{classify, Address, AppInstance, ChainReader, Entity, Role, RoleBytes};

#[derive(Debug, Clone)]
struct ManageDraft {
    update_action: UpdateAction,
    grantee: EntitySelector,
    manager: EntitySelector,
}

impl ManageDraft {
    fn new(apps: &[AppInstance]) -> Self {
        Self {
            update_action: UpdateAction::NoUpdate,
            grantee: EntitySelector::new(apps, true),
            manager: EntitySelector::new(apps, false),
        }
    }
}

/// Manage-permission side panel.
#[derive(Debug, Clone)]
pub struct ManageRolePanel {
    opened: bool,
    app: AppInstance,
    role: Role,
    manager: Entity,
    apps: Vec<AppInstance>,
    draft: ManageDraft,
}

impl ManageRolePanel {
    /// Open the panel for a loaded permission. `apps` feeds the entity
    /// selectors (only named apps are offered).
    pub fn open(state: &RolePermissionState, apps: &[AppInstance]) -> Self {
        tracing::debug!(
            proxy = %state.app.proxy_address,
            role = %state.role.bytes,
            action = ?state.action(UpdateAction::NoUpdate),
            "Opening manage panel"
        );
        Self {
            opened: true,
            app: state.app.clone(),
            role: state.role.clone(),
            manager: state.manager.clone(),
            apps: apps.to_vec(),
            draft: ManageDraft::new(apps),
        }
    }

    /// Load `(proxy, role)` from the chain and open the panel on it.
    pub async fn open_from_chain(
        reader: &dyn ChainReader,
        org: &OrgContext,
        proxy: Address,
        role: RoleBytes,
    ) -> PermissionResult<Self> {
        let state = load_role_state(reader, org, proxy, role).await?;
        let apps = reader.apps().await?;
        Ok(Self::open(&state, &apps))
    }

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// App the role belongs to.
    pub fn app(&self) -> &AppInstance {
        &self.app
    }

    /// Role being managed.
    pub fn role(&self) -> &Role {
        &self.role
    }

    /// Manager entity captured at open.
    pub fn manager(&self) -> &Entity {
        &self.manager
    }

    // ------------------------------------------------------------------------
    // Derived view
    // ------------------------------------------------------------------------

    /// The legal action right now.
    pub fn current_action(&self) -> PermissionAction {
        crate::action::current_action(&self.manager, self.draft.update_action)
    }

    /// Panel title.
    pub fn title(&self) -> &'static str {
        self.current_action().title()
    }

    /// Role description field.
    pub fn action_description(&self) -> String {
        self.role.label()
    }

    /// Whether the manager field is shown.
    pub fn shows_manager(&self) -> bool {
        let action = self.current_action();
        action == PermissionAction::ViewPermission || action.is_update()
    }

    /// Manager field rendering.
    pub fn manager_display(&self) -> ManagerDisplay {
        ManagerDisplay::for_entity(&self.manager)
    }

    /// Whether the update-action dropdown is shown.
    pub fn shows_update_actions(&self) -> bool {
        self.current_action().is_update()
    }

    /// Update-action dropdown items.
    pub fn update_action_items(&self) -> Vec<&'static str> {
        UpdateAction::items()
    }

    /// Active dropdown index.
    pub fn update_action_index(&self) -> usize {
        self.draft.update_action.index()
    }

    /// Label of the manager selector, for the actions that show one.
    pub fn manager_field_label(&self) -> Option<&'static str> {
        match self.current_action() {
            PermissionAction::SetPermissionManager => Some("New manager"),
            PermissionAction::CreatePermission => Some("Manager"),
            _ => None,
        }
    }

    /// Whether the grantee selector is shown.
    pub fn shows_grantee(&self) -> bool {
        self.current_action() == PermissionAction::CreatePermission
    }

    /// Submit button label, if any.
    pub fn submit_label(&self) -> Option<&'static str> {
        self.current_action().submit_label()
    }

    /// Info text for the current action.
    pub fn message(&self) -> Option<&'static str> {
        self.current_action().message()
    }

    /// Grantee selector (create flow).
    pub fn grantee_selector(&self) -> &EntitySelector {
        &self.draft.grantee
    }

    /// Manager selector (create and set flows).
    pub fn manager_selector(&self) -> &EntitySelector {
        &self.draft.manager
    }

    // ------------------------------------------------------------------------
    // Draft input
    // ------------------------------------------------------------------------

    /// Pick an update action by dropdown index.
    pub fn select_update_action(&mut self, index: usize) {
        self.draft.update_action = UpdateAction::from_index(index);
    }

    /// Choose a grantee item.
    pub fn select_grantee(&mut self, index: usize) -> EntitySelection {
        self.draft.grantee.select(index)
    }

    /// Type a custom grantee address.
    pub fn set_grantee_address(&mut self, value: &str) -> EntitySelection {
        self.draft.grantee.set_custom_address(value)
    }

    /// Choose a manager item.
    pub fn select_manager(&mut self, index: usize) -> EntitySelection {
        self.draft.manager.select(index)
    }

    /// Type a custom manager address.
    pub fn set_manager_address(&mut self, value: &str) -> EntitySelection {
        self.draft.manager.set_custom_address(value)
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Whether the form can be submitted.
    pub fn can_submit(&self) -> bool {
        self.intent().is_ok()
    }

    /// The call the form would issue, or why it cannot.
    pub fn intent(&self) -> PermissionResult<PermissionIntent> {
        let proxy = self.app.proxy_address;
        let role = self.role.bytes;
        match self.current_action() {
            PermissionAction::RemovePermissionManager => Ok(PermissionIntent::RemoveManager { proxy, role }),
            PermissionAction::SetPermissionManager => {
                let manager = self.new_manager()?;
                Ok(PermissionIntent::SetManager {
                    manager,
                    proxy,
                    role,
                })
            }
            PermissionAction::CreatePermission => {
                let grantee = filter_non_empty_address(&self.draft.grantee.selection().address)
                    .ok_or_else(|| PermissionError::validation("grantee is not a valid address"))?;
                let manager = self.new_manager()?;
                Ok(PermissionIntent::CreatePermission {
                    grantee,
                    proxy,
                    role,
                    manager,
                })
            }
            PermissionAction::ViewPermission => {
                Err(PermissionError::validation("permission manager was discarded"))
            }
            PermissionAction::NoUpdateAction => Err(PermissionError::validation("no action selected")),
        }
    }

    /// Issue exactly one call for the current action, then close the panel.
    ///
    /// The panel closes once the call has been issued, whether or not the
    /// call itself succeeded. Refused submissions leave the panel open.
    pub async fn submit(&mut self, actions: &dyn PermissionActions) -> PermissionResult<PermissionIntent> {
        if !self.opened {
            return Err(PermissionError::PanelClosed);
        }
        let intent = self.intent()?;
        let issued = intent.dispatch(actions).await;
        self.close();
        issued?;
        Ok(intent)
    }

    /// Like [`submit`](Self::submit), but first re-reads the manager and
    /// refuses with `StaleState` if the derived action changed.
    pub async fn submit_checked(
        &mut self,
        reader: &dyn ChainReader,
        org: &OrgContext,
        actions: &dyn PermissionActions,
    ) -> PermissionResult<PermissionIntent> {
        if !self.opened {
            return Err(PermissionError::PanelClosed);
        }
        let apps = reader.apps().await?;
        let fresh = reader.get_manager(self.app.proxy_address, self.role.bytes).await?;
        let fresh = classify(fresh, &org.classify_ctx(&apps));

        let expected = self.current_action();
        let found = crate::action::current_action(&fresh, self.draft.update_action);
        if expected != found {
            tracing::warn!(?expected, ?found, "Permission changed under the panel");
            return Err(PermissionError::StaleState { expected, found });
        }
        self.submit(actions).await
    }

    /// Close the panel and reset the draft.
    pub fn close(&mut self) {
        self.opened = false;
        self.draft = ManageDraft::new(&self.apps);
    }

    fn new_manager(&self) -> PermissionResult<Address> {
        filter_non_empty_address(&self.draft.manager.selection().address)
            .ok_or_else(|| PermissionError::validation("manager is not a valid address"))
    }
}
