//! # Assign Permission Panel
//!
//! Grant an existing role to another entity: pick an app, pick one of its
//! roles, pick a grantee.

use crate::entity_selector::{EntitySelection, EntitySelector};
use crate::errors::{PermissionError, PermissionResult};
use crate::intent::{PermissionActions, PermissionIntent};
use crate::validation::filter_non_empty_address;
use quorum_core::{named_apps, AppInstance, Role};

/// Add-permission side panel.
#[derive(Debug, Clone)]
pub struct AssignPermissionPanel {
    opened: bool,
    apps: Vec<AppInstance>,
    app_index: usize,
    role_index: usize,
    grantee: EntitySelector,
}

impl AssignPermissionPanel {
    /// Panel title and submit label.
    pub const TITLE: &'static str = "Add permission";

    /// Open the panel. Only named apps are offered.
    pub fn open(apps: &[AppInstance]) -> Self {
        Self {
            opened: true,
            apps: named_apps(apps).into_iter().cloned().collect(),
            app_index: 0,
            role_index: 0,
            grantee: EntitySelector::new(apps, true),
        }
    }

    /// Whether the panel is open.
    pub fn is_open(&self) -> bool {
        self.opened
    }

    /// App dropdown: `Select an app` then every named app.
    pub fn app_items(&self) -> Vec<String> {
        let mut items = vec!["Select an app".to_string()];
        items.extend(self.apps.iter().map(AppInstance::display_name));
        items
    }

    /// Active app dropdown index (0 = none).
    pub fn app_index(&self) -> usize {
        self.app_index
    }

    /// Choose an app; the role choice resets to "none selected".
    pub fn select_app(&mut self, index: usize) {
        self.app_index = if index <= self.apps.len() { index } else { 0 };
        self.role_index = 0;
    }

    /// The chosen app.
    pub fn selected_app(&self) -> Option<&AppInstance> {
        self.app_index
            .checked_sub(1)
            .and_then(|i| self.apps.get(i))
    }

    /// Roles of the chosen app; empty when no app is chosen.
    pub fn roles(&self) -> &[Role] {
        self.selected_app().map(|app| app.roles.as_slice()).unwrap_or(&[])
    }

    /// Role dropdown: `Select an action` then every role label. Empty when
    /// no app is chosen (the dropdown is hidden).
    pub fn role_items(&self) -> Vec<String> {
        if self.selected_app().is_none() {
            return Vec::new();
        }
        let mut items = vec!["Select an action".to_string()];
        items.extend(self.roles().iter().map(Role::label));
        items
    }

    /// Active role dropdown index (0 = none).
    pub fn role_index(&self) -> usize {
        self.role_index
    }

    /// Choose a role by dropdown index.
    pub fn select_role(&mut self, index: usize) {
        self.role_index = if index <= self.roles().len() { index } else { 0 };
    }

    /// The chosen role.
    pub fn selected_role(&self) -> Option<&Role> {
        self.role_index
            .checked_sub(1)
            .and_then(|i| self.roles().get(i))
    }

    /// Grantee selector.
    pub fn grantee_selector(&self) -> &EntitySelector {
        &self.grantee
    }

    /// Choose a grantee item.
    pub fn select_grantee(&mut self, index: usize) -> EntitySelection {
        self.grantee.select(index)
    }

    /// Type a custom grantee address.
    pub fn set_grantee_address(&mut self, value: &str) -> EntitySelection {
        self.grantee.set_custom_address(value)
    }

    /// Whether the form can be submitted.
    pub fn can_submit(&self) -> bool {
        self.intent().is_ok()
    }

    /// The grant the form would issue, or why it cannot.
    pub fn intent(&self) -> PermissionResult<PermissionIntent> {
        let grantee = filter_non_empty_address(&self.grantee.selection().address)
            .ok_or_else(|| PermissionError::validation("grantee is not a valid address"))?;
        let app = self
            .selected_app()
            .ok_or_else(|| PermissionError::validation("no app selected"))?;
        let role = self
            .selected_role()
            .ok_or_else(|| PermissionError::validation("no action selected"))?;
        Ok(PermissionIntent::GrantPermission {
            grantee,
            proxy: app.proxy_address,
            role: role.bytes,
        })
    }

    /// Issue `grant_permission`, then close the panel.
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

    /// Close the panel and reset every choice.
    pub fn close(&mut self) {
        self.opened = false;
        self.app_index = 0;
        self.role_index = 0;
        self.grantee.reset();
    }
}
