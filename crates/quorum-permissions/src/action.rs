//! # Permission Actions
//!
//! The legal administrative action on a role is derived from two inputs:
//! the manager entity read from chain, and the update the user picked in the
//! dropdown. Neither input is stored as "the action"; [`current_action`]
//! recomputes it on every call.

use quorum_core::{Entity, EntityKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// Derived Action
// ============================================================================

/// What the manage panel is doing for a role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PermissionAction {
    /// No manager yet: choose a first grantee and a manager
    CreatePermission,
    /// Manager discarded: read-only
    ViewPermission,
    /// Re-point the manager
    SetPermissionManager,
    /// Discard the manager
    RemovePermissionManager,
    /// Live permission, nothing chosen yet
    NoUpdateAction,
}

impl PermissionAction {
    /// Whether this is one of the dropdown-driven update actions.
    #[must_use]
    pub fn is_update(self) -> bool {
        matches!(
            self,
            Self::SetPermissionManager | Self::RemovePermissionManager | Self::NoUpdateAction
        )
    }

    /// Panel title.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::CreatePermission => "Initialize permission",
            Self::ViewPermission => "View permission",
            Self::SetPermissionManager | Self::RemovePermissionManager | Self::NoUpdateAction => {
                "Manage permission"
            }
        }
    }

    /// Button label on the role row that opens the panel.
    #[must_use]
    pub fn row_button_label(self) -> &'static str {
        match self {
            Self::CreatePermission => "Initialize",
            Self::ViewPermission => "View",
            Self::SetPermissionManager | Self::RemovePermissionManager | Self::NoUpdateAction => {
                "Manage"
            }
        }
    }

    /// Submit button label; `None` when the panel has no submit button.
    #[must_use]
    pub fn submit_label(self) -> Option<&'static str> {
        match self {
            Self::CreatePermission => Some("Initialize permission"),
            Self::ViewPermission => None,
            Self::SetPermissionManager | Self::RemovePermissionManager | Self::NoUpdateAction => {
                Some("Update permission")
            }
        }
    }

    /// Explanatory text shown under the form.
    #[must_use]
    pub fn message(self) -> Option<&'static str> {
        match self {
            Self::CreatePermission => Some(
                "This permission has not been initialized yet. Choose the first entity \
                 allowed to perform the action and the manager that will control it.",
            ),
            Self::ViewPermission => Some(
                "The manager of this permission was discarded. It can no longer be granted, \
                 revoked or re-assigned.",
            ),
            Self::SetPermissionManager => Some(
                "The new manager will be able to grant and revoke this permission, and to \
                 pass management on again.",
            ),
            Self::RemovePermissionManager => Some(
                "Removing the manager freezes this permission: its current grantees stay \
                 and nobody will be able to change them.",
            ),
            Self::NoUpdateAction => None,
        }
    }
}

// ============================================================================
// User Choice
// ============================================================================

/// The update action picked in the dropdown, in dropdown order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdateAction {
    /// "Select an action"
    #[default]
    NoUpdate,
    /// "Change the manager"
    SetManager,
    /// "Remove the manager"
    RemoveManager,
}

impl UpdateAction {
    /// All choices in dropdown order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[Self::NoUpdate, Self::SetManager, Self::RemoveManager]
    }

    /// Choice at a dropdown index; anything out of range is `NoUpdate`.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self::all().get(index).copied().unwrap_or_default()
    }

    /// Dropdown index of this choice.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::NoUpdate => 0,
            Self::SetManager => 1,
            Self::RemoveManager => 2,
        }
    }

    /// Dropdown item text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NoUpdate => "Select an action",
            Self::SetManager => "Change the manager",
            Self::RemoveManager => "Remove the manager",
        }
    }

    /// Dropdown items in order.
    #[must_use]
    pub fn items() -> Vec<&'static str> {
        Self::all().iter().map(|a| a.label()).collect()
    }
}

impl From<UpdateAction> for PermissionAction {
    fn from(choice: UpdateAction) -> Self {
        match choice {
            UpdateAction::NoUpdate => Self::NoUpdateAction,
            UpdateAction::SetManager => Self::SetPermissionManager,
            UpdateAction::RemoveManager => Self::RemovePermissionManager,
        }
    }
}

/// Derive the current action from the manager entity and the user's choice.
///
/// An unset manager always means `CreatePermission` and a discarded manager
/// always means `ViewPermission`, whatever was chosen.
#[must_use]
pub fn current_action(manager: &Entity, choice: UpdateAction) -> PermissionAction {
    match manager.kind() {
        EntityKind::None => PermissionAction::CreatePermission,
        EntityKind::Burn => PermissionAction::ViewPermission,
        EntityKind::Account | EntityKind::App | EntityKind::Dao | EntityKind::Any => choice.into(),
    }
}
