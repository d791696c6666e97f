//! Quorum Permissions - Permission Action Resolver
//!
//! Decides, for a role on an app instance, which administrative action is
//! legal and what call taking it issues.
//!
//! - [`current_action`] derives the action from the manager entity and the
//!   user's dropdown choice
//! - [`ManageRolePanel`] drives initialize / change-manager / remove-manager
//! - [`AssignPermissionPanel`] drives granting an existing role
//! - [`PermissionActions`] is the seam the resulting [`PermissionIntent`] is
//!   dispatched through
//! - [`browse`] builds the read-only permission tables

#![forbid(unsafe_code)]

pub mod action;
pub mod assign;
pub mod browse;
pub mod entity_selector;
pub mod errors;
pub mod intent;
pub mod manage;
pub mod state;
pub mod validation;

pub use action::{current_action, PermissionAction, UpdateAction};
pub use assign::AssignPermissionPanel;
pub use browse::{app_roles, roles_by_entity, EntityRole, EntityRoles, RoleRow};
pub use entity_selector::{EntitySelection, EntitySelector};
pub use errors::{PermissionError, PermissionResult};
pub use intent::{PermissionActions, PermissionIntent};
pub use manage::ManageRolePanel;
pub use state::{load_role_state, Consistency, ManagerDisplay, OrgContext, RolePermissionState};
pub use validation::{filter_address, filter_non_empty_address};
