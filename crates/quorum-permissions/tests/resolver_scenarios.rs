//! Manage and assign panel flows against a recording call sink and a chain
//! snapshot.

use assert_matches::assert_matches;
use async_trait::async_trait;
use parking_lot::Mutex;
use proptest::prelude::*;
use quorum_core::{Address, AppInstance, ChainReader, Entity, QuorumResult, Role, RoleBytes, SnapshotChain};
use quorum_permissions::{
    current_action, load_role_state, AssignPermissionPanel, ManageRolePanel, OrgContext,
    PermissionAction, PermissionActions, PermissionError, PermissionIntent, UpdateAction,
};

const GRANTEE: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
const MANAGER: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
const ZERO: &str = "0x0000000000000000000000000000000000000000";

#[derive(Default)]
struct RecordingActions {
    calls: Mutex<Vec<PermissionIntent>>,
}

impl RecordingActions {
    fn calls(&self) -> Vec<PermissionIntent> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl PermissionActions for RecordingActions {
    async fn create_permission(
        &self,
        grantee: Address,
        proxy: Address,
        role: RoleBytes,
        manager: Address,
    ) -> QuorumResult<()> {
        self.calls.lock().push(PermissionIntent::CreatePermission {
            grantee,
            proxy,
            role,
            manager,
        });
        Ok(())
    }

    async fn set_manager(&self, manager: Address, proxy: Address, role: RoleBytes) -> QuorumResult<()> {
        self.calls
            .lock()
            .push(PermissionIntent::SetManager { manager, proxy, role });
        Ok(())
    }

    async fn remove_manager(&self, proxy: Address, role: RoleBytes) -> QuorumResult<()> {
        self.calls.lock().push(PermissionIntent::RemoveManager { proxy, role });
        Ok(())
    }

    async fn grant_permission(&self, grantee: Address, proxy: Address, role: RoleBytes) -> QuorumResult<()> {
        self.calls
            .lock()
            .push(PermissionIntent::GrantPermission { grantee, proxy, role });
        Ok(())
    }
}

fn proxy() -> Address {
    Address::from_bytes([0x11; 20])
}

fn role_bytes() -> RoleBytes {
    RoleBytes::from_bytes([0x07; 32])
}

fn apps() -> Vec<AppInstance> {
    vec![
        AppInstance {
            proxy_address: proxy(),
            name: Some("Finance".into()),
            app_id: Some("finance.aragonpm.eth".into()),
            icons: vec![],
            roles: vec![Role {
                bytes: role_bytes(),
                name: Some("Create new payments".into()),
                id: Some("CREATE_PAYMENTS_ROLE".into()),
            }],
        },
        AppInstance {
            proxy_address: Address::from_bytes([0x22; 20]),
            name: None,
            app_id: None,
            icons: vec![],
            roles: vec![],
        },
    ]
}

async fn open_panel(chain: &SnapshotChain) -> ManageRolePanel {
    ManageRolePanel::open_from_chain(chain, &OrgContext::default(), proxy(), role_bytes())
        .await
        .unwrap()
}

// ============================================================================
// Empty manager
// ============================================================================

#[tokio::test]
async fn empty_manager_offers_initialize_only() {
    let chain = SnapshotChain::new(apps());
    let actions = RecordingActions::default();
    let mut panel = open_panel(&chain).await;

    assert_eq!(panel.current_action(), PermissionAction::CreatePermission);
    assert_eq!(panel.title(), "Initialize permission");
    assert_eq!(panel.submit_label(), Some("Initialize permission"));
    assert!(!panel.shows_update_actions());
    assert!(panel.shows_grantee());

    // Without a grantee the form is refused.
    panel.set_manager_address(MANAGER);
    assert!(!panel.can_submit());
    assert_matches!(
        panel.submit(&actions).await,
        Err(PermissionError::Validation { .. })
    );
    assert!(panel.is_open());
    assert!(actions.calls().is_empty());

    panel.set_grantee_address(GRANTEE);
    assert!(panel.can_submit());
    panel.submit(&actions).await.unwrap();

    assert_eq!(
        actions.calls(),
        vec![PermissionIntent::CreatePermission {
            grantee: Address::parse(GRANTEE).unwrap(),
            proxy: proxy(),
            role: role_bytes(),
            manager: Address::parse(MANAGER).unwrap(),
        }]
    );
    assert!(!panel.is_open());
    assert_eq!(panel.grantee_selector().selection().address, "");
}

#[tokio::test]
async fn create_boundaries() {
    let chain = SnapshotChain::new(apps());
    let mut panel = open_panel(&chain).await;

    panel.set_grantee_address(ZERO);
    panel.set_manager_address(MANAGER);
    assert!(!panel.can_submit(), "zero grantee");

    panel.set_grantee_address(GRANTEE);
    panel.set_manager_address(ZERO);
    assert!(!panel.can_submit(), "zero manager");

    panel.set_manager_address("0xbbbb");
    assert!(!panel.can_submit(), "short manager");

    panel.set_manager_address(&format!("  {MANAGER}  "));
    assert!(panel.can_submit(), "padded manager is trimmed");

    // "Any account" is a valid grantee.
    panel.select_grantee(1);
    assert!(panel.can_submit());
    assert_matches!(
        panel.intent(),
        Ok(PermissionIntent::CreatePermission { grantee, .. }) if grantee == Address::ANY_ENTITY
    );
}

// ============================================================================
// Discarded manager
// ============================================================================

#[tokio::test]
async fn burned_manager_is_view_only() {
    let chain = SnapshotChain::new(apps());
    chain
        .create(proxy(), role_bytes(), Address::parse(GRANTEE).unwrap(), Address::parse(MANAGER).unwrap())
        .unwrap();
    chain.burn_manager(proxy(), role_bytes()).unwrap();

    let actions = RecordingActions::default();
    let mut panel = open_panel(&chain).await;
    assert_eq!(panel.title(), "View permission");
    assert_eq!(panel.submit_label(), None);
    assert!(panel.shows_manager());
    assert_eq!(panel.manager_display().text(None), "Discarded");

    for index in 0..UpdateAction::all().len() {
        panel.select_update_action(index);
        panel.set_manager_address(MANAGER);
        panel.set_grantee_address(GRANTEE);
        assert_eq!(panel.current_action(), PermissionAction::ViewPermission);
        assert!(!panel.can_submit());
        assert!(panel.submit(&actions).await.is_err());
    }
    assert!(actions.calls().is_empty());
}

// ============================================================================
// Live manager
// ============================================================================

#[tokio::test]
async fn remove_manager_burns_on_next_read() {
    let chain = SnapshotChain::new(apps());
    chain
        .create(proxy(), role_bytes(), Address::parse(GRANTEE).unwrap(), Address::parse(MANAGER).unwrap())
        .unwrap();

    let mut panel = open_panel(&chain).await;
    assert_eq!(panel.current_action(), PermissionAction::NoUpdateAction);
    assert!(!panel.can_submit());

    panel.select_update_action(2);
    assert_eq!(panel.current_action(), PermissionAction::RemovePermissionManager);
    assert!(panel.can_submit());

    let intent = panel.submit(&chain).await.unwrap();
    assert_eq!(intent, PermissionIntent::RemoveManager { proxy: proxy(), role: role_bytes() });
    assert!(!panel.is_open());
    assert_eq!(
        chain.get_manager(proxy(), role_bytes()).await.unwrap(),
        Address::DEFAULT_BURN
    );

    let reopened = open_panel(&chain).await;
    assert_eq!(reopened.current_action(), PermissionAction::ViewPermission);
}

#[tokio::test]
async fn change_manager_requires_valid_input() {
    let chain = SnapshotChain::new(apps());
    chain
        .create(proxy(), role_bytes(), Address::parse(GRANTEE).unwrap(), Address::parse(MANAGER).unwrap())
        .unwrap();
    let actions = RecordingActions::default();
    let mut panel = open_panel(&chain).await;

    panel.select_update_action(1);
    assert_eq!(panel.manager_field_label(), Some("New manager"));
    assert!(!panel.can_submit());
    panel.set_manager_address(ZERO);
    assert!(!panel.can_submit());

    // Named apps only: index 1 is Finance, the unnamed app is not offered.
    assert_eq!(panel.manager_selector().items(), vec!["Custom address", "Finance"]);
    panel.select_manager(1);
    assert!(panel.can_submit());
    panel.submit(&actions).await.unwrap();
    assert_eq!(
        actions.calls(),
        vec![PermissionIntent::SetManager {
            manager: proxy(),
            proxy: proxy(),
            role: role_bytes()
        }]
    );
}

#[tokio::test]
async fn stale_panel_is_refused() {
    let chain = SnapshotChain::new(apps());
    let org = OrgContext::default();
    chain
        .create(proxy(), role_bytes(), Address::parse(GRANTEE).unwrap(), Address::parse(MANAGER).unwrap())
        .unwrap();
    let mut panel = open_panel(&chain).await;
    panel.select_update_action(2);

    // Someone else discards the manager meanwhile.
    chain.burn_manager(proxy(), role_bytes()).unwrap();

    let actions = RecordingActions::default();
    assert_matches!(
        panel.submit_checked(&chain, &org, &actions).await,
        Err(PermissionError::StaleState {
            expected: PermissionAction::RemovePermissionManager,
            found: PermissionAction::ViewPermission
        })
    );
    assert!(panel.is_open());
    assert!(actions.calls().is_empty());
}

#[tokio::test]
async fn orphan_grantees_are_reported() {
    let json = format!(
        r#"{{
            "apps": [{{"proxy_address": "{proxy}", "name": "Finance", "roles": [{{"bytes": "{role}"}}]}}],
            "permissions": [{{"app": "{proxy}", "role": "{role}", "manager": "{ZERO}", "grantees": ["{GRANTEE}"]}}]
        }}"#,
        proxy = proxy().to_lower_hex(),
        role = role_bytes(),
    );
    let chain = SnapshotChain::from_json(&json).unwrap();
    let state = load_role_state(&chain, &OrgContext::default(), proxy(), role_bytes())
        .await
        .unwrap();
    assert_eq!(state.consistency, quorum_permissions::Consistency::OrphanGrantees);
    assert_eq!(state.action(UpdateAction::NoUpdate), PermissionAction::CreatePermission);
}

// ============================================================================
// Assign
// ============================================================================

#[tokio::test]
async fn assign_grants_selected_role() {
    let actions = RecordingActions::default();
    let mut panel = AssignPermissionPanel::open(&apps());

    assert_eq!(panel.app_items(), vec!["Select an app", "Finance"]);
    assert!(panel.role_items().is_empty());

    panel.set_grantee_address(GRANTEE);
    assert!(!panel.can_submit());

    panel.select_app(1);
    assert_eq!(panel.role_items(), vec!["Select an action", "Create new payments"]);
    assert!(!panel.can_submit());

    panel.select_role(1);
    assert!(panel.can_submit());

    // Re-selecting the app resets the role.
    panel.select_app(1);
    assert_eq!(panel.role_index(), 0);
    assert!(!panel.can_submit());

    panel.select_role(1);
    panel.submit(&actions).await.unwrap();
    assert_eq!(
        actions.calls(),
        vec![PermissionIntent::GrantPermission {
            grantee: Address::parse(GRANTEE).unwrap(),
            proxy: proxy(),
            role: role_bytes(),
        }]
    );
    assert!(!panel.is_open());
    assert_matches!(panel.submit(&actions).await, Err(PermissionError::PanelClosed));
}

// ============================================================================
// Properties
// ============================================================================

fn manager_strategy() -> impl Strategy<Value = Entity> {
    prop_oneof![
        Just(Entity::None),
        Just(Entity::Burn { address: Address::DEFAULT_BURN }),
        any::<[u8; 20]>().prop_map(|b| Entity::Account { address: Address::from_bytes(b) }),
        any::<[u8; 20]>().prop_map(|b| Entity::Dao { address: Address::from_bytes(b) }),
    ]
}

proptest! {
    #[test]
    fn current_action_is_exclusive(manager in manager_strategy(), index in 0usize..5) {
        let choice = UpdateAction::from_index(index);
        let action = current_action(&manager, choice);
        match manager {
            Entity::None => prop_assert_eq!(action, PermissionAction::CreatePermission),
            Entity::Burn { .. } => prop_assert_eq!(action, PermissionAction::ViewPermission),
            _ => {
                prop_assert!(action.is_update());
                prop_assert_eq!(action, PermissionAction::from(choice));
            }
        }
    }
}
