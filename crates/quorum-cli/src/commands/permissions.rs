// Permission inspection and management over a chain snapshot
//
// Read commands print the browse tables; write commands drive the same
// panels a frontend would and save the snapshot back.

use crate::commands::common;
use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use quorum_core::{named_apps, Address, AppInstance, ChainReader, QuorumConfig, RoleBytes, SnapshotChain};
use quorum_identity::LocalIdentityDirectory;
use quorum_permissions::{
    app_roles, load_role_state, roles_by_entity, AssignPermissionPanel, Consistency, ManageRolePanel,
    OrgContext, UpdateAction,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args)]
pub struct PermissionsArgs {
    /// Chain snapshot (JSON)
    #[arg(short, long)]
    snapshot: PathBuf,

    #[command(subcommand)]
    command: PermissionsCommand,
}

#[derive(Subcommand)]
pub enum PermissionsCommand {
    /// List installed apps
    Apps,

    /// List the roles of an app with their managers
    Roles {
        /// App proxy address
        app: String,
    },

    /// List every grantee with the roles it holds
    Entities,

    /// Show one permission
    Show {
        /// App proxy address
        app: String,
        /// Role bytes, id or name
        role: String,
    },

    /// Initialize a permission with its first grantee and manager
    Create {
        /// App proxy address
        app: String,
        /// Role bytes, id or name
        role: String,
        /// First grantee
        #[arg(long)]
        grantee: String,
        /// Manager
        #[arg(long)]
        manager: String,
    },

    /// Change the manager of a permission
    SetManager {
        /// App proxy address
        app: String,
        /// Role bytes, id or name
        role: String,
        /// New manager
        #[arg(long)]
        manager: String,
    },

    /// Discard the manager of a permission
    RemoveManager {
        /// App proxy address
        app: String,
        /// Role bytes, id or name
        role: String,
    },

    /// Grant an existing permission to another entity
    Grant {
        /// App proxy address
        app: String,
        /// Role bytes, id or name
        role: String,
        /// Grantee
        #[arg(long)]
        grantee: String,
    },
}

/// Run a permissions command against the snapshot file.
pub async fn handle_permissions_command(args: PermissionsArgs, config: &QuorumConfig) -> Result<()> {
    let chain = SnapshotChain::load_with_burn(&args.snapshot, config.burn_address)?;
    let mut org = OrgContext::from_config(config);
    org.burn_address = chain.burn_address();
    org.dao_address = chain.dao().or(org.dao_address);
    let apps = chain.apps().await?;
    let directory = common::open_directory(config).await?;

    match args.command {
        PermissionsCommand::Apps => {
            for app in &apps {
                println!("{}  {} ({} roles)", app.proxy_address, app.display_name(), app.roles.len());
            }
        }

        PermissionsCommand::Roles { app } => {
            let proxy = common::parse_address(&app)?;
            for row in app_roles(&chain, &org, proxy).await? {
                println!(
                    "{:<10} {:<40} managed by {}",
                    row.button_label(),
                    row.role.label(),
                    row.manager_display().text(Some(&directory))
                );
            }
        }

        PermissionsCommand::Entities => {
            let permissions = chain.permissions().await?;
            for row in roles_by_entity(&permissions, &org.classify_ctx(&apps)) {
                println!(
                    "{:<8} {:<44} {}",
                    row.type_label(),
                    entity_text(row.entity.address(), &directory),
                    row.role_labels().join(", ")
                );
            }
        }

        PermissionsCommand::Show { app, role } => {
            let (proxy, role) = resolve_target(&apps, &app, &role)?;
            let state = load_role_state(&chain, &org, proxy, role).await?;
            let panel = ManageRolePanel::open(&state, &apps);
            println!("{}", panel.title());
            println!("App:      {}", state.app.display_name());
            println!("Action:   {}", panel.action_description());
            println!("Manager:  {}", state.manager_display().text(Some(&directory)));
            for grantee in &state.grantees {
                println!("Grantee:  {}", entity_text(grantee.address(), &directory));
            }
            if state.consistency == Consistency::OrphanGrantees {
                println!("Warning:  grantees exist without a manager");
            }
            if let Some(message) = panel.message() {
                println!("{message}");
            }
        }

        PermissionsCommand::Create {
            app,
            role,
            grantee,
            manager,
        } => {
            let (proxy, role) = resolve_target(&apps, &app, &role)?;
            let mut panel = ManageRolePanel::open_from_chain(&chain, &org, proxy, role).await?;
            panel.set_grantee_address(&grantee);
            panel.set_manager_address(&manager);
            let intent = panel.submit_checked(&chain, &org, &chain).await?;
            save_snapshot(&chain, &args.snapshot).await?;
            info!(%intent, "Applied");
        }

        PermissionsCommand::SetManager { app, role, manager } => {
            let (proxy, role) = resolve_target(&apps, &app, &role)?;
            let mut panel = ManageRolePanel::open_from_chain(&chain, &org, proxy, role).await?;
            panel.select_update_action(UpdateAction::SetManager.index());
            panel.set_manager_address(&manager);
            let intent = panel.submit_checked(&chain, &org, &chain).await?;
            save_snapshot(&chain, &args.snapshot).await?;
            info!(%intent, "Applied");
        }

        PermissionsCommand::RemoveManager { app, role } => {
            let (proxy, role) = resolve_target(&apps, &app, &role)?;
            let mut panel = ManageRolePanel::open_from_chain(&chain, &org, proxy, role).await?;
            panel.select_update_action(UpdateAction::RemoveManager.index());
            let intent = panel.submit_checked(&chain, &org, &chain).await?;
            save_snapshot(&chain, &args.snapshot).await?;
            info!(%intent, "Applied");
        }

        PermissionsCommand::Grant { app, role, grantee } => {
            let (proxy, role) = resolve_target(&apps, &app, &role)?;
            let mut panel = AssignPermissionPanel::open(&apps);
            let app_index = named_apps(&apps)
                .iter()
                .position(|a| a.proxy_address == proxy)
                .ok_or_else(|| anyhow!("app {proxy} has no name and cannot be assigned"))?;
            panel.select_app(app_index + 1);
            let role_index = panel
                .roles()
                .iter()
                .position(|r| r.bytes == role)
                .ok_or_else(|| anyhow!("role {role} is not declared by the app"))?;
            panel.select_role(role_index + 1);
            panel.set_grantee_address(&grantee);
            let intent = panel.submit(&chain).await?;
            save_snapshot(&chain, &args.snapshot).await?;
            info!(%intent, "Applied");
        }
    }

    Ok(())
}

/// Resolve an app address and a role given as bytes, id or name.
fn resolve_target(apps: &[AppInstance], app: &str, role: &str) -> Result<(Address, RoleBytes)> {
    let proxy = common::parse_address(app)?;
    let role = role.trim();
    if role.starts_with("0x") {
        return Ok((proxy, RoleBytes::parse(role)?));
    }
    let instance = apps
        .iter()
        .find(|a| a.proxy_address == proxy)
        .ok_or_else(|| anyhow!("no app installed at {proxy}"))?;
    let found = instance
        .roles
        .iter()
        .find(|r| r.id.as_deref() == Some(role) || r.name.as_deref() == Some(role))
        .ok_or_else(|| anyhow!("{} declares no role {role:?}", instance.display_name()))?;
    Ok((proxy, found.bytes))
}

fn entity_text(address: Address, directory: &LocalIdentityDirectory) -> String {
    if address == Address::ANY_ENTITY {
        return "Any account".to_string();
    }
    match directory.resolve(&address) {
        Ok(record) => format!("{} ({})", record.name, address.shorten()),
        Err(_) => address.to_checksum(),
    }
}

async fn save_snapshot(chain: &SnapshotChain, path: &Path) -> Result<()> {
    tokio::fs::write(path, chain.to_json()?)
        .await
        .with_context(|| format!("writing snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_core::Role;

    fn finance() -> AppInstance {
        AppInstance {
            proxy_address: Address::from_bytes([0x11; 20]),
            name: Some("Finance".into()),
            app_id: None,
            icons: vec![],
            roles: vec![Role {
                bytes: RoleBytes::from_bytes([7; 32]),
                name: Some("Create new payments".into()),
                id: Some("CREATE_PAYMENTS_ROLE".into()),
            }],
        }
    }

    #[test]
    fn test_resolve_target_by_id_name_and_bytes() {
        let apps = vec![finance()];
        let proxy = apps[0].proxy_address.to_lower_hex();
        let expected = (apps[0].proxy_address, RoleBytes::from_bytes([7; 32]));
        assert_eq!(resolve_target(&apps, &proxy, "CREATE_PAYMENTS_ROLE").unwrap(), expected);
        assert_eq!(resolve_target(&apps, &proxy, "Create new payments").unwrap(), expected);
        assert_eq!(
            resolve_target(&apps, &proxy, &RoleBytes::from_bytes([7; 32]).to_string()).unwrap(),
            expected
        );
        assert!(resolve_target(&apps, &proxy, "TRANSFER_ROLE").is_err());
    }

    #[tokio::test]
    async fn test_create_then_remove_updates_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("chain.json");
        let chain = SnapshotChain::new(vec![finance()]);
        std::fs::write(&snapshot, chain.to_json().unwrap()).unwrap();

        let mut config = QuorumConfig::default();
        config.storage_dir = dir.path().join("labels");
        let app = finance().proxy_address.to_lower_hex();
        let run = |command| PermissionsArgs {
            snapshot: snapshot.clone(),
            command,
        };

        handle_permissions_command(
            run(PermissionsCommand::Create {
                app: app.clone(),
                role: "CREATE_PAYMENTS_ROLE".into(),
                grantee: "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".into(),
                manager: "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".into(),
            }),
            &config,
        )
        .await
        .unwrap();

        handle_permissions_command(
            run(PermissionsCommand::RemoveManager {
                app: app.clone(),
                role: "CREATE_PAYMENTS_ROLE".into(),
            }),
            &config,
        )
        .await
        .unwrap();

        let reloaded = SnapshotChain::load(&snapshot).unwrap();
        let role = RoleBytes::from_bytes([7; 32]);
        assert_eq!(
            reloaded.get_manager(finance().proxy_address, role).await.unwrap(),
            Address::DEFAULT_BURN
        );

        // Discarded: further management is refused.
        assert!(handle_permissions_command(
            run(PermissionsCommand::SetManager {
                app,
                role: "CREATE_PAYMENTS_ROLE".into(),
                manager: "0xcccccccccccccccccccccccccccccccccccccccc".into(),
            }),
            &config,
        )
        .await
        .is_err());
    }

    #[tokio::test]
    async fn test_configured_burn_address_freezes_manager() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = dir.path().join("chain.json");
        let burn = Address::from_bytes([0xde; 20]);
        let proxy = finance().proxy_address;
        let role = RoleBytes::from_bytes([7; 32]);
        let json = serde_json::json!({
            "apps": [finance()],
            "permissions": [{
                "app": proxy,
                "role": role,
                "manager": burn,
                "grantees": [Address::from_bytes([0xaa; 20])],
            }],
        });
        std::fs::write(&snapshot, json.to_string()).unwrap();

        let mut config = QuorumConfig::default();
        config.storage_dir = dir.path().join("labels");
        config.burn_address = burn;

        let refused = handle_permissions_command(
            PermissionsArgs {
                snapshot: snapshot.clone(),
                command: PermissionsCommand::SetManager {
                    app: proxy.to_lower_hex(),
                    role: "CREATE_PAYMENTS_ROLE".into(),
                    manager: "0xcccccccccccccccccccccccccccccccccccccccc".into(),
                },
            },
            &config,
        )
        .await;
        assert!(refused.is_err());

        let reloaded = SnapshotChain::load_with_burn(&snapshot, burn).unwrap();
        assert_eq!(reloaded.burn_address(), burn);
        assert_eq!(reloaded.get_manager(proxy, role).await.unwrap(), burn);
    }
}
