//! End-to-end identity directory flows: badges, import, share and files.

use proptest::prelude::*;
use quorum_core::Address;
use quorum_identity::{
    export_file_name, export_json, parse_label_entries, FileIdentityStorage, IdentityBadge,
    IdentityBus, IdentityEvent, IdentityStorage, LabelEntry, LocalIdentityDirectory,
    MemoryIdentityStorage, Selection, SharedLabels,
};
use std::sync::Arc;

fn addr(seed: u8) -> Address {
    Address::from_bytes([seed; 20])
}

async fn open_memory() -> Arc<LocalIdentityDirectory> {
    let storage: Arc<dyn IdentityStorage> = Arc::new(MemoryIdentityStorage::new());
    Arc::new(
        LocalIdentityDirectory::open("0xorg", storage, IdentityBus::default())
            .await
            .unwrap(),
    )
}

// ============================================================================
// Import
// ============================================================================

#[tokio::test]
async fn duplicate_import_keeps_last_and_emits_one_event() {
    let directory = open_memory().await;
    let mut sub = directory.subscribe();
    let one = Address::parse("0x0000000000000000000000000000000000000001").unwrap();

    directory
        .import_many(vec![
            LabelEntry::new(one, "Alice"),
            LabelEntry::new(one, "Alice2"),
        ])
        .await
        .unwrap();

    assert_eq!(directory.len(), 1);
    assert_eq!(directory.resolve(&one).unwrap().name, "Alice2");
    assert_eq!(sub.try_recv(), Some(IdentityEvent::Import));
    assert_eq!(sub.try_recv(), None);
}

#[tokio::test]
async fn import_file_is_all_or_nothing() {
    let directory = open_memory().await;
    let content = r#"[
        {"address": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed", "name": "Good"},
        {"address": "0xnothex", "name": "Bad"}
    ]"#;
    assert!(parse_label_entries(content).is_err());
    assert!(directory.is_empty());
}

// ============================================================================
// Badges
// ============================================================================

#[tokio::test]
async fn badges_follow_directory_changes() {
    let directory = open_memory().await;
    let mut alice = IdentityBadge::new(directory.clone(), addr(1));
    let mut bob = IdentityBadge::new(directory.clone(), addr(2));
    assert_eq!(directory.bus().subscriber_count(), 2);
    assert_eq!(alice.display_text(), addr(1).to_checksum());
    assert_eq!(alice.popover_action(), Some("Add custom label"));

    directory.modify(addr(1), "Alice").await.unwrap();
    assert_eq!(alice.poll_events(), 1);
    assert_eq!(bob.poll_events(), 0);
    assert_eq!(alice.label(), Some("Alice"));
    assert_eq!(alice.popover_action(), Some("Edit custom label"));

    directory
        .import_many(vec![LabelEntry::new(addr(2), "Bob")])
        .await
        .unwrap();
    assert_eq!(bob.poll_events(), 1);
    assert_eq!(bob.display_text(), "Bob");

    directory.clear_all().await.unwrap();
    alice.poll_events();
    bob.poll_events();
    assert_eq!(alice.label(), None);
    assert_eq!(bob.label(), None);

    drop(alice);
    assert_eq!(directory.bus().subscriber_count(), 1);
}

#[tokio::test]
async fn literal_badges_never_subscribe() {
    let directory = open_memory().await;
    let mut badge = IdentityBadge::new(
        directory.clone(),
        quorum_identity::BadgeSubject::from_text("Any account"),
    );
    assert_eq!(directory.bus().subscriber_count(), 0);
    assert_eq!(badge.display_text(), "Any account");
    assert_eq!(badge.popover_action(), None);
    assert_eq!(badge.next_update().await, None);
}

#[tokio::test]
async fn badge_awaits_next_update() {
    let directory = open_memory().await;
    let mut badge = IdentityBadge::new(directory.clone(), addr(5));

    let writer = directory.clone();
    let task = tokio::spawn(async move { writer.modify(addr(5), "Vault").await });

    assert_eq!(badge.next_update().await, Some(IdentityEvent::Modify(addr(5))));
    assert_eq!(badge.label(), Some("Vault"));
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn redelivered_events_keep_badge_on_current_label() {
    let directory = open_memory().await;
    let mut badge = IdentityBadge::new(directory.clone(), addr(1));
    let current = || directory.resolve(&addr(1)).ok().map(|r| r.name);

    directory.modify(addr(1), "Alice").await.unwrap();
    for _ in 0..2 {
        assert!(badge.handle_event(&IdentityEvent::Modify(addr(1))));
        assert_eq!(badge.label().map(str::to_string), current());
    }
    assert_eq!(badge.label(), Some("Alice"));

    directory.clear_all().await.unwrap();
    for _ in 0..2 {
        assert!(badge.handle_event(&IdentityEvent::Clear));
        assert_eq!(badge.label().map(str::to_string), current());
    }
    assert_eq!(badge.label(), None);

    // A late Clear after the address was relabelled must not wipe the label.
    directory.modify(addr(1), "Alice again").await.unwrap();
    assert!(badge.handle_event(&IdentityEvent::Clear));
    assert_eq!(badge.label(), Some("Alice again"));

    directory
        .import_many(vec![LabelEntry::new(addr(1), "Imported")])
        .await
        .unwrap();
    for _ in 0..2 {
        assert!(badge.handle_event(&IdentityEvent::Import));
        assert_eq!(badge.label().map(str::to_string), current());
    }
    assert_eq!(badge.label(), Some("Imported"));

    assert!(!badge.handle_event(&IdentityEvent::Modify(addr(2))));
    assert_eq!(badge.label(), Some("Imported"));
}

// ============================================================================
// Share and export
// ============================================================================

#[tokio::test]
async fn shared_labels_save_selected_subset() {
    let source = open_memory().await;
    source.modify(addr(1), "Alice").await.unwrap();
    source.modify(addr(2), "Bob").await.unwrap();
    let link = source
        .build_share_link("https://console.example", &[addr(1), addr(2)])
        .unwrap();
    assert!(link.starts_with("https://console.example/#/0xorg?labels="));

    let target = open_memory().await;
    let mut sub = target.subscribe();
    let mut shared = SharedLabels::from_link(&link).unwrap();
    shared.toggle(&addr(2));
    assert_eq!(shared.save(&target).await.unwrap(), 1);

    assert_eq!(target.resolve(&addr(1)).unwrap().name, "Alice");
    assert!(target.resolve(&addr(2)).is_err());
    assert_eq!(sub.try_recv(), Some(IdentityEvent::Import));

    shared.toggle_all();
    assert!(shared.save(&target).await.is_err());
}

#[tokio::test]
async fn export_selection_and_reimport() {
    let directory = open_memory().await;
    directory.modify(addr(1), "Alice").await.unwrap();
    directory.modify(addr(2), "Bob").await.unwrap();

    let mut selection = Selection::new(directory.all().iter().map(|r| r.address));
    selection.toggle(&addr(2));
    let json = export_json(&directory.export_selected(&selection.selected())).unwrap();

    let entries = parse_label_entries(&json).unwrap();
    assert_eq!(entries, vec![LabelEntry::new(addr(1), "Alice")]);

    let date = chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
    assert_eq!(export_file_name("acme", date), "acme_2025-01-31.json");
}

#[tokio::test]
async fn file_storage_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn IdentityStorage> = Arc::new(FileIdentityStorage::new(dir.path()));

    let first = LocalIdentityDirectory::open("acme", storage.clone(), IdentityBus::default())
        .await
        .unwrap();
    first.modify(addr(7), "Payroll").await.unwrap();

    let second = LocalIdentityDirectory::open("acme", storage.clone(), IdentityBus::default())
        .await
        .unwrap();
    assert_eq!(second.resolve(&addr(7)).unwrap().name, "Payroll");

    second.clear_all().await.unwrap();
    assert!(storage.load("acme").await.unwrap().is_empty());
}

// ============================================================================
// Properties
// ============================================================================

fn entry_strategy() -> impl Strategy<Value = LabelEntry> {
    (any::<[u8; 20]>(), "\\PC{1,24}").prop_map(|(bytes, name)| LabelEntry::new(Address::from_bytes(bytes), name))
}

proptest! {
    #[test]
    fn share_link_roundtrips(entries in prop::collection::vec(entry_strategy(), 1..8)) {
        let link = quorum_identity::build_share_link("https://x.example", "org", &entries).unwrap();
        prop_assert_eq!(quorum_identity::parse_share_link(&link).unwrap(), entries);
    }

    #[test]
    fn repeated_modify_is_idempotent(name in "[a-zA-Z0-9 ]{1,16}", repeats in 1usize..4) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let directory = open_memory().await;
            for _ in 0..repeats {
                directory.modify(addr(9), &name).await.unwrap();
            }
            let expected = name.trim();
            if expected.is_empty() {
                assert!(directory.is_empty());
            } else {
                assert_eq!(directory.len(), 1);
                assert_eq!(directory.resolve(&addr(9)).unwrap().name, expected);
            }
        });
    }
}
