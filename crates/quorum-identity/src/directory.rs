//! # Local Identity Directory
//!
//! The directory owns the label map for one organization. Reads are
//! synchronous and clone records out from under a read lock. Writes are
//! serialized through a single async writer guard: each write builds the
//! next map, persists it, then swaps it in and publishes exactly one event.
//! A failed persist leaves the in-memory map untouched.

use crate::bus::{IdentityBus, IdentityEvent, IdentitySubscription};
use crate::errors::{IdentityError, IdentityResult};
use crate::record::{IdentityRecord, LabelEntry};
use crate::share;
use parking_lot::RwLock;
use quorum_core::Address;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

type RecordMap = HashMap<String, IdentityRecord>;

/// Address labels for one organization.
pub struct LocalIdentityDirectory {
    org: String,
    records: RwLock<RecordMap>,
    storage: Arc<dyn crate::storage::IdentityStorage>,
    bus: IdentityBus,
    writer: Mutex<()>,
}

impl std::fmt::Debug for LocalIdentityDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalIdentityDirectory")
            .field("org", &self.org)
            .field("records", &self.records.read().len())
            .finish_non_exhaustive()
    }
}

impl LocalIdentityDirectory {
    /// Open the directory for `org`, loading its persisted snapshot.
    pub async fn open(
        org: impl Into<String>,
        storage: Arc<dyn crate::storage::IdentityStorage>,
        bus: IdentityBus,
    ) -> IdentityResult<Self> {
        let org = org.into();
        let loaded = storage.load(&org).await?;
        let mut records = RecordMap::with_capacity(loaded.len());
        for record in loaded {
            if record.name.trim().is_empty() {
                continue;
            }
            records.insert(record.key(), record);
        }
        tracing::info!(org = %org, records = records.len(), "Opened identity directory");
        Ok(Self {
            org,
            records: RwLock::new(records),
            storage,
            bus,
            writer: Mutex::new(()),
        })
    }

    /// Organization key this directory persists under.
    pub fn org(&self) -> &str {
        &self.org
    }

    /// The event bus shared with subscribers.
    pub fn bus(&self) -> &IdentityBus {
        &self.bus
    }

    /// Subscribe to directory changes.
    pub fn subscribe(&self) -> IdentitySubscription {
        self.bus.subscribe()
    }

    /// Number of labelled addresses.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether no address is labelled.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Label for `address`. A miss is [`IdentityError::ResolutionMiss`],
    /// which callers treat as "show the address".
    pub fn resolve(&self, address: &Address) -> IdentityResult<IdentityRecord> {
        self.records
            .read()
            .get(&address.to_lower_hex())
            .cloned()
            .ok_or(IdentityError::ResolutionMiss { address: *address })
    }

    /// Every record, sorted by name (case-insensitive) then address.
    pub fn all(&self) -> Vec<IdentityRecord> {
        let mut all: Vec<IdentityRecord> = self.records.read().values().cloned().collect();
        all.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.address.cmp(&b.address))
        });
        all
    }

    /// Set the label of `address`; an empty (after trim) name removes it.
    ///
    /// Publishes `Modify(address)` in both cases.
    pub async fn modify(&self, address: Address, name: &str) -> IdentityResult<()> {
        let _writer = self.writer.lock().await;
        let mut next = self.records.read().clone();
        apply(&mut next, address, name);
        self.persist(&next).await?;
        *self.records.write() = next;

        tracing::info!(org = %self.org, %address, removed = name.trim().is_empty(), "Label modified");
        self.bus.publish(IdentityEvent::Modify(address));
        Ok(())
    }

    /// Remove every label and this organization's snapshot. Publishes `Clear`.
    pub async fn clear_all(&self) -> IdentityResult<()> {
        let _writer = self.writer.lock().await;
        self.storage.clear(&self.org).await.map_err(|e| {
            tracing::warn!(org = %self.org, error = %e, "Failed to clear label snapshot");
            e
        })?;
        self.records.write().clear();

        tracing::info!(org = %self.org, "Labels cleared");
        self.bus.publish(IdentityEvent::Clear);
        Ok(())
    }

    /// Apply `entries` in order (later duplicates win), persist once and
    /// publish exactly one `Import`. Returns the number of entries applied.
    pub async fn import_many(
        &self,
        entries: impl IntoIterator<Item = LabelEntry>,
    ) -> IdentityResult<usize> {
        let _writer = self.writer.lock().await;
        let mut next = self.records.read().clone();
        let mut applied = 0;
        for entry in entries {
            apply(&mut next, entry.address, &entry.name);
            applied += 1;
        }
        self.persist(&next).await?;
        *self.records.write() = next;

        tracing::info!(org = %self.org, applied, "Labels imported");
        self.bus.publish(IdentityEvent::Import);
        Ok(applied)
    }

    /// Export projection of the labelled addresses among `addresses`, in the
    /// order given. Unlabelled addresses are skipped.
    pub fn export_selected(&self, addresses: &[Address]) -> Vec<LabelEntry> {
        let records = self.records.read();
        addresses
            .iter()
            .filter_map(|a| records.get(&a.to_lower_hex()))
            .map(IdentityRecord::to_entry)
            .collect()
    }

    /// Share link for the labelled addresses among `addresses`.
    pub fn build_share_link(&self, base_url: &str, addresses: &[Address]) -> IdentityResult<String> {
        share::build_share_link(base_url, &self.org, &self.export_selected(addresses))
    }

    async fn persist(&self, records: &RecordMap) -> IdentityResult<()> {
        let mut snapshot: Vec<IdentityRecord> = records.values().cloned().collect();
        snapshot.sort_by(|a, b| a.address.cmp(&b.address));
        self.storage.save(&self.org, &snapshot).await.map_err(|e| {
            tracing::warn!(org = %self.org, error = %e, "Failed to persist labels");
            e
        })
    }
}

fn apply(records: &mut RecordMap, address: Address, name: &str) {
    let key = address.to_lower_hex();
    let name = name.trim();
    if name.is_empty() {
        records.remove(&key);
        return;
    }
    match records.get_mut(&key) {
        Some(existing) => existing.name = name.to_string(),
        None => {
            records.insert(key, IdentityRecord::new(address, name));
        }
    }
}
