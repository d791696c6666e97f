//! Entity selector
//!
//! Dropdown of `Custom address`, optionally `Any account`, then every named
//! app. Choosing an item yields `{index, address}`; for the custom item the
//! address is whatever the user typed.

use quorum_core::{named_apps, Address, AppInstance};

/// Item text for the free-form address entry.
pub const CUSTOM_ADDRESS_ITEM: &str = "Custom address";
/// Item text for the wildcard grantee.
pub const ANY_ACCOUNT_ITEM: &str = "Any account";

/// Result of a selector change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EntitySelection {
    /// Active item index
    pub index: usize,
    /// Address text for the active item (unvalidated for custom input)
    pub address: String,
}

/// Selector state.
#[derive(Debug, Clone)]
pub struct EntitySelector {
    include_any: bool,
    apps: Vec<AppInstance>,
    active_index: usize,
    custom_address: String,
}

impl EntitySelector {
    /// Build a selector over the named apps among `apps`.
    pub fn new(apps: &[AppInstance], include_any: bool) -> Self {
        Self {
            include_any,
            apps: named_apps(apps).into_iter().cloned().collect(),
            active_index: 0,
            custom_address: String::new(),
        }
    }

    /// Dropdown items in order.
    pub fn items(&self) -> Vec<String> {
        let mut items = vec![CUSTOM_ADDRESS_ITEM.to_string()];
        if self.include_any {
            items.push(ANY_ACCOUNT_ITEM.to_string());
        }
        items.extend(self.apps.iter().map(AppInstance::display_name));
        items
    }

    /// Active item index.
    pub fn active_index(&self) -> usize {
        self.active_index
    }

    /// Whether the custom address field is active.
    pub fn is_custom(&self) -> bool {
        self.active_index == 0
    }

    /// Choose an item. Out-of-range indices fall back to the custom item.
    pub fn select(&mut self, index: usize) -> EntitySelection {
        self.active_index = if index < self.items_len() { index } else { 0 };
        self.selection()
    }

    /// Type into the custom address field, activating it.
    pub fn set_custom_address(&mut self, value: &str) -> EntitySelection {
        self.active_index = 0;
        self.custom_address = value.to_string();
        self.selection()
    }

    /// Current `{index, address}`.
    pub fn selection(&self) -> EntitySelection {
        EntitySelection {
            index: self.active_index,
            address: self.address_text(),
        }
    }

    /// Back to the custom item with an empty field.
    pub fn reset(&mut self) {
        self.active_index = 0;
        self.custom_address.clear();
    }

    fn items_len(&self) -> usize {
        1 + usize::from(self.include_any) + self.apps.len()
    }

    fn address_text(&self) -> String {
        let app_offset = 1 + usize::from(self.include_any);
        match self.active_index {
            0 => self.custom_address.clone(),
            1 if self.include_any => Address::ANY_ENTITY.to_checksum(),
            index => self
                .apps
                .get(index - app_offset)
                .map(|app| app.proxy_address.to_checksum())
                .unwrap_or_default(),
        }
    }
}
