//! Identity badges
//!
//! A badge displays one subject. Address subjects resolve their label from
//! the directory and hold their own subscription so they re-resolve when the
//! directory changes. Literal subjects ("Any account", "Discarded") are shown
//! verbatim and never subscribe.

use crate::bus::{IdentityEvent, IdentitySubscription};
use crate::directory::LocalIdentityDirectory;
use quorum_core::Address;
use std::sync::Arc;

/// What a badge displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeSubject {
    /// A resolvable address
    Address(Address),
    /// Fixed text
    Literal(String),
}

impl BadgeSubject {
    /// Address if `text` parses as one, literal otherwise.
    pub fn from_text(text: &str) -> Self {
        match Address::parse(text.trim()) {
            Ok(address) => Self::Address(address),
            Err(_) => Self::Literal(text.to_string()),
        }
    }
}

impl From<Address> for BadgeSubject {
    fn from(address: Address) -> Self {
        Self::Address(address)
    }
}

/// A subscribed label display.
#[derive(Debug)]
pub struct IdentityBadge {
    subject: BadgeSubject,
    label: Option<String>,
    directory: Arc<LocalIdentityDirectory>,
    subscription: Option<IdentitySubscription>,
}

impl IdentityBadge {
    /// Create a badge, resolving its initial label.
    pub fn new(directory: Arc<LocalIdentityDirectory>, subject: impl Into<BadgeSubject>) -> Self {
        let subject = subject.into();
        let subscription = match subject {
            BadgeSubject::Address(_) => Some(directory.subscribe()),
            BadgeSubject::Literal(_) => None,
        };
        let mut badge = Self {
            subject,
            label: None,
            directory,
            subscription,
        };
        badge.refresh();
        badge
    }

    /// The badge subject
    pub fn subject(&self) -> &BadgeSubject {
        &self.subject
    }

    /// Local label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text to render: literal, label, or checksummed address.
    pub fn display_text(&self) -> String {
        match (&self.subject, &self.label) {
            (BadgeSubject::Literal(text), _) => text.clone(),
            (BadgeSubject::Address(_), Some(label)) => label.clone(),
            (BadgeSubject::Address(address), None) => address.to_checksum(),
        }
    }

    /// Popover action offered for address subjects.
    pub fn popover_action(&self) -> Option<&'static str> {
        match (&self.subject, &self.label) {
            (BadgeSubject::Literal(_), _) => None,
            (BadgeSubject::Address(_), Some(_)) => Some("Edit custom label"),
            (BadgeSubject::Address(_), None) => Some("Add custom label"),
        }
    }

    /// Apply one event. Returns whether the badge re-resolved.
    ///
    /// Every relevant event re-reads the directory, so a stale or repeated
    /// delivery leaves the label equal to the current resolution.
    pub fn handle_event(&mut self, event: &IdentityEvent) -> bool {
        let BadgeSubject::Address(address) = self.subject else {
            return false;
        };
        if !event.affects(&address) {
            return false;
        }
        self.refresh();
        true
    }

    /// Apply every already-delivered event. Returns how many changed the badge.
    pub fn poll_events(&mut self) -> usize {
        let mut changed = 0;
        while let Some(event) = self.subscription.as_mut().and_then(IdentitySubscription::try_recv) {
            if self.handle_event(&event) {
                changed += 1;
            }
        }
        changed
    }

    /// Wait for the next event and apply it. `None` for literal badges or
    /// once the bus is gone.
    pub async fn next_update(&mut self) -> Option<IdentityEvent> {
        let event = self.subscription.as_mut()?.recv().await?;
        self.handle_event(&event);
        Some(event)
    }

    fn refresh(&mut self) {
        if let BadgeSubject::Address(address) = &self.subject {
            // A miss is silent: the badge falls back to the address.
            self.label = self.directory.resolve(address).ok().map(|r| r.name);
        }
    }
}
