//! Identity event bus
//!
//! A cloneable handle onto a tokio broadcast channel. Every badge takes its
//! own [`IdentitySubscription`]; dropping the subscription unsubscribes.

use quorum_core::Address;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Default channel capacity.
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// A change to the identity directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// The label of one address was set or removed
    Modify(Address),
    /// Every label was removed
    Clear,
    /// A batch of labels was imported
    Import,
}

impl IdentityEvent {
    /// Whether a subscriber displaying `address` must re-resolve.
    pub fn affects(&self, address: &Address) -> bool {
        match self {
            Self::Modify(changed) => changed == address,
            Self::Clear | Self::Import => true,
        }
    }
}

/// Broadcast channel for [`IdentityEvent`]s.
#[derive(Debug, Clone)]
pub struct IdentityBus {
    sender: broadcast::Sender<IdentityEvent>,
}

impl IdentityBus {
    /// Create a bus buffering up to `capacity` undelivered events per subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to every current subscriber.
    ///
    /// Returns the number of subscribers reached; zero is not an error.
    pub fn publish(&self, event: IdentityEvent) -> usize {
        tracing::debug!(?event, "Publishing identity event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on.
    pub fn subscribe(&self) -> IdentitySubscription {
        IdentitySubscription {
            receiver: self.sender.subscribe(),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for IdentityBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

/// One subscriber's view of the bus.
///
/// If the subscriber falls behind and events are dropped, the gap is
/// reported as a single [`IdentityEvent::Import`] so the subscriber
/// re-resolves everything it displays.
#[derive(Debug)]
pub struct IdentitySubscription {
    receiver: broadcast::Receiver<IdentityEvent>,
}

impl IdentitySubscription {
    /// Wait for the next event. `None` once the bus is gone.
    pub async fn recv(&mut self) -> Option<IdentityEvent> {
        match self.receiver.recv().await {
            Ok(event) => Some(event),
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Identity subscriber lagged, forcing full refresh");
                Some(IdentityEvent::Import)
            }
            Err(RecvError::Closed) => None,
        }
    }

    /// Next already-delivered event, without waiting.
    pub fn try_recv(&mut self) -> Option<IdentityEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Identity subscriber lagged, forcing full refresh");
                Some(IdentityEvent::Import)
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => None,
        }
    }
}
