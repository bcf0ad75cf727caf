//! Cart change notifications.
//!
//! Listeners are called synchronously, in subscription order, after the
//! mutation has been applied and persisted.

use super::item::{Cart, CartLineItem};

/// What changed in the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// A line was added or its quantity increased; carries the resulting line.
    Added(CartLineItem),
    /// A line's quantity was adjusted; carries the resulting line.
    QuantityChanged(CartLineItem),
    /// A line was removed; carries the removed line.
    Removed(CartLineItem),
    /// Every line was removed.
    Cleared,
    /// The cart was replaced by a newer persisted snapshot.
    Synced,
}

impl CartEvent {
    /// Short name used in logs and client-side triggers.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Added(_) => "add",
            Self::QuantityChanged(_) => "change",
            Self::Removed(_) => "remove",
            Self::Cleared => "clear",
            Self::Synced => "sync",
        }
    }

    /// The line item carried by the event, if any.
    #[must_use]
    pub const fn item(&self) -> Option<&CartLineItem> {
        match self {
            Self::Added(item) | Self::QuantityChanged(item) | Self::Removed(item) => Some(item),
            Self::Cleared | Self::Synced => None,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&CartEvent, &Cart) + Send + Sync>;

/// Ordered observer list.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl Subscribers {
    pub(crate) fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartEvent, &Cart) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub(crate) fn emit(&self, event: &CartEvent, cart: &Cart) {
        for (_, listener) in &self.listeners {
            listener(event, cart);
        }
    }
}

impl std::fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscribers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
