//! Session-backed cart slot.
//!
//! Each request loads the raw snapshot from the session into a
//! [`MemoryStorage`], mutates it through a [`CartStore`], and writes it back
//! once at the end. Concurrent requests from the same browser resolve
//! last-write-wins.

use std::fmt::Write;
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value, json};
use tower_sessions::Session;
use tracing::{debug, warn};
use under_the_hood_core::{Cart, CartLineItem, CartStore, MemoryStorage};

/// Session key holding the JSON cart snapshot.
pub const CART_SESSION_KEY: &str = "uth_cart_v1";

/// Name of the client-side event fired after a cart mutation.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// The last change made to the cart during a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSignal {
    /// `add`, `change`, `remove`, `clear` or `sync`.
    pub event: &'static str,
    /// Item count after the change.
    pub count: u32,
    pub item: Option<CartLineItem>,
}

impl CartSignal {
    /// Value for the `HX-Trigger` response header.
    ///
    /// Non-ASCII characters are `\u`-escaped so the JSON is a valid header
    /// value whatever the product titles contain.
    #[must_use]
    pub fn hx_trigger(&self) -> String {
        let mut payload = Map::new();
        payload.insert(
            CART_UPDATED_EVENT.to_string(),
            json!({
                "count": self.count,
                "event": self.event,
                "item": self.item,
            }),
        );
        let json = Value::Object(payload).to_string();

        let mut out = String::with_capacity(json.len());
        for ch in json.chars() {
            if ch.is_ascii() {
                out.push(ch);
            } else {
                for unit in ch.encode_utf16(&mut [0; 2]) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
        }
        out
    }
}

/// The current browser's cart for the duration of one request.
pub struct SessionCart {
    session: Session,
    loaded: Option<String>,
    store: CartStore<MemoryStorage>,
    signal: Arc<Mutex<Option<CartSignal>>>,
}

impl SessionCart {
    /// Load the cart from the session.
    ///
    /// An unreadable session entry is logged and treated as an empty cart.
    pub async fn open(session: Session) -> Self {
        let loaded = session
            .get::<String>(CART_SESSION_KEY)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Failed to read cart from session");
                None
            });

        let slot = loaded
            .as_deref()
            .map_or_else(MemoryStorage::new, MemoryStorage::with_snapshot);
        let mut store = CartStore::open(slot);

        let signal = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&signal);
        store.subscribe(move |event, cart| {
            debug!(event = event.kind(), count = cart.count(), "Cart changed");
            if let Ok(mut last) = sink.lock() {
                *last = Some(CartSignal {
                    event: event.kind(),
                    count: cart.count(),
                    item: event.item().cloned(),
                });
            }
        });

        Self {
            session,
            loaded,
            store,
            signal,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        self.store.cart()
    }

    /// The store to mutate; changes reach the session on [`Self::save`].
    pub const fn store(&mut self) -> &mut CartStore<MemoryStorage> {
        &mut self.store
    }

    /// Write the slot back if it changed, and return the final cart together
    /// with the last change signal (if any mutation happened).
    ///
    /// A failed session write is logged; the response still reflects the
    /// mutated cart.
    pub async fn save(self) -> (Cart, Option<CartSignal>) {
        let current = self.store.storage().snapshot();
        if let Some(raw) = current.filter(|raw| Some(raw) != self.loaded.as_ref())
            && let Err(e) = self.session.insert(CART_SESSION_KEY, raw).await
        {
            warn!(error = %e, "Failed to write cart to session");
        }

        let signal = self.signal.lock().ok().and_then(|mut last| last.take());
        (self.store.cart().clone(), signal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hx_trigger_payload() {
        let signal = CartSignal {
            event: "add",
            count: 3,
            item: Some(CartLineItem::new(7, "Smoky Rub")),
        };
        let value: serde_json::Value =
            serde_json::from_str(&signal.hx_trigger()).unwrap_or_default();
        assert_eq!(value["cart-updated"]["count"], 3);
        assert_eq!(value["cart-updated"]["event"], "add");
        assert_eq!(value["cart-updated"]["item"]["id"], 7);
    }

    #[test]
    fn test_hx_trigger_without_item() {
        let signal = CartSignal {
            event: "clear",
            count: 0,
            item: None,
        };
        assert_eq!(
            signal.hx_trigger(),
            r#"{"cart-updated":{"count":0,"event":"clear","item":null}}"#
        );
    }

    #[test]
    fn test_hx_trigger_escapes_non_ascii() {
        let signal = CartSignal {
            event: "add",
            count: 1,
            item: Some(CartLineItem::new(1, "Kūmara Rub 🔥")),
        };
        let header = signal.hx_trigger();
        assert!(header.is_ascii());
        assert!(header.contains(r"K\u016bmara Rub \ud83d\udd25"));

        let value: serde_json::Value = serde_json::from_str(&header).unwrap_or_default();
        assert_eq!(value["cart-updated"]["item"]["title"], "Kūmara Rub 🔥");
    }
}
