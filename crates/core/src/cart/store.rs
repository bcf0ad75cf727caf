//! The cart store: cart state plus its storage slot and subscribers.

use rust_decimal::Decimal;

use super::events::{CartEvent, SubscriptionId, Subscribers};
use super::item::{Cart, CartLineItem};
use super::storage::CartStorage;
use crate::types::ProductId;

/// Authoritative cart for one browser.
///
/// Every mutation writes the full snapshot back to storage and then notifies
/// subscribers. Storage failures are logged and otherwise ignored, so the
/// store keeps working as an ephemeral in-memory cart.
///
/// ```
/// use under_the_hood_core::{CartLineItem, CartStore, MemoryStorage};
///
/// let mut store = CartStore::open(MemoryStorage::new());
/// store.add(CartLineItem::new(1, "Brisket Rub"), 2);
/// store.add(CartLineItem::new(1, "Brisket Rub"), 1);
/// assert_eq!(store.cart().items()[0].quantity, 3);
/// ```
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    cart: Cart,
    subscribers: Subscribers,
}

impl<S: CartStorage> CartStore<S> {
    /// Create a store over `storage`, loading whatever it currently holds.
    pub fn open(storage: S) -> Self {
        let cart = read_cart(&storage);
        Self {
            storage,
            cart,
            subscribers: Subscribers::default(),
        }
    }

    /// Re-read the persisted cart and make it current.
    ///
    /// Missing, unreadable or malformed data yields an empty cart.
    pub fn load(&mut self) -> &Cart {
        self.cart = read_cart(&self.storage);
        &self.cart
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add `qty` of `item`, merging with an existing line of the same id.
    pub fn add(&mut self, item: CartLineItem, qty: u32) -> &Cart {
        let line = self.cart.add(item, qty).clone();
        tracing::debug!(id = %line.id, quantity = line.quantity, "Cart line added");
        self.commit(&CartEvent::Added(line));
        &self.cart
    }

    /// Adjust a line's quantity by `delta`, never going below 1.
    ///
    /// Unknown ids leave the cart, the storage and subscribers untouched.
    pub fn set_quantity(&mut self, id: &ProductId, delta: i64) -> &Cart {
        if let Some(line) = self.cart.set_quantity(id, delta).cloned() {
            self.commit(&CartEvent::QuantityChanged(line));
        }
        &self.cart
    }

    /// Remove the line with `id`; unknown ids are a no-op.
    pub fn remove(&mut self, id: &ProductId) -> &Cart {
        if let Some(line) = self.cart.remove(id) {
            self.commit(&CartEvent::Removed(line));
        }
        &self.cart
    }

    /// Empty the cart.
    pub fn clear(&mut self) -> &Cart {
        self.cart.clear();
        self.commit(&CartEvent::Cleared);
        &self.cart
    }

    /// Sum of `price * quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.cart.subtotal()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.cart.count()
    }

    /// Pick up a snapshot written by someone else (another tab or request).
    ///
    /// Returns `true` and notifies subscribers with [`CartEvent::Synced`] only
    /// when the persisted cart differs from the in-memory one.
    pub fn sync(&mut self) -> bool {
        let latest = read_cart(&self.storage);
        if latest == self.cart {
            return false;
        }
        self.cart = latest;
        self.subscribers.emit(&CartEvent::Synced, &self.cart);
        true
    }

    /// Register a listener called after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: Fn(&CartEvent, &Cart) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(listener)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Borrow the underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    fn commit(&self, event: &CartEvent) {
        self.persist();
        self.subscribers.emit(event, &self.cart);
    }

    fn persist(&self) {
        let snapshot = match self.cart.to_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize cart; keeping it in memory");
                return;
            }
        };
        if let Err(e) = self.storage.write(&snapshot) {
            tracing::warn!(error = %e, "Failed to persist cart; keeping it in memory");
        }
    }
}

fn read_cart<S: CartStorage>(storage: &S) -> Cart {
    match storage.read() {
        Ok(Some(raw)) => Cart::from_snapshot(&raw),
        Ok(None) => Cart::new(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read cart; starting empty");
            Cart::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    use proptest::prelude::*;

    use super::*;
    use crate::cart::storage::{MemoryStorage, StorageError};
    use crate::types::Price;

    fn price(s: &str) -> Price {
        Price::new(Decimal::from_str(s).unwrap()).unwrap()
    }

    fn item(id: i64) -> CartLineItem {
        CartLineItem::new(id, format!("Product {id}"))
    }

    /// Storage whose reads and writes always fail.
    struct BrokenStorage;

    impl CartStorage for BrokenStorage {
        fn read(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }

        fn write(&self, _snapshot: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected("quota exceeded".to_string()))
        }
    }

    #[test]
    fn test_add_same_id_merges_quantity() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add(item(1), 2);
        let cart = store.add(item(1), 1);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_add_appends_in_order() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add(item(2), 1);
        store.add(item(1), 1);
        let ids: Vec<_> = store.cart().items().iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids, vec![ProductId::Number(2), ProductId::Number(1)]);
    }

    #[test]
    fn test_set_quantity_floors_at_one() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add(item(1), 5);
        store.set_quantity(&ProductId::Number(1), -100);
        assert_eq!(store.cart().items()[0].quantity, 1);
        store.set_quantity(&ProductId::Number(1), 2);
        assert_eq!(store.cart().items()[0].quantity, 3);
    }

    #[test]
    fn test_set_quantity_unknown_id_is_noop() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store.add(item(1), 1);
        let before = storage.snapshot();
        store.set_quantity(&ProductId::Number(99), 1);
        assert_eq!(storage.snapshot(), before);
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_remove_unknown_id_leaves_cart_unchanged() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add(item(1), 1);
        store.add(item(2), 4);
        let before = store.cart().clone();
        let after = store.remove(&ProductId::from("missing"));
        assert_eq!(after, &before);
    }

    #[test]
    fn test_remove_existing() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add(item(1), 1);
        store.add(item(2), 1);
        store.remove(&ProductId::Number(1));
        assert_eq!(store.cart().len(), 1);
        assert_eq!(store.cart().items()[0].id, ProductId::Number(2));
    }

    #[test]
    fn test_subtotal() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add(item(1).with_price(price("12.5")), 2);
        store.add(item(2).with_price(price("3")), 1);
        assert_eq!(store.subtotal(), Decimal::from(28));
    }

    #[test]
    fn test_subtotal_treats_missing_price_as_zero() {
        let storage = MemoryStorage::with_snapshot(
            r#"[{"id":1,"price":"abc","qty":4},{"id":2,"price":2.25}]"#,
        );
        let store = CartStore::open(storage);
        assert_eq!(store.subtotal(), Decimal::from_str("2.25").unwrap());
        assert_eq!(store.count(), 5);
    }

    #[test]
    fn test_load_invalid_json_is_empty() {
        let mut store = CartStore::open(MemoryStorage::with_snapshot("{this is not json"));
        assert!(store.cart().is_empty());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let mut store = CartStore::open(MemoryStorage::new());
        store.add(item(1), 3);
        store.clear();
        assert!(store.load().is_empty());
        assert_eq!(store.storage().snapshot().as_deref(), Some("[]"));
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = MemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store.add(item(7), 2);
        let reopened = CartStore::open(storage);
        assert_eq!(reopened.cart(), store.cart());
    }

    #[test]
    fn test_broken_storage_degrades_to_ephemeral_cart() {
        let mut store = CartStore::open(BrokenStorage);
        assert!(store.cart().is_empty());
        store.add(item(1), 2);
        assert_eq!(store.count(), 2);
        assert!(!store.sync());
    }

    #[test]
    fn test_subscribers_see_post_mutation_state_in_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut store = CartStore::open(MemoryStorage::new());

        let first = Arc::clone(&log);
        store.subscribe(move |event, cart| {
            first
                .lock()
                .unwrap()
                .push(format!("first:{}:{}", event.kind(), cart.count()));
        });
        let second = Arc::clone(&log);
        store.subscribe(move |event, cart| {
            second
                .lock()
                .unwrap()
                .push(format!("second:{}:{}", event.kind(), cart.count()));
        });

        store.add(item(1), 2);
        store.set_quantity(&ProductId::Number(1), 1);
        store.clear();

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "first:add:2",
                "second:add:2",
                "first:change:3",
                "second:change:3",
                "first:clear:0",
                "second:clear:0",
            ]
        );
    }

    #[test]
    fn test_added_event_carries_merged_line() {
        let seen = Arc::new(Mutex::new(None));
        let mut store = CartStore::open(MemoryStorage::new());
        let sink = Arc::clone(&seen);
        store.subscribe(move |event, _| {
            *sink.lock().unwrap() = event.item().cloned();
        });

        store.add(item(1), 1);
        store.add(item(1), 4);

        let line = seen.lock().unwrap().clone().unwrap();
        assert_eq!(line.quantity, 5);
    }

    #[test]
    fn test_unsubscribed_listener_is_not_called() {
        let calls = Arc::new(Mutex::new(0));
        let mut store = CartStore::open(MemoryStorage::new());
        let counter = Arc::clone(&calls);
        let id = store.subscribe(move |_, _| *counter.lock().unwrap() += 1);
        store.add(item(1), 1);
        assert!(store.unsubscribe(id));
        store.add(item(1), 1);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn test_sync_picks_up_other_writer() {
        let storage = MemoryStorage::new();
        let mut tab_a = CartStore::open(storage.clone());
        let mut tab_b = CartStore::open(storage);

        let synced = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&synced);
        tab_a.subscribe(move |event, _| {
            if *event == CartEvent::Synced {
                *flag.lock().unwrap() = true;
            }
        });

        tab_b.add(item(3), 2);
        assert!(tab_a.sync());
        assert_eq!(tab_a.count(), 2);
        assert!(*synced.lock().unwrap());
        assert!(!tab_a.sync());
    }

    #[test]
    fn test_last_write_wins() {
        let storage = MemoryStorage::new();
        let mut tab_a = CartStore::open(storage.clone());
        let mut tab_b = CartStore::open(storage.clone());
        tab_a.add(item(1), 1);
        tab_b.add(item(2), 1);
        let persisted = CartStore::open(storage);
        assert_eq!(persisted.cart().len(), 1);
        assert_eq!(persisted.cart().items()[0].id, ProductId::Number(2));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(i64, u32),
        Delta(i64, i64),
        Remove(i64),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0_i64..6, 0_u32..5).prop_map(|(id, q)| Op::Add(id, q)),
            3 => (0_i64..6, -10_i64..10).prop_map(|(id, d)| Op::Delta(id, d)),
            2 => (0_i64..6).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn prop_invariants_hold_after_any_sequence(ops in prop::collection::vec(op(), 0..40)) {
            let storage = MemoryStorage::new();
            let mut store = CartStore::open(storage.clone());
            for op in ops {
                match op {
                    Op::Add(id, q) => { store.add(item(id), q); }
                    Op::Delta(id, d) => { store.set_quantity(&ProductId::Number(id), d); }
                    Op::Remove(id) => { store.remove(&ProductId::Number(id)); }
                    Op::Clear => { store.clear(); }
                }

                let items = store.cart().items();
                prop_assert!(items.iter().all(|i| i.quantity >= 1));
                let mut ids: Vec<_> = items.iter().map(|i| i.id.to_string()).collect();
                ids.sort();
                ids.dedup();
                prop_assert_eq!(ids.len(), items.len());
            }

            let reloaded = CartStore::open(storage);
            prop_assert_eq!(reloaded.cart(), store.cart());
        }
    }
}
