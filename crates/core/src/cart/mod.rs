//! Cart state model.
//!
//! # Architecture
//!
//! - [`CartStore`] owns the current [`Cart`], a [`CartStorage`] slot and an
//!   ordered list of subscribers
//! - Every mutation persists the whole snapshot, then emits a [`CartEvent`]
//! - Reads are lenient: malformed snapshots become an empty cart
//!
//! The storefront backs the slot with the browser session; tests use
//! [`MemoryStorage`].

mod events;
mod item;
mod storage;
mod store;

pub use events::{CartEvent, SubscriptionId};
pub use item::{Cart, CartLineItem};
pub use storage::{CartStorage, MemoryStorage, StorageError};
pub use store::CartStore;
