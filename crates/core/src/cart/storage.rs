//! Persistence slot for the cart snapshot.

use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors raised by a [`CartStorage`] backend.
///
/// The store never surfaces these to callers; they are logged and the cart
/// carries on in memory.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be reached or is in a broken state.
    #[error("cart storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write (quota, size limit, ...).
    #[error("cart storage rejected write: {0}")]
    Rejected(String),
}

/// A single named slot holding the serialized cart.
///
/// Implementations use interior mutability so the same slot can be shared by
/// several stores (the way browser tabs share one storage area).
pub trait CartStorage {
    /// Read the raw snapshot, or `None` if nothing was ever written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot with a new snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write(&self, snapshot: &str) -> Result<(), StorageError>;
}

/// In-process slot; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing raw snapshot (which may be malformed).
    #[must_use]
    pub fn with_snapshot(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(raw.into()))),
        }
    }

    /// Current raw contents, ignoring lock poisoning.
    #[must_use]
    pub fn snapshot(&self) -> Option<String> {
        self.read().ok().flatten()
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        self.slot
            .read()
            .map(|guard| guard.clone())
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn write(&self, snapshot: &str) -> Result<(), StorageError> {
        let mut guard = self
            .slot
            .write()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        *guard = Some(snapshot.to_string());
        Ok(())
    }
}

impl<T: CartStorage + ?Sized> CartStorage for &T {
    fn read(&self) -> Result<Option<String>, StorageError> {
        (**self).read()
    }

    fn write(&self, snapshot: &str) -> Result<(), StorageError> {
        (**self).write(snapshot)
    }
}
